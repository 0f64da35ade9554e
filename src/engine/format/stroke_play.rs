//! Stroke-play week resolution: every approved score ranked ascending by
//! net total; the lowest net wins the week.

use std::collections::HashMap;

use uuid::Uuid;

use crate::dao::models::{MemberEntity, ScoreEntity};
use crate::engine::standings::RankedScore;

/// Rank a week's approved scores ascending by net (gross breaks ties).
///
/// Scores without a net total (incomplete rounds) and scores from users
/// who are not active members are dropped. An empty result means the week
/// stays unprocessed.
pub fn rank_week(scores: &[ScoreEntity], members: &[MemberEntity]) -> Vec<RankedScore> {
    let names: HashMap<Uuid, &str> = members
        .iter()
        .map(|m| (m.user_id, m.display_name.as_str()))
        .collect();

    let mut ranked: Vec<RankedScore> = scores
        .iter()
        .filter_map(|score| {
            let net = score.net_total?;
            let gross = score.gross_total?;
            let display_name = names.get(&score.user_id)?;
            Some(RankedScore {
                user_id: score.user_id,
                display_name: (*display_name).to_owned(),
                net,
                gross,
            })
        })
        .collect();

    ranked.sort_by(|a, b| a.net.cmp(&b.net).then(a.gross.cmp(&b.gross)));
    ranked
}

/// The week's individual winner, if anyone posted a complete round.
pub fn week_winner(ranked: &[RankedScore]) -> Option<&RankedScore> {
    ranked.first()
}
