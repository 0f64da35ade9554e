/// Individual net-score ranking.
pub mod stroke_play;
/// Pairwise team totals with win/loss/tie outcomes.
pub mod team_match;
