//! Notification emission: pure per-event message formatting plus record
//! construction. Callers own idempotency; this module never writes twice
//! because it never writes at all; the processor persists the records.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::dao::models::{ChampionEntity, LeagueEntity, NotificationEntity, PrizeEntity};

/// A league lifecycle event worth telling members about.
#[derive(Debug, Clone)]
pub enum LeagueEvent<'a> {
    /// The season starts tomorrow.
    StartingTomorrow {
        /// The league in question.
        league: &'a LeagueEntity,
    },
    /// The season started today.
    SeasonStarted {
        /// The league in question.
        league: &'a LeagueEntity,
    },
    /// The recipient has not posted a score for the current week.
    ScoreReminder {
        /// The league in question.
        league: &'a LeagueEntity,
        /// Week the reminder is about.
        week: u32,
    },
    /// A week resolved with a winner.
    WeekWinner {
        /// The league in question.
        league: &'a LeagueEntity,
        /// The resolved week.
        week: u32,
        /// Winning member or team.
        winner: &'a ChampionEntity,
        /// Winning net score, when meaningful.
        net: Option<i32>,
        /// Whether the week was elevated.
        elevated: bool,
        /// Prize paid for the week, if any.
        prize: Option<&'a PrizeEntity>,
    },
    /// A new week began for a team-match league; one event per matchup
    /// side, so the message can name the opponent.
    MatchupAnnounced {
        /// The league in question.
        league: &'a LeagueEntity,
        /// The week that just began.
        week: u32,
        /// The recipient team's name.
        team_name: &'a str,
        /// The opposing team's name.
        opponent_name: &'a str,
    },
    /// A new week began for a stroke league.
    WeekStarted {
        /// The league in question.
        league: &'a LeagueEntity,
        /// The week that just began.
        week: u32,
    },
    /// The season completed and a champion was crowned.
    SeasonComplete {
        /// The league in question.
        league: &'a LeagueEntity,
        /// The champion member or team.
        champion: &'a ChampionEntity,
        /// Championship prize, if the league carries a purse.
        prize: Option<&'a PrizeEntity>,
    },
}

impl LeagueEvent<'_> {
    /// Stable event type tag stored on the notification record.
    pub fn kind(&self) -> &'static str {
        match self {
            LeagueEvent::StartingTomorrow { .. } => "league_starting",
            LeagueEvent::SeasonStarted { .. } => "league_started",
            LeagueEvent::ScoreReminder { .. } => "score_reminder",
            LeagueEvent::WeekWinner { .. } => "week_winner",
            LeagueEvent::MatchupAnnounced { .. } => "matchup_announced",
            LeagueEvent::WeekStarted { .. } => "week_started",
            LeagueEvent::SeasonComplete { .. } => "season_complete",
        }
    }

    fn league(&self) -> &LeagueEntity {
        match self {
            LeagueEvent::StartingTomorrow { league }
            | LeagueEvent::SeasonStarted { league }
            | LeagueEvent::ScoreReminder { league, .. }
            | LeagueEvent::WeekWinner { league, .. }
            | LeagueEvent::MatchupAnnounced { league, .. }
            | LeagueEvent::WeekStarted { league, .. }
            | LeagueEvent::SeasonComplete { league, .. } => league,
        }
    }

    fn week(&self) -> Option<u32> {
        match self {
            LeagueEvent::StartingTomorrow { .. } | LeagueEvent::SeasonStarted { .. } => None,
            LeagueEvent::ScoreReminder { week, .. }
            | LeagueEvent::WeekWinner { week, .. }
            | LeagueEvent::MatchupAnnounced { week, .. }
            | LeagueEvent::WeekStarted { week, .. } => Some(*week),
            LeagueEvent::SeasonComplete { league, .. } => Some(league.total_weeks),
        }
    }
}

/// Render the user-facing message for an event.
pub fn message(event: &LeagueEvent<'_>) -> String {
    match event {
        LeagueEvent::StartingTomorrow { league } => {
            format!(
                "{} tees off tomorrow at {}. Good luck this season!",
                league.name, league.tee_time
            )
        }
        LeagueEvent::SeasonStarted { league } => {
            format!("{} is underway. Week 1 is live!", league.name)
        }
        LeagueEvent::ScoreReminder { league, week } => {
            format!(
                "Don't forget to post your week {} score for {}.",
                week, league.name
            )
        }
        LeagueEvent::WeekWinner {
            league,
            week,
            winner,
            net,
            elevated,
            prize,
        } => {
            let mut text = match net {
                Some(net) => format!(
                    "{} won week {} of {} with a net {}.",
                    winner.name, week, league.name, net
                ),
                None => format!("{} won week {} of {}.", winner.name, week, league.name),
            };
            if let Some(prize) = prize {
                text.push_str(&format!(" Prize: {} {}.", prize.amount, prize.currency));
            }
            if *elevated {
                text.push_str(" Elevated week: points counted double!");
            }
            text
        }
        LeagueEvent::MatchupAnnounced {
            league,
            week,
            team_name,
            opponent_name,
        } => {
            format!(
                "Week {} of {}: {} plays {}.",
                week, league.name, team_name, opponent_name
            )
        }
        LeagueEvent::WeekStarted { league, week } => {
            format!("Week {} of {} is live.", week, league.name)
        }
        LeagueEvent::SeasonComplete {
            league,
            champion,
            prize,
        } => {
            let mut text = format!("{} is your {} champion!", champion.name, league.name);
            if let Some(prize) = prize {
                text.push_str(&format!(
                    " Championship prize: {} {}.",
                    prize.amount, prize.currency
                ));
            }
            text
        }
    }
}

/// Build one notification record per recipient for an event.
pub fn build_notifications(
    event: &LeagueEvent<'_>,
    recipients: &[Uuid],
    now: DateTime<Utc>,
    ttl_days: i64,
) -> Vec<NotificationEntity> {
    let league = event.league();
    let text = message(event);
    let (actor_id, actor_name) = match event {
        LeagueEvent::WeekWinner { winner, .. } => (Some(winner.id), Some(winner.name.clone())),
        LeagueEvent::SeasonComplete { champion, .. } => {
            (Some(champion.id), Some(champion.name.clone()))
        }
        _ => (None, None),
    };
    let team_name = match event {
        LeagueEvent::MatchupAnnounced { team_name, .. } => Some((*team_name).to_owned()),
        _ => None,
    };

    recipients
        .iter()
        .map(|user_id| NotificationEntity {
            id: Uuid::new_v4(),
            user_id: *user_id,
            kind: event.kind().to_owned(),
            actor_id,
            actor_name: actor_name.clone(),
            actor_avatar: None,
            league_id: Some(league.id),
            league_name: Some(league.name.clone()),
            week: event.week(),
            team_name: team_name.clone(),
            message: text.clone(),
            read: false,
            created_at: now,
            expires_at: now + Duration::days(ttl_days),
        })
        .collect()
}
