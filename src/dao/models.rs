use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Competitive format a league is played under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeagueFormat {
    /// Individual ranking by net score.
    Stroke,
    /// Pairwise team totals with win/loss/tie outcomes.
    TeamMatch,
}

/// Lifecycle status of a league season.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LeagueStatus {
    /// Season configured but not yet started.
    Upcoming,
    /// Season in progress; weeks are being played and scored.
    Active,
    /// Season finished; champion and final standings are frozen.
    Completed,
    /// Season cancelled out-of-band; never processed again.
    Cancelled,
}

impl LeagueStatus {
    /// Stable string form used in store queries and filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeagueStatus::Upcoming => "upcoming",
            LeagueStatus::Active => "active",
            LeagueStatus::Completed => "completed",
            LeagueStatus::Cancelled => "cancelled",
        }
    }
}

/// Approval status of a submitted score card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScoreStatus {
    /// Submitted, awaiting approval.
    Pending,
    /// Approved; counts toward week results.
    Approved,
    /// Rejected; ignored by the engine.
    Rejected,
}

impl ScoreStatus {
    /// Stable string form used in store queries and filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreStatus::Pending => "pending",
            ScoreStatus::Approved => "approved",
            ScoreStatus::Rejected => "rejected",
        }
    }
}

/// Configured prize pools for a league.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PurseEntity {
    /// Pool paid once to the champion at season completion.
    pub season_pool: u32,
    /// Pool paid to each week's winner.
    pub weekly_pool: u32,
    /// Bonus pool added to the weekly prize on elevated weeks.
    pub elevated_pool: u32,
    /// ISO currency code shared by all pools.
    pub currency: String,
}

/// A concrete payout computed from the purse for one occasion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrizeEntity {
    /// Amount in whole currency units.
    pub amount: u32,
    /// ISO currency code.
    pub currency: String,
}

/// Elevated-week designation and its standings-point boost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElevatedEntity {
    /// Week indexes (1-based) flagged as elevated.
    pub weeks: Vec<u32>,
    /// Point multiplier applied to standings points on those weeks.
    pub multiplier: f64,
}

/// Per-format scoring knobs for team-match leagues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamScoringEntity {
    /// Points a team earns for winning its matchup.
    pub points_per_win: u32,
    /// Points each team earns when a matchup ties.
    pub points_per_tie: u32,
}

/// Champion reference written at season completion (member or team).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChampionEntity {
    /// Member user id or team id depending on the league format.
    pub id: Uuid,
    /// Display name at the moment the season completed.
    pub name: String,
}

/// Aggregate league entity persisted by the storage layer.
///
/// The idempotency markers (`last_*`) are written exclusively by the
/// scheduled processor, paired with the state they guard in a single
/// store update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeagueEntity {
    /// Primary key of the league.
    pub id: Uuid,
    /// Display name of the league.
    pub name: String,
    /// Competitive format.
    pub format: LeagueFormat,
    /// Holes per round, 9 or 18.
    pub holes_per_round: u32,
    /// Number of scored weeks in the season.
    pub total_weeks: u32,
    /// Weekday the league plays on, lowercase full name (e.g. "saturday").
    pub play_day: String,
    /// Tee time as `HH:MM` in the canonical zone.
    pub tee_time: String,
    /// First play date as a `YYYY-MM-DD` key in the canonical zone.
    pub start_date: String,
    /// Lifecycle status.
    pub status: LeagueStatus,
    /// 1-based index of the week currently being played.
    pub current_week: u32,
    /// Prize pools, absent when every pool is zero.
    pub purse: Option<PurseEntity>,
    /// Elevated-week configuration, if any weeks are designated.
    pub elevated: Option<ElevatedEntity>,
    /// Team-match scoring knobs; absent for stroke leagues.
    pub team_scoring: Option<TeamScoringEntity>,
    /// Champion, set once at season completion.
    pub champion: Option<ChampionEntity>,
    /// Championship payout, set with the champion when a purse exists.
    pub championship_prize: Option<PrizeEntity>,
    /// Date key of the last "starting tomorrow" notification batch.
    pub last_notified_starting: Option<String>,
    /// Date key of the activation run.
    pub last_activated: Option<String>,
    /// `date:week` key of the last score reminder batch.
    pub last_score_reminder: Option<String>,
    /// Highest week index whose results have been applied.
    pub last_processed_week: Option<u32>,
    /// Creation timestamp for auditing/debugging.
    pub created_at: DateTime<Utc>,
    /// Last time the league entity was updated.
    pub updated_at: DateTime<Utc>,
}

/// One week's frozen result snapshot inside a member document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberWeekEntity {
    /// Placement within the week, 1-based.
    pub placement: u32,
    /// Standings points earned (after the elevated multiplier).
    pub points: u32,
    /// Net score for the round.
    pub net: i32,
    /// Gross score for the round.
    pub gross: u32,
}

/// A participant's standing within a league.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberEntity {
    /// League the membership belongs to.
    pub league_id: Uuid,
    /// The member's user id.
    pub user_id: Uuid,
    /// Display name shown in standings and notifications.
    pub display_name: String,
    /// Membership status; only `"active"` members are processed.
    pub status: String,
    /// Cumulative standings points.
    pub total_points: u32,
    /// Sum of net scores over all scored rounds.
    pub net_sum: i64,
    /// Sum of gross scores over all scored rounds.
    pub gross_sum: i64,
    /// Number of rounds that counted toward standings.
    pub rounds_played: u32,
    /// Number of weeks won.
    pub wins: u32,
    /// Current position in the league table.
    pub position: Option<u32>,
    /// Position before the most recent standings update.
    pub previous_position: Option<u32>,
    /// Per-week result snapshots keyed by the week number as a string.
    #[serde(default)]
    pub weekly: BTreeMap<String, MemberWeekEntity>,
}

/// Increments and the week snapshot applied to one member after a week
/// resolves. Counters go through the store's atomic increment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberWeekDelta {
    /// Week the delta belongs to.
    pub week: u32,
    /// Placement within the week, 1-based.
    pub placement: u32,
    /// Standings points earned.
    pub points: u32,
    /// Net score for the round.
    pub net: i32,
    /// Gross score for the round.
    pub gross: u32,
    /// Whether the member won the week.
    pub won_week: bool,
}

/// A member's recomputed table position after a standings pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberPosition {
    /// The member's user id.
    pub user_id: Uuid,
    /// New position, ties sharing a number.
    pub position: u32,
    /// Position held before this pass.
    pub previous_position: Option<u32>,
}

/// Two or more members grouped for a team-match season.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Primary key of the team.
    pub id: Uuid,
    /// League the team belongs to.
    pub league_id: Uuid,
    /// Display name of the team.
    pub name: String,
    /// User ids of the roster.
    pub member_ids: Vec<Uuid>,
    /// Matchups won.
    pub wins: u32,
    /// Matchups lost.
    pub losses: u32,
    /// Matchups tied.
    pub ties: u32,
    /// Cumulative standings points.
    pub total_points: u32,
}

/// Counter increments applied to one team after its matchup resolves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamDelta {
    /// Win-count increment (0 or 1).
    pub wins: u32,
    /// Loss-count increment (0 or 1).
    pub losses: u32,
    /// Tie-count increment (0 or 1).
    pub ties: u32,
    /// Standings-point increment.
    pub points: u32,
}

/// A configured pairing of two teams for one week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchupEntity {
    /// League the matchup belongs to.
    pub league_id: Uuid,
    /// Week the matchup is played in.
    pub week: u32,
    /// Home side team id.
    pub home_team_id: Uuid,
    /// Away side team id.
    pub away_team_id: Uuid,
}

/// One hole of a score card after stroke allocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HoleScoreEntity {
    /// Hole number, 1-based.
    pub hole: u32,
    /// Par for the hole.
    pub par: u32,
    /// Yardage from the played tee.
    pub yardage: u32,
    /// Difficulty rank, 1 = hardest.
    pub stroke_index: u32,
    /// Gross strokes taken; absent while the hole is unscored.
    pub gross: Option<u32>,
    /// Handicap strokes allocated to the hole.
    pub strokes: u32,
    /// Net strokes (gross minus allocated); absent while unscored.
    pub adjusted: Option<i32>,
}

/// One player's one-round submission. Produced by the score-entry flow;
/// the batch engine only reads these and never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreEntity {
    /// Primary key of the score card.
    pub id: Uuid,
    /// League the score was submitted to.
    pub league_id: Uuid,
    /// Submitting member's user id.
    pub user_id: Uuid,
    /// Week the round belongs to.
    pub week: u32,
    /// Course the round was played on.
    pub course_id: String,
    /// Tee set the round was played from.
    pub tee_id: String,
    /// Course handicap used for stroke allocation.
    pub course_handicap: i32,
    /// Per-hole detail in hole order.
    pub holes: Vec<HoleScoreEntity>,
    /// Gross total; absent while any hole is unscored.
    pub gross_total: Option<u32>,
    /// Net total; absent while any hole is unscored.
    pub net_total: Option<i32>,
    /// Approval status.
    pub status: ScoreStatus,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
}

/// One line of a week's frozen ranked standings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekStandingEntity {
    /// The member's user id.
    pub user_id: Uuid,
    /// Display name at the time the week resolved.
    pub display_name: String,
    /// Placement within the week, 1-based.
    pub placement: u32,
    /// Standings points earned.
    pub points: u32,
    /// Net score for the round.
    pub net: i32,
    /// Gross score for the round.
    pub gross: u32,
}

/// Outcome of one team matchup inside a week result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchupResultEntity {
    /// Home side team id.
    pub home_team_id: Uuid,
    /// Away side team id.
    pub away_team_id: Uuid,
    /// Home combined net total; absent when no home member scored.
    pub home_total: Option<i32>,
    /// Away combined net total; absent when no away member scored.
    pub away_total: Option<i32>,
    /// Winning team, absent on a tie or when neither side scored.
    pub winner_team_id: Option<Uuid>,
    /// Whether the matchup tied with both sides scored.
    pub tie: bool,
}

/// Immutable record of one week's resolved outcome. Written exactly once
/// per (league, week).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekResultEntity {
    /// Primary key of the record.
    pub id: Uuid,
    /// League the result belongs to.
    pub league_id: Uuid,
    /// Week the result resolves.
    pub week: u32,
    /// Whether the week was elevated.
    pub elevated: bool,
    /// Prize awarded for the week, if the league carries a purse.
    pub prize: Option<PrizeEntity>,
    /// Week winner (member for stroke leagues, team for team leagues).
    pub winner: Option<ChampionEntity>,
    /// Full ranked standings snapshot for the week.
    pub standings: Vec<WeekStandingEntity>,
    /// Matchup outcomes; empty for stroke leagues.
    #[serde(default)]
    pub matchups: Vec<MatchupResultEntity>,
    /// Resolution timestamp.
    pub created_at: DateTime<Utc>,
}

/// A notification record handed to the delivery collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationEntity {
    /// Primary key of the record.
    pub id: Uuid,
    /// Recipient user id.
    pub user_id: Uuid,
    /// Event type tag (e.g. `league_started`, `score_reminder`).
    pub kind: String,
    /// User the event is about, when not the recipient.
    pub actor_id: Option<Uuid>,
    /// Display name of the actor.
    pub actor_name: Option<String>,
    /// Avatar URL of the actor, when the profile carries one.
    pub actor_avatar: Option<String>,
    /// League the event belongs to.
    pub league_id: Option<Uuid>,
    /// League display name, denormalised for rendering.
    pub league_name: Option<String>,
    /// Week number the event belongs to.
    pub week: Option<u32>,
    /// Team display name for team-related events.
    pub team_name: Option<String>,
    /// Rendered user-facing message.
    pub message: String,
    /// Read flag, always false at creation.
    pub read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Expiry timestamp after which delivery may drop the record.
    pub expires_at: DateTime<Utc>,
}

/// Static per-hole reference data for a course/tee pairing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HoleInfoEntity {
    /// Course identifier from the course-data collaborator.
    pub course_id: String,
    /// Tee set identifier.
    pub tee_id: String,
    /// Hole number, 1-based.
    pub hole: u32,
    /// Par for the hole.
    pub par: u32,
    /// Yardage from the tee.
    pub yardage: u32,
    /// Difficulty rank, 1 = hardest.
    pub stroke_index: u32,
}
