//! Season phase predicates.
//!
//! League state lives in the document store, so transitions are expressed
//! as pure predicates over a league snapshot and the tick's dates; the
//! store applies the matching compare-and-set write. A predicate returning
//! false is always a silent no-op.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc, Weekday};

use crate::dao::models::{LeagueEntity, LeagueStatus};

/// Hours after tee-off when an 18-hole round is expected to be done.
const REMINDER_DELAY_18: u32 = 6;
/// Hours after tee-off when a 9-hole round is expected to be done.
const REMINDER_DELAY_9: u32 = 4;
/// Tolerance around the reminder hour, in hours.
const REMINDER_TOLERANCE: u32 = 1;

/// The canonical-zone dates and hour one processor tick operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickDates {
    /// Today in the canonical zone.
    pub today: NaiveDate,
    /// Tomorrow in the canonical zone.
    pub tomorrow: NaiveDate,
    /// Yesterday in the canonical zone.
    pub yesterday: NaiveDate,
    /// Hour of day (0..=23) in the canonical zone.
    pub hour: u32,
}

impl TickDates {
    /// Resolve an instant into the canonical zone given its UTC offset.
    pub fn at(now: DateTime<Utc>, utc_offset_hours: i32) -> Self {
        let local = now + Duration::hours(i64::from(utc_offset_hours));
        let today = local.date_naive();
        TickDates {
            today,
            tomorrow: today + Duration::days(1),
            yesterday: today - Duration::days(1),
            hour: local.hour(),
        }
    }

    /// Today's `YYYY-MM-DD` key.
    pub fn today_key(&self) -> String {
        date_key(self.today)
    }

    /// Tomorrow's `YYYY-MM-DD` key.
    pub fn tomorrow_key(&self) -> String {
        date_key(self.tomorrow)
    }

    /// Lowercase weekday name for today.
    pub fn today_weekday(&self) -> &'static str {
        weekday_name(self.today.weekday())
    }

    /// Lowercase weekday name for yesterday.
    pub fn yesterday_weekday(&self) -> &'static str {
        weekday_name(self.yesterday.weekday())
    }
}

/// `YYYY-MM-DD` key for a date, matching stored league date fields.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Lowercase full weekday name, matching stored `play_day` values.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Hour component of a `HH:MM` tee time.
pub fn tee_hour(tee_time: &str) -> Option<u32> {
    let hour: u32 = tee_time.split(':').next()?.parse().ok()?;
    (hour < 24).then_some(hour)
}

/// The league should get its "starting tomorrow" batch this tick.
pub fn announcement_due(league: &LeagueEntity, dates: &TickDates) -> bool {
    league.status == LeagueStatus::Upcoming
        && league.start_date == dates.tomorrow_key()
        && league.last_notified_starting.as_deref() != Some(dates.today_key().as_str())
}

/// The league starts today and should flip to active.
pub fn activation_due(league: &LeagueEntity, dates: &TickDates) -> bool {
    // Once active the status predicate no longer matches, which is the
    // whole idempotency guard for this transition.
    league.status == LeagueStatus::Upcoming && league.start_date == dates.today_key()
}

/// Inclusive hour window in which score reminders go out.
pub fn reminder_window(holes_per_round: u32, tee_hour: u32) -> (u32, u32) {
    let delay = if holes_per_round == 9 {
        REMINDER_DELAY_9
    } else {
        REMINDER_DELAY_18
    };
    let center = tee_hour + delay;
    (
        center.saturating_sub(REMINDER_TOLERANCE),
        (center + REMINDER_TOLERANCE).min(23),
    )
}

/// If reminders are due this tick, the `date:week` marker key to claim.
///
/// Due means: active league, today is the play day, the current hour sits
/// in the post-round window, and the marker has not been claimed yet.
pub fn reminder_due(league: &LeagueEntity, dates: &TickDates) -> Option<String> {
    if league.status != LeagueStatus::Active {
        return None;
    }
    if !league.play_day.eq_ignore_ascii_case(dates.today_weekday()) {
        return None;
    }
    let tee = tee_hour(&league.tee_time)?;
    let (from, to) = reminder_window(league.holes_per_round, tee);
    if dates.hour < from || dates.hour > to {
        return None;
    }
    let key = format!("{}:{}", dates.today_key(), league.current_week);
    if league.last_score_reminder.as_deref() == Some(key.as_str()) {
        return None;
    }
    Some(key)
}

/// The league played yesterday and its current week is still unprocessed.
pub fn completion_due(league: &LeagueEntity, dates: &TickDates) -> bool {
    league.status == LeagueStatus::Active
        && league.play_day.eq_ignore_ascii_case(dates.yesterday_weekday())
        && league.last_processed_week != Some(league.current_week)
}

/// What happens to a league after its current week's results are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonStep {
    /// Move on to the given week.
    Advance {
        /// The week the league enters next.
        next_week: u32,
    },
    /// The season is over; crown a champion.
    Complete,
}

/// Advance-or-complete decision for a league that just resolved its
/// current week.
pub fn next_step(league: &LeagueEntity) -> SeasonStep {
    if league.current_week >= league.total_weeks {
        SeasonStep::Complete
    } else {
        SeasonStep::Advance {
            next_week: league.current_week + 1,
        }
    }
}
