use serde::Serialize;

/// Summary of one processor tick, returned by the trigger route and
/// logged at the end of every run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Leagues that received their "starting tomorrow" batch.
    pub announced: u32,
    /// Leagues that flipped from upcoming to active.
    pub activated: u32,
    /// Leagues whose score reminders went out.
    pub reminded: u32,
    /// Leagues whose week resolved and moved to the next.
    pub weeks_advanced: u32,
    /// Leagues whose season completed.
    pub seasons_completed: u32,
    /// Leagues skipped because of an error; retried next tick.
    pub failures: u32,
}
