/// Result-computation strategies per league format.
pub mod format;
/// Handicap-stroke allocation and round score math.
pub mod handicap;
/// Purse and prize computation.
pub mod purse;
/// Season phase predicates and week advancement.
pub mod season;
/// Cumulative standings math and position assignment.
pub mod standings;
