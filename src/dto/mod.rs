/// Health check payloads.
pub mod health;
/// Processor tick report payloads.
pub mod process;
/// Score submission payloads.
pub mod scores;
