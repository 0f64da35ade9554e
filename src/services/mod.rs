/// Health check service.
pub mod health_service;
/// Notification message formatting and record construction.
pub mod notify;
/// The scheduled processor driving league phase transitions.
pub mod processor;
/// Score intake and round computation.
pub mod score_service;
/// Storage reconnection and degraded-mode supervision.
pub mod storage_supervisor;
