//! Application-level runtime configuration, read from the environment.

use std::env;

use tracing::warn;

/// Environment variable holding the canonical zone's UTC offset in hours.
const UTC_OFFSET_ENV: &str = "FAIRWAY_UTC_OFFSET_HOURS";
/// Environment variable holding the notification time-to-live in days.
const NOTIFICATION_TTL_ENV: &str = "FAIRWAY_NOTIFICATION_TTL_DAYS";

/// Offset bounds accepted for the canonical zone.
const OFFSET_RANGE: std::ops::RangeInclusive<i32> = -12..=14;
/// Notification TTL used when the environment does not override it.
const DEFAULT_NOTIFICATION_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// UTC offset (hours) of the canonical zone all date math runs in.
    /// The platform scheduler and the engine agree on this by deployment.
    pub utc_offset_hours: i32,
    /// Days until a written notification record expires.
    pub notification_ttl_days: i64,
}

impl AppConfig {
    /// Load the configuration from the environment, falling back to
    /// defaults for anything missing or unparsable.
    pub fn from_env() -> Self {
        let utc_offset_hours = read_int::<i32>(UTC_OFFSET_ENV)
            .filter(|offset| {
                let ok = OFFSET_RANGE.contains(offset);
                if !ok {
                    warn!(offset = *offset, "UTC offset out of range; using 0");
                }
                ok
            })
            .unwrap_or(0);

        let notification_ttl_days = read_int::<i64>(NOTIFICATION_TTL_ENV)
            .filter(|days| *days > 0)
            .unwrap_or(DEFAULT_NOTIFICATION_TTL_DAYS);

        Self {
            utc_offset_hours,
            notification_ttl_days,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 0,
            notification_ttl_days: DEFAULT_NOTIFICATION_TTL_DAYS,
        }
    }
}

fn read_int<T: std::str::FromStr>(var: &'static str) -> Option<T> {
    let raw = env::var(var).ok()?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var, value = %raw, "unparsable value; using default");
            None
        }
    }
}
