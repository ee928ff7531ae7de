// Time Provider Port (for testability)

use chrono::{DateTime, Local, Utc};

/// Time provider interface (allows mocking in tests)
#[cfg_attr(test, mockall::automock)]
pub trait TimeProvider: Send + Sync {
    /// Get current time in milliseconds since epoch
    fn now_millis(&self) -> i64;

    /// Wall-clock time of day as `HH:MM`, used for call events
    fn clock_label(&self) -> String;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn clock_label(&self) -> String {
        Local::now().format("%H:%M").to_string()
    }
}

/// Frozen clock for deterministic tests and replays (UTC labels)
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeProvider {
    millis: i64,
}

impl FixedTimeProvider {
    pub fn new(millis: i64) -> Self {
        Self { millis }
    }
}

impl TimeProvider for FixedTimeProvider {
    fn now_millis(&self) -> i64 {
        self.millis
    }

    fn clock_label(&self) -> String {
        DateTime::<Utc>::from_timestamp_millis(self.millis)
            .map(|dt| dt.format("%H:%M").to_string())
            .unwrap_or_else(|| "00:00".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_label() {
        // 1970-01-01T09:05:00Z
        let clock = FixedTimeProvider::new((9 * 60 + 5) * 60 * 1000);
        assert_eq!(clock.clock_label(), "09:05");
        assert_eq!(clock.now_millis(), 32_700_000);
    }

    #[test]
    fn test_system_clock_label_shape() {
        let label = SystemTimeProvider.clock_label();
        assert_eq!(label.len(), 5);
        assert_eq!(&label[2..3], ":");
    }
}
