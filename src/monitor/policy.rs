//! Polling policy and the backoff schedule derived from it.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::MonitorError;

fn default_initial_interval_ms() -> u64 {
    2_000
}

fn default_max_interval_ms() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    1.5
}

fn default_timeout_ms() -> u64 {
    60_000
}

/// Fixed for the lifetime of a monitoring session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingPolicy {
    #[serde(default = "default_initial_interval_ms")]
    pub initial_interval_ms: u64,
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self {
            initial_interval_ms: default_initial_interval_ms(),
            max_interval_ms: default_max_interval_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl PollingPolicy {
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.initial_interval_ms == 0 {
            return Err(MonitorError::InvalidPolicy(
                "initial_interval_ms must be greater than zero".into(),
            ));
        }
        if self.max_interval_ms < self.initial_interval_ms {
            return Err(MonitorError::InvalidPolicy(format!(
                "max_interval_ms ({}) must be >= initial_interval_ms ({})",
                self.max_interval_ms, self.initial_interval_ms
            )));
        }
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(MonitorError::InvalidPolicy(format!(
                "backoff_multiplier must be a finite number >= 1.0, got {}",
                self.backoff_multiplier
            )));
        }
        if self.timeout_ms == 0 {
            return Err(MonitorError::InvalidPolicy(
                "timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }

    /// Infinite schedule of waits between polls.
    pub fn backoff(&self) -> Backoff {
        Backoff::new(self)
    }
}

/// Yields `initial, initial*m, initial*m^2, ...` capped at `max_interval_ms`.
#[derive(Debug, Clone)]
pub struct Backoff {
    next_ms: u64,
    max_ms: u64,
    multiplier: f64,
}

impl Backoff {
    pub fn new(policy: &PollingPolicy) -> Self {
        Self {
            next_ms: policy.initial_interval_ms.min(policy.max_interval_ms),
            max_ms: policy.max_interval_ms,
            multiplier: policy.backoff_multiplier,
        }
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next_ms;
        let grown = (current as f64 * self.multiplier).round();
        self.next_ms = if grown >= self.max_ms as f64 {
            self.max_ms
        } else {
            grown as u64
        };
        Some(Duration::from_millis(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PollingPolicy::default();
        assert_eq!(policy.initial_interval_ms, 2_000);
        assert_eq!(policy.max_interval_ms, 10_000);
        assert_eq!(policy.backoff_multiplier, 1.5);
        assert_eq!(policy.timeout_ms, 60_000);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_default_backoff_sequence_is_capped() {
        let intervals: Vec<u64> = PollingPolicy::default()
            .backoff()
            .take(7)
            .map(|d| d.as_millis() as u64)
            .collect();
        assert_eq!(intervals, vec![2000, 3000, 4500, 6750, 10000, 10000, 10000]);
    }

    #[test]
    fn test_multiplier_of_one_is_constant() {
        let policy = PollingPolicy {
            backoff_multiplier: 1.0,
            ..PollingPolicy::default()
        };
        assert!(policy.backoff().take(5).all(|d| d == Duration::from_secs(2)));
    }

    #[test]
    fn test_invalid_policies_rejected() {
        let zero_initial = PollingPolicy {
            initial_interval_ms: 0,
            ..PollingPolicy::default()
        };
        assert!(matches!(
            zero_initial.validate(),
            Err(MonitorError::InvalidPolicy(_))
        ));

        let inverted = PollingPolicy {
            initial_interval_ms: 5_000,
            max_interval_ms: 1_000,
            ..PollingPolicy::default()
        };
        assert!(inverted.validate().is_err());

        let shrinking = PollingPolicy {
            backoff_multiplier: 0.5,
            ..PollingPolicy::default()
        };
        assert!(shrinking.validate().is_err());

        let nan = PollingPolicy {
            backoff_multiplier: f64::NAN,
            ..PollingPolicy::default()
        };
        assert!(nan.validate().is_err());

        let no_timeout = PollingPolicy {
            timeout_ms: 0,
            ..PollingPolicy::default()
        };
        assert!(no_timeout.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let policy: PollingPolicy = serde_yaml::from_str("timeout_ms: 5000\n").unwrap();
        assert_eq!(policy.timeout_ms, 5_000);
        assert_eq!(policy.initial_interval_ms, 2_000);
        assert_eq!(policy.backoff_multiplier, 1.5);
    }
}
