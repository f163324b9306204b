//! The configuration the CLI collaborator hands to the core.

use crate::error::SwitchError;

/// Runtime-tunable knobs. Everything else (capacity, the default
/// port) is wired once at startup and is not user-configurable.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub min_ttl_seconds: u64,
    pub cleanup_period_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_ttl_seconds: crate::cam::DEFAULT_MIN_TTL_SECS,
            cleanup_period_seconds: 1,
        }
    }
}

impl Config {
    /// Both knobs must be strictly positive; `0` would mean "never
    /// age" / "never sleep", neither of which is a valid setting.
    pub fn validate(self) -> Result<Self, SwitchError> {
        if self.min_ttl_seconds == 0 {
            return Err(SwitchError::Config {
                flag: 't',
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.cleanup_period_seconds == 0 {
            return Err(SwitchError::Config {
                flag: 'c',
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(self)
    }
}
