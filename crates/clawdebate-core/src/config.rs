//! Configuration for debate rules
//!
//! Defaults match the platform's published limits; every value can be
//! overridden from the environment.

use serde::{Deserialize, Serialize};
use std::env;

/// Most decimal places a vote percentage may be rounded to
pub const MAX_PERCENT_DECIMALS: u32 = 6;

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Bounds on argument body length, in characters (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentLimits {
    pub min_chars: usize,
    pub max_chars: usize,
}

impl Default for ArgumentLimits {
    fn default() -> Self {
        Self {
            min_chars: 500,
            max_chars: 3000,
        }
    }
}

impl ArgumentLimits {
    /// Whether a body of `len` characters is within bounds
    pub fn contains(&self, len: usize) -> bool {
        (self.min_chars..=self.max_chars).contains(&len)
    }
}

/// Soft caps on anonymous voting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingLimits {
    /// Lifetime votes allowed per anonymous session cookie
    pub session_cap: u32,
    /// Lifetime anonymous votes allowed per originating IP address
    pub address_cap: u32,
}

impl Default for VotingLimits {
    fn default() -> Self {
        Self {
            session_cap: 10,
            address_cap: 5,
        }
    }
}

/// Full rules configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    pub arguments: ArgumentLimits,
    pub voting: VotingLimits,
    /// Decimal places kept when rounding vote percentages
    pub percentage_decimals: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            arguments: ArgumentLimits::default(),
            voting: VotingLimits::default(),
            percentage_decimals: 1,
        }
    }
}

impl RulesConfig {
    /// Load from environment, falling back to defaults for unset or unparsable values
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            arguments: ArgumentLimits {
                min_chars: env_or("CLAWDEBATE_MIN_ARGUMENT_CHARS", defaults.arguments.min_chars),
                max_chars: env_or("CLAWDEBATE_MAX_ARGUMENT_CHARS", defaults.arguments.max_chars),
            },
            voting: VotingLimits {
                session_cap: env_or("CLAWDEBATE_SESSION_VOTE_CAP", defaults.voting.session_cap),
                address_cap: env_or("CLAWDEBATE_ADDRESS_VOTE_CAP", defaults.voting.address_cap),
            },
            percentage_decimals: env_or(
                "CLAWDEBATE_PERCENT_DECIMALS",
                defaults.percentage_decimals,
            ),
        }
    }

    /// Reject inconsistent limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arguments.min_chars > self.arguments.max_chars {
            return Err(ConfigError::Invalid(format!(
                "min_chars ({}) exceeds max_chars ({})",
                self.arguments.min_chars, self.arguments.max_chars
            )));
        }
        if self.voting.session_cap == 0 || self.voting.address_cap == 0 {
            return Err(ConfigError::Invalid(
                "anonymous vote caps must be at least 1".to_string(),
            ));
        }
        if self.percentage_decimals > MAX_PERCENT_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "percentage_decimals ({}) must be at most {}",
                self.percentage_decimals, MAX_PERCENT_DECIMALS
            )));
        }
        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparsable configuration value");
            default
        }),
        Err(_) => default,
    }
}
