//! Client configuration management.
//!
//! Consolidates all environment variable reads, applies command line
//! overrides and provides validated configuration.

use private_blackjack::{
    BetRules, Chips,
    session::{DEFAULT_BET_UNIT, DEFAULT_MAX_BET},
};
use std::{fmt, str::FromStr, time::Duration};

/// Default server origin
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Which bet ceiling applies
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BetPolicy {
    /// Bets are capped at the configured maximum
    #[default]
    Strict,
    /// No upper bound; the server has the last word
    Lenient,
}

impl FromStr for BetPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(ConfigError::Invalid {
                var: "BLACKJACK_BET_POLICY".to_string(),
                reason: format!("Expected 'strict' or 'lenient', got '{other}'"),
            }),
        }
    }
}

/// Shared identity sent with every request
#[derive(Clone, Eq, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Values given on the command line. They win over the environment.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub server_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub bet_policy: Option<BetPolicy>,
    pub request_timeout_secs: Option<u64>,
}

/// Complete client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Server origin, e.g. `http://localhost:8080`
    pub server_url: String,
    pub credentials: Credentials,
    pub bet_policy: BetPolicy,
    pub bet_unit: Chips,
    /// Ceiling for the strict policy
    pub bet_max: Chips,
    /// Per-request timeout; `None` waits as long as the server takes
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or a value can't be
    /// parsed.
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(overrides, |key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_url = overrides
            .server_url
            .or_else(|| lookup("BLACKJACK_SERVER_URL"))
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let username = required(overrides.username, &lookup, "BLACKJACK_USERNAME")?;
        let password = required(overrides.password, &lookup, "BLACKJACK_PASSWORD")?;

        let bet_policy = match overrides.bet_policy {
            Some(policy) => policy,
            None => lookup("BLACKJACK_BET_POLICY")
                .map(|v| v.parse::<BetPolicy>())
                .transpose()?
                .unwrap_or_default(),
        };

        let request_timeout_secs = match overrides.request_timeout_secs {
            Some(secs) => Some(secs),
            None => parse_lookup(&lookup, "BLACKJACK_REQUEST_TIMEOUT_SECS")?,
        };

        Ok(Self {
            server_url,
            credentials: Credentials { username, password },
            bet_policy,
            bet_unit: parse_lookup(&lookup, "BLACKJACK_BET_UNIT")?.unwrap_or(DEFAULT_BET_UNIT),
            bet_max: parse_lookup(&lookup, "BLACKJACK_BET_MAX")?.unwrap_or(DEFAULT_MAX_BET),
            request_timeout: request_timeout_secs.map(Duration::from_secs),
        })
    }

    /// Validate configuration after loading
    ///
    /// # Errors
    ///
    /// Returns the first setting that is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bet_unit <= 0 {
            return Err(ConfigError::Invalid {
                var: "BLACKJACK_BET_UNIT".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.bet_policy == BetPolicy::Strict && self.bet_max < self.bet_unit {
            return Err(ConfigError::Invalid {
                var: "BLACKJACK_BET_MAX".to_string(),
                reason: format!("Must be at least the bet unit ({})", self.bet_unit),
            });
        }

        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::Invalid {
                var: "BLACKJACK_REQUEST_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "BLACKJACK_SERVER_URL".to_string(),
                reason: format!(
                    "Must start with http:// or https://, got '{}'",
                    self.server_url
                ),
            });
        }

        Ok(())
    }

    /// Bet rules for the configured policy.
    #[must_use]
    pub const fn bet_rules(&self) -> BetRules {
        match self.bet_policy {
            BetPolicy::Strict => BetRules::new(self.bet_unit, Some(self.bet_max)),
            BetPolicy::Lenient => BetRules::new(self.bet_unit, None),
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required setting: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn required<F>(value: Option<String>, lookup: &F, var: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    value
        .or_else(|| lookup(var))
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingRequired {
            var: var.to_string(),
            hint: format!(
                "Set {var} or pass --{}",
                var.trim_start_matches("BLACKJACK_").to_lowercase()
            ),
        })
}

/// Parse an optional variable. Unset is `None`; unparsable is an error.
fn parse_lookup<T, F>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|v| {
            v.trim().parse().map_err(|_| ConfigError::Invalid {
                var: var.to_string(),
                reason: format!("'{v}' is not a valid number"),
            })
        })
        .transpose()
}
