use thiserror::Error;

use crate::scheduler::ReactivationPolicy;

/// Configuration errors raised at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVariable(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Service configuration, assembled once at startup from the environment
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// PostgreSQL connection URL for the instrument registry
    pub database_url: String,

    /// Maximum connections in the registry pool
    pub db_pool_max_size: u32,

    /// Base URL of the market data provider API
    pub market_data_base_url: String,

    /// Optional bearer token for the provider
    pub market_data_api_token: Option<String>,

    /// Instruments requested per listing page
    pub sync_page_size: u32,

    /// Hard cap on pagination loops per sync run
    pub sync_max_pages: u32,

    /// Reactivation pass parameters
    pub reactivation: ReactivationPolicy,

    /// Address the HTTP server binds to
    pub server_addr: String,
}

impl SyncConfig {
    /// Load configuration from environment variables
    ///
    /// `DATABASE_URL` and `MARKET_DATA_BASE_URL` are required; everything else
    /// has documented defaults. Unparseable numeric values are fatal rather
    /// than silently defaulted.
    pub fn from_env() -> Result<Self, ConfigError> {
        let default_policy = ReactivationPolicy::default();

        let reactivation = ReactivationPolicy {
            limit: parse_or("REACTIVATE_LIMIT", default_policy.limit)?,
            cooldown_minutes: parse_or(
                "REACTIVATE_COOLDOWN_MINUTES",
                default_policy.cooldown_minutes,
            )?,
            stale_minutes: parse_or("REACTIVATE_STALE_MINUTES", default_policy.stale_minutes)?,
        };
        validate_policy(&reactivation)?;

        Ok(Self {
            database_url: require("DATABASE_URL")?,
            db_pool_max_size: parse_or("DB_POOL_MAX_SIZE", 10)?,
            market_data_base_url: require("MARKET_DATA_BASE_URL")?,
            market_data_api_token: std::env::var("MARKET_DATA_API_TOKEN").ok(),
            sync_page_size: parse_or("SYNC_PAGE_SIZE", 100)?,
            sync_max_pages: parse_or("SYNC_MAX_PAGES", 50)?,
            reactivation,
            server_addr: std::env::var("SERVER_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:3000".to_string()),
        })
    }
}

/// Reactivation parameters parse as signed integers but must not be negative;
/// a negative limit would fail inside the batch query instead of at startup.
fn validate_policy(policy: &ReactivationPolicy) -> Result<(), ConfigError> {
    if policy.limit < 0 {
        return Err(ConfigError::InvalidValue {
            name: "REACTIVATE_LIMIT",
            value: policy.limit.to_string(),
        });
    }
    if policy.cooldown_minutes < 0 {
        return Err(ConfigError::InvalidValue {
            name: "REACTIVATE_COOLDOWN_MINUTES",
            value: policy.cooldown_minutes.to_string(),
        });
    }
    if policy.stale_minutes < 0 {
        return Err(ConfigError::InvalidValue {
            name: "REACTIVATE_STALE_MINUTES",
            value: policy.stale_minutes.to_string(),
        });
    }
    Ok(())
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVariable(name))
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => parse_value(name, value),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_uses_default_when_unset() {
        assert_eq!(parse_or::<u32>("NO_SUCH_VARIABLE_SET", 42).unwrap(), 42);
    }

    // parse_value is tested directly so the tests never mutate the process
    // environment, which is shared across parallel tests
    #[test]
    fn test_parse_value_rejects_garbage() {
        let err = parse_value::<u32>("SYNC_PAGE_SIZE", "not-a-number".to_string()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "SYNC_PAGE_SIZE",
                ..
            }
        ));
    }

    #[test]
    fn test_parse_value_accepts_numeric() {
        assert_eq!(
            parse_value::<i64>("REACTIVATE_LIMIT", "75".to_string()).unwrap(),
            75
        );
    }

    #[test]
    fn test_negative_reactivation_limit_is_rejected() {
        let policy = ReactivationPolicy {
            limit: -1,
            ..ReactivationPolicy::default()
        };
        let err = validate_policy(&policy).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "REACTIVATE_LIMIT",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_cooldown_and_stale_are_rejected() {
        let negative_cooldown = ReactivationPolicy {
            cooldown_minutes: -5,
            ..ReactivationPolicy::default()
        };
        assert!(validate_policy(&negative_cooldown).is_err());

        let negative_stale = ReactivationPolicy {
            stale_minutes: -5,
            ..ReactivationPolicy::default()
        };
        assert!(validate_policy(&negative_stale).is_err());
    }

    #[test]
    fn test_default_policy_passes_validation() {
        assert!(validate_policy(&ReactivationPolicy::default()).is_ok());
    }
}
