use std::{str::FromStr, time::Duration};
use tracing::warn;

const DEFAULT_PORT: usize = 8000;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;
const DEFAULT_VAPI_BASE_URL: &str = "https://api.vapi.ai";
const DEFAULT_VAPI_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Postgres connection string. When it is missing the `Reminder`s are
    /// only kept in memory and are lost on restart.
    pub database_url: Option<String>,
    /// How often the store is polled for due `Reminder`s
    pub poll_interval: Duration,
    pub vapi: VapiConfig,
}

#[derive(Debug, Clone)]
pub struct VapiConfig {
    pub api_key: String,
    /// The Vapi phone number the calls are placed from
    pub phone_number_id: String,
    pub base_url: String,
    /// Upper bound for a single call request
    pub timeout: Duration,
}

impl VapiConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.phone_number_id.is_empty()
    }
}

fn parse_env_or<T: FromStr + std::fmt::Display>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(value) => match value.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default value: {}.",
                    name, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn new() -> Self {
        let port = parse_env_or("PORT", DEFAULT_PORT);
        let poll_interval_secs =
            match parse_env_or("REMINDER_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS) {
                0 => {
                    warn!(
                        "REMINDER_POLL_INTERVAL_SECS must be positive, falling back to {}.",
                        DEFAULT_POLL_INTERVAL_SECS
                    );
                    DEFAULT_POLL_INTERVAL_SECS
                }
                secs => secs,
            };

        let vapi = VapiConfig {
            api_key: non_empty_env("VAPI_API_KEY").unwrap_or_default(),
            phone_number_id: non_empty_env("VAPI_PHONE_NUMBER_ID").unwrap_or_default(),
            base_url: non_empty_env("VAPI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_VAPI_BASE_URL.to_string()),
            timeout: Duration::from_secs(parse_env_or(
                "VAPI_TIMEOUT_SECS",
                DEFAULT_VAPI_TIMEOUT_SECS,
            )),
        };
        if !vapi.is_configured() {
            warn!("VAPI_API_KEY or VAPI_PHONE_NUMBER_ID is missing. Due reminders will fail until they are set.");
        }

        Self {
            port,
            database_url: non_empty_env("DATABASE_URL"),
            poll_interval: Duration::from_secs(poll_interval_secs),
            vapi,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
