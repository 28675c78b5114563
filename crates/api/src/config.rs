use std::time::Duration;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background jobs to stop (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub jobs: JobsConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = env_parse("REQUEST_TIMEOUT_SECS", 30u64);
        let shutdown_timeout_secs = env_parse("SHUTDOWN_TIMEOUT_SECS", 30u64);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            jobs: JobsConfig::from_env(),
        }
    }
}

/// Schedule and thresholds for the background jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobsConfig {
    /// `Parked` bookings older than this are expired.
    pub booking_expiry_hours: i64,
    pub expiry_sweep_interval: Duration,
    /// Vehicles parked longer than this get a reminder.
    pub long_parking_hours: i64,
    /// Users without a booking for this many days get a reminder.
    pub inactivity_days: i64,
    /// Period of the reminder job; the monthly report piggybacks on it.
    pub reminder_interval: Duration,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            booking_expiry_hours: 24,
            expiry_sweep_interval: Duration::from_secs(3600),
            long_parking_hours: 8,
            inactivity_days: 7,
            reminder_interval: Duration::from_secs(86_400),
        }
    }
}

impl JobsConfig {
    /// Load job settings from environment variables with defaults.
    ///
    /// | Env Var                      | Default  |
    /// |------------------------------|----------|
    /// | `BOOKING_EXPIRY_HOURS`       | `24`     |
    /// | `EXPIRY_SWEEP_INTERVAL_SECS` | `3600`   |
    /// | `LONG_PARKING_HOURS`         | `8`      |
    /// | `INACTIVITY_DAYS`            | `7`      |
    /// | `REMINDER_INTERVAL_SECS`     | `86400`  |
    ///
    /// # Panics
    ///
    /// Panics if any value is zero or negative.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            booking_expiry_hours: env_positive("BOOKING_EXPIRY_HOURS", defaults.booking_expiry_hours),
            expiry_sweep_interval: Duration::from_secs(env_positive(
                "EXPIRY_SWEEP_INTERVAL_SECS",
                defaults.expiry_sweep_interval.as_secs(),
            )),
            long_parking_hours: env_positive("LONG_PARKING_HOURS", defaults.long_parking_hours),
            inactivity_days: env_positive("INACTIVITY_DAYS", defaults.inactivity_days),
            reminder_interval: Duration::from_secs(env_positive(
                "REMINDER_INTERVAL_SECS",
                defaults.reminder_interval.as_secs(),
            )),
        }
    }
}

/// Read `name` and parse it, falling back to `default` when unset.
///
/// # Panics
///
/// Panics if the variable is set but does not parse.
fn env_parse<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid number, got '{raw}'")),
        Err(_) => default,
    }
}

/// Like [`env_parse`], but the value must be strictly positive.
fn env_positive<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default + std::fmt::Display,
{
    require_positive(name, env_parse(name, default))
}

fn require_positive<T>(name: &str, value: T) -> T
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value <= T::default() {
        panic!("{name} must be a positive number, got '{value}'");
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_defaults_match_documented_values() {
        let jobs = JobsConfig::default();
        assert_eq!(jobs.booking_expiry_hours, 24);
        assert_eq!(jobs.long_parking_hours, 8);
        assert_eq!(jobs.inactivity_days, 7);
        assert_eq!(jobs.reminder_interval, Duration::from_secs(86_400));
    }

    #[test]
    fn env_parse_falls_back_when_unset() {
        assert_eq!(env_parse("PARKWISE_TEST_SURELY_UNSET_VAR", 42u64), 42);
    }

    #[test]
    #[should_panic(expected = "EXPIRY_SWEEP_INTERVAL_SECS must be a positive number, got '0'")]
    fn zero_sweep_interval_is_rejected() {
        require_positive("EXPIRY_SWEEP_INTERVAL_SECS", 0u64);
    }

    #[test]
    #[should_panic(expected = "BOOKING_EXPIRY_HOURS must be a positive number, got '-5'")]
    fn negative_expiry_hours_are_rejected() {
        require_positive("BOOKING_EXPIRY_HOURS", -5i64);
    }

    #[test]
    #[should_panic(expected = "PARKWISE_TEST_ZERO_INTERVAL_SECS must be a positive number")]
    fn zero_from_environment_is_rejected() {
        std::env::set_var("PARKWISE_TEST_ZERO_INTERVAL_SECS", "0");
        env_positive("PARKWISE_TEST_ZERO_INTERVAL_SECS", 3600u64);
    }

    #[test]
    fn positive_values_pass_through() {
        assert_eq!(require_positive("LONG_PARKING_HOURS", 8i64), 8);
        assert_eq!(env_positive("PARKWISE_TEST_SURELY_UNSET_INTERVAL", 60u64), 60);
    }
}
