//! Configuration management for the travel planner.
//!
//! Configuration can be set via environment variables (a `.env` file in the
//! working directory is loaded first, if present):
//! - `GOOGLE_API_KEY` - Required. Your Gemini API key.
//! - `GEMINI_MODEL` - Optional. Model identifier. Defaults to `gemini-2.5-flash-lite`.
//! - `GEMINI_BASE_URL` - Optional. API base URL. Defaults to `https://generativelanguage.googleapis.com`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `8501`.
//! - `MAX_ITERATIONS` - Optional. Maximum agent loop iterations. Defaults to `10`.
//! - `REQUEST_TIMEOUT_SECS` - Optional. Per-request HTTP timeout. Defaults to `60`.
//! - `PLANNER_MODE` - Optional. `agent` or `direct`. Defaults to `agent`.
//! - `RETRY_ATTEMPTS` - Optional. Defaults to `5`.
//! - `RETRY_EXP_BASE` - Optional. Defaults to `7`.
//! - `RETRY_INITIAL_DELAY_SECS` - Optional. Defaults to `1`.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Which runtime the planning session delegates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerMode {
    /// The LLM decides which tools to call and in what order.
    Agent,
    /// Weather then packing are called directly, no model involved.
    Direct,
}

impl FromStr for PlannerMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "agent" | "llm" => Ok(Self::Agent),
            "direct" => Ok(Self::Direct),
            other => Err(format!("expected 'agent' or 'direct', got: {}", other)),
        }
    }
}

/// Retry policy handed to the model client.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub attempts: u32,

    /// Multiplier applied per retry
    pub exp_base: f64,

    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Upper bound for any single delay
    pub max_delay: Duration,

    /// HTTP statuses that trigger a retry
    pub http_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 5,
            exp_base: 7.0,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            http_status_codes: vec![429, 500, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `retry` (1-based).
    ///
    /// Never exceeds `max_delay`. A negative or NaN product falls back to
    /// `max_delay`; `Config::from_env` rejects the inputs that produce one.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
        let delay_secs = self.initial_delay.as_secs_f64() * self.exp_base.powi(exponent);
        let capped = delay_secs.min(self.max_delay.as_secs_f64());
        Duration::try_from_secs_f64(capped).unwrap_or(self.max_delay)
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.http_status_codes.contains(&status)
    }
}

/// Service configuration, validated once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key
    pub api_key: String,

    /// Gemini model identifier
    pub model: String,

    /// Gemini API base URL
    pub base_url: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,

    /// HTTP timeout for a single model request
    pub request_timeout: Duration,

    /// Runtime the planning session uses
    pub planner_mode: PlannerMode,

    /// Retry policy for the model client
    pub retry: RetryConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `GOOGLE_API_KEY` is not set or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("GOOGLE_API_KEY".to_string()))?;

        let model = std::env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| "gemini-2.5-flash-lite".to_string());

        let base_url = std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = parse_env("PORT", 8501)?;
        let max_iterations = parse_env("MAX_ITERATIONS", 10)?;
        let request_timeout = Duration::from_secs(parse_env("REQUEST_TIMEOUT_SECS", 60)?);

        let planner_mode = std::env::var("PLANNER_MODE")
            .ok()
            .map(|v| {
                v.parse::<PlannerMode>()
                    .map_err(|e| ConfigError::InvalidValue("PLANNER_MODE".to_string(), e))
            })
            .transpose()?
            .unwrap_or(PlannerMode::Agent);

        let defaults = RetryConfig::default();

        let exp_base: f64 = parse_env("RETRY_EXP_BASE", defaults.exp_base)?;
        if !exp_base.is_finite() || exp_base < 1.0 {
            return Err(ConfigError::InvalidValue(
                "RETRY_EXP_BASE".to_string(),
                format!("must be a finite number >= 1, got {}", exp_base),
            ));
        }

        let initial_delay_secs: f64 =
            parse_env("RETRY_INITIAL_DELAY_SECS", defaults.initial_delay.as_secs_f64())?;
        let initial_delay = Duration::try_from_secs_f64(initial_delay_secs).map_err(|e| {
            ConfigError::InvalidValue("RETRY_INITIAL_DELAY_SECS".to_string(), format!("{}", e))
        })?;

        let retry = RetryConfig {
            attempts: parse_env("RETRY_ATTEMPTS", defaults.attempts)?,
            exp_base,
            initial_delay,
            ..defaults
        };
        if retry.attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "RETRY_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            model,
            base_url,
            host,
            port,
            max_iterations,
            request_timeout,
            planner_mode,
            retry,
        })
    }

    /// Create a config with default values (useful for testing).
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "gemini-2.5-flash-lite".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8501,
            max_iterations: 10,
            request_timeout: Duration::from_secs(60),
            planner_mode: PlannerMode::Agent,
            retry: RetryConfig::default(),
        }
    }
}

fn parse_env<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(name.to_string(), format!("{}", e))),
        Err(_) => Ok(default),
    }
}
