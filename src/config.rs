// src/config.rs

use std::{env, fmt, str::FromStr};

use dotenvy::dotenv;

/// Number of questions served per quiz unless overridden.
pub const DEFAULT_QUIZ_QUESTION_COUNT: i64 = 30;

/// Startup configuration, loaded once and shared immutably through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    pub rust_log: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub quiz_question_count: i64,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub guidance_timeout_secs: u64,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let cors_origins = vars
            .or("CORS_ORIGINS", "http://localhost:5173,http://127.0.0.1:5173")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url: vars.required("DATABASE_URL")?,
            jwt_secret: vars.required("JWT_SECRET")?,
            jwt_expiration_minutes: vars.parsed_or("JWT_EXPIRATION_MINUTES", 30)?,
            rust_log: vars.or("RUST_LOG", "info"),
            port: vars.parsed_or("PORT", 8000)?,
            cors_origins,
            quiz_question_count: vars
                .parsed_or("QUIZ_QUESTION_COUNT", DEFAULT_QUIZ_QUESTION_COUNT)?,
            gemini_api_key: vars.optional("GEMINI_API_KEY"),
            gemini_model: vars.or("GEMINI_MODEL", "gemini-1.5-flash"),
            gemini_base_url: vars.or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com",
            ),
            guidance_timeout_secs: vars.parsed_or("GUIDANCE_TIMEOUT_SECS", 30)?,
            admin_email: vars.optional("ADMIN_EMAIL"),
            admin_password: vars.optional("ADMIN_PASSWORD"),
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional(key).ok_or(ConfigError::Missing(key))
    }

    /// Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed_or<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.optional(key) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value }),
            None => Ok(default),
        }
    }
}
