//! Configuration loading from environment.

use std::env;
use std::str::FromStr;

/// Default database: a SQLite file next to the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://payments.db?mode=rwc";
/// Merchant used when none is given on the command line.
pub const DEFAULT_MERCHANT_ID: &str = "test@merchant";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unknown LOG_FORMAT: {} (expected text or json)", s),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub merchant_id: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let merchant_id = lookup("MERCHANT_ID").unwrap_or_else(|| DEFAULT_MERCHANT_ID.to_string());
        if merchant_id.is_empty() {
            anyhow::bail!("MERCHANT_ID must not be empty");
        }

        let log_format = lookup("LOG_FORMAT")
            .map(|s| s.parse())
            .transpose()?
            .unwrap_or(LogFormat::Text);

        Ok(Self {
            database_url,
            merchant_id,
            log_format,
        })
    }
}

/// Returns `url` with any password in its userinfo replaced by `***`, for logging.
pub fn redact_database_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let authority_start = scheme_end + 3;
    let authority_end = url[authority_start..]
        .find(['/', '?'])
        .map_or(url.len(), |i| authority_start + i);
    let authority = &url[authority_start..authority_end];

    let Some(at) = authority.rfind('@') else {
        return url.to_string();
    };
    let userinfo = &authority[..at];
    let user = userinfo.split_once(':').map_or(userinfo, |(user, _)| user);
    if user.len() == userinfo.len() {
        return url.to_string();
    }

    format!(
        "{}{}:***{}",
        &url[..authority_start],
        user,
        &url[authority_start + at..]
    )
}
