use std::path::Path;
use std::time::Duration;

use crate::error::{AlertError, Result};

pub const ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co";
pub const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com";
pub const NEWS_API_URL: &str = "https://newsapi.org";
pub const TWILIO_API_URL: &str = "https://api.twilio.com";
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Seconds a single HTTP call may take (HTTP_TIMEOUT_SECS).
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Calendar days of daily bars requested from the chart provider.
pub const HISTORY_LOOKBACK_DAYS: i64 = 5;

/// Articles kept from a news search, however many the provider returns.
pub const MAX_ARTICLES: usize = 3;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub news_api_key: String,
    pub stock_api_key: String,
    pub twilio_sid: String,
    pub twilio_auth_token: String,
    pub twilio_from: String,
    pub recipient: String,
    pub gemini_api_key: String,
}

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub alpha_vantage: String,
    pub yahoo_chart: String,
    pub news_api: String,
    pub twilio: String,
    pub gemini: String,
    pub gemini_model: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            alpha_vantage: ALPHA_VANTAGE_URL.to_string(),
            yahoo_chart: YAHOO_CHART_URL.to_string(),
            news_api: NEWS_API_URL.to_string(),
            twilio: TWILIO_API_URL.to_string(),
            gemini: GEMINI_API_URL.to_string(),
            gemini_model: GEMINI_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub endpoints: Endpoints,
    pub http_timeout: Duration,
    pub log_level: String,
}

impl Config {
    /// Loads `.env` (or `env_file`) into the process environment, then reads it.
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| {
                    AlertError::Config(format!("cannot read env file {}: {e}", path.display()))
                })?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| AlertError::Config(format!("{key} is not set")))
        };
        let or_default = |key: &str, default: &str| {
            get(key)
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| default.to_string())
        };

        // RECEPIENT_ is the spelling older .env files use.
        let recipient = get("RECIPIENT_PHONE_NUMBER")
            .or_else(|| get("RECEPIENT_PHONE_NUMBER"))
            .ok_or_else(|| AlertError::Config("RECIPIENT_PHONE_NUMBER is not set".to_string()))?;

        let credentials = Credentials {
            news_api_key: required("NEWS_API_KEY")?,
            stock_api_key: required("STOCK_API_KEY")?,
            twilio_sid: required("TWILIO_SID")?,
            twilio_auth_token: required("TWILIO_AUTH_TOKEN")?,
            twilio_from: required("TWILIO_PHONE_NUMBER")?,
            recipient,
            gemini_api_key: required("GEMINI_API_KEY")?,
        };

        let endpoints = Endpoints {
            alpha_vantage: or_default("ALPHA_VANTAGE_URL", ALPHA_VANTAGE_URL),
            yahoo_chart: or_default("YAHOO_CHART_URL", YAHOO_CHART_URL),
            news_api: or_default("NEWS_API_URL", NEWS_API_URL),
            twilio: or_default("TWILIO_API_URL", TWILIO_API_URL),
            gemini: or_default("GEMINI_API_URL", GEMINI_API_URL),
            gemini_model: or_default("GEMINI_MODEL", GEMINI_MODEL),
        };

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AlertError::Config("HTTP_TIMEOUT_SECS must be a whole number of seconds".to_string())
            })?,
            None => HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            credentials,
            endpoints,
            http_timeout: Duration::from_secs(http_timeout),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "warn".to_string()),
        })
    }

    pub fn http_client(&self) -> Result<reqwest::blocking::Client> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("tickerwatch/", env!("CARGO_PKG_VERSION")))
            .timeout(self.http_timeout)
            .build()?;
        Ok(client)
    }
}
