use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MIDGARD_API_URL: &str = "https://midgard.ninerealms.com/v2";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub midgard_api_url: String,
    pub actions_page_limit: usize,
    pub price_fetch_concurrency: usize,
    pub request_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let midgard_api_url = env_map
            .get("MIDGARD_API_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_MIDGARD_API_URL.to_string());
        if midgard_api_url.is_empty() {
            return Err(ConfigError::MissingEnv("MIDGARD_API_URL".to_string()));
        }

        let actions_page_limit = parse_positive(&env_map, "ACTIONS_PAGE_LIMIT", 50)?;
        let price_fetch_concurrency = parse_positive(&env_map, "PRICE_FETCH_CONCURRENCY", 8)?;
        let request_timeout =
            Duration::from_secs(parse_positive(&env_map, "REQUEST_TIMEOUT_SECS", 30)? as u64);

        Ok(Config {
            port,
            midgard_api_url,
            actions_page_limit,
            price_fetch_concurrency,
            request_timeout,
        })
    }
}

fn parse_positive(
    env_map: &HashMap<String, String>,
    key: &str,
    default: usize,
) -> Result<usize, ConfigError> {
    let Some(raw) = env_map.get(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("must be a positive integer, got {}", raw),
        )),
    }
}
