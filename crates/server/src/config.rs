use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use poster_client::{PosterError, PosterResolver, RetryPolicy, DEFAULT_API_BASE};
use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Deserialize, Clone)]
pub struct Config {
    /// TMDB API key. Not validated; a missing key shows up as failed poster lookups.
    #[serde(default)]
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Directory holding `movies.*` and `similarity.*`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Total poster fetch attempts, including the first
    #[serde(default = "default_poster_max_attempts")]
    pub poster_max_attempts: u32,

    /// Per-attempt timeout for poster lookups
    #[serde(default = "default_poster_timeout_secs")]
    pub poster_timeout_secs: u64,

    /// Pause between failed poster attempts
    #[serde(default = "default_poster_retry_delay_ms")]
    pub poster_retry_delay_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.tmdb_api_key.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("Config")
            .field("tmdb_api_key", &api_key)
            .field("tmdb_api_url", &self.tmdb_api_url)
            .field("data_dir", &self.data_dir)
            .field("poster_max_attempts", &self.poster_max_attempts)
            .field("poster_timeout_secs", &self.poster_timeout_secs)
            .field("poster_retry_delay_ms", &self.poster_retry_delay_ms)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

fn default_tmdb_api_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_poster_max_attempts() -> u32 {
    3
}

fn default_poster_timeout_secs() -> u64 {
    10
}

fn default_poster_retry_delay_ms() -> u64 {
    1000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

impl Config {
    /// Load configuration from `.env` (if present) and the environment
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.poster_max_attempts,
            timeout: Duration::from_secs(self.poster_timeout_secs),
            delay: Duration::from_millis(self.poster_retry_delay_ms),
        }
    }

    /// Poster resolver wired to the configured API
    pub fn poster_resolver(&self) -> Result<PosterResolver, PosterError> {
        Ok(PosterResolver::new(self.tmdb_api_key.clone(), self.retry_policy())?
            .with_api_base(self.tmdb_api_url.clone()))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
