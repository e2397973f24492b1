//! Poster resolution against the TMDB metadata API.
//!
//! `PosterResolver` turns a movie id into a displayable image URL. It never
//! fails its caller: every error path ends in either a real poster URL or
//! `PLACEHOLDER_URL`.
//!
//! Each resolution runs a small state machine:
//! - a successful response with a poster path yields the CDN URL
//! - a successful response without one yields the placeholder immediately
//! - any transport, status or decode failure is retried after a fixed delay
//!   until `RetryPolicy::max_attempts` is reached, then the placeholder is
//!   used and a warning is logged

use std::fmt;
use std::time::Duration;

use data_loader::MovieId;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

/// TMDB v3 REST endpoint
pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";

/// CDN prefix for 500px-wide posters
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// Shown whenever no real poster can be resolved
pub const PLACEHOLDER_URL: &str =
    "https://via.placeholder.com/500x750.png?text=No+Poster+Available";

/// A single failed fetch attempt. All variants are retryable.
#[derive(Error, Debug)]
pub enum PosterError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("metadata API returned status {0}")]
    Status(u16),

    #[error("malformed metadata response: {0}")]
    Malformed(String),
}

/// Bounded fixed-delay retry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Per-attempt network timeout
    pub timeout: Duration,
    /// Pause between a failed attempt and the next one
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout: Duration::from_secs(10),
            delay: Duration::from_secs(1),
        }
    }
}

/// How a poster resolution ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterOutcome {
    /// Fully-qualified poster URL
    Found(String),
    /// The movie exists upstream but has no poster
    Missing,
    /// Every attempt failed
    Exhausted { attempts: u32, last_error: String },
}

impl PosterOutcome {
    /// URL to display: the poster, or the placeholder
    pub fn url(&self) -> &str {
        match self {
            PosterOutcome::Found(url) => url,
            PosterOutcome::Missing | PosterOutcome::Exhausted { .. } => PLACEHOLDER_URL,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        !matches!(self, PosterOutcome::Found(_))
    }
}

/// Subset of TMDB's `/movie/{id}` body we care about
#[derive(Debug, Deserialize)]
struct MovieDetails {
    #[serde(default)]
    poster_path: Option<String>,
}

/// Resolves poster URLs with retry and placeholder fallback.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct PosterResolver {
    client: Client,
    api_key: String,
    api_base: String,
    image_base: String,
    policy: RetryPolicy,
}

impl fmt::Debug for PosterResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PosterResolver")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("image_base", &self.image_base)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl PosterResolver {
    /// Build a resolver whose HTTP client enforces `policy.timeout` per request
    pub fn new(api_key: impl Into<String>, policy: RetryPolicy) -> Result<Self, PosterError> {
        let client = Client::builder().timeout(policy.timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            policy,
        })
    }

    /// Point metadata lookups at a different API root
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Compose poster URLs against a different image root
    pub fn with_image_base(mut self, image_base: impl Into<String>) -> Self {
        self.image_base = image_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Poster URL for `movie_id`, or the placeholder. Never fails.
    pub async fn resolve_poster(&self, movie_id: MovieId) -> String {
        self.resolve(movie_id).await.url().to_string()
    }

    /// Resolve one poster, retrying transient failures
    pub async fn resolve(&self, movie_id: MovieId) -> PosterOutcome {
        let attempts = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self.fetch_poster_path(movie_id).await {
                Ok(Some(path)) => return PosterOutcome::Found(self.poster_url(&path)),
                Ok(None) => {
                    debug!("Movie {} has no poster, using placeholder", movie_id);
                    return PosterOutcome::Missing;
                }
                Err(e) => {
                    debug!(
                        "Poster fetch for movie {} failed (attempt {}/{}): {}",
                        movie_id, attempt, attempts, e
                    );
                    last_error = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(self.policy.delay).await;
                    }
                }
            }
        }

        let last_error = last_error.map(|e| e.to_string()).unwrap_or_default();
        warn!(
            movie_id,
            attempts,
            error = %last_error,
            "Failed to fetch poster, falling back to placeholder"
        );
        PosterOutcome::Exhausted {
            attempts,
            last_error,
        }
    }

    /// Resolve several posters concurrently.
    ///
    /// Outcomes come back in the order of `movie_ids`. Dropping the returned
    /// future aborts every in-flight request.
    pub async fn resolve_batch(&self, movie_ids: &[MovieId]) -> Vec<PosterOutcome> {
        let mut tasks = JoinSet::new();
        for (slot, &movie_id) in movie_ids.iter().enumerate() {
            let resolver = self.clone();
            tasks.spawn(async move { (slot, resolver.resolve(movie_id).await) });
        }

        let mut outcomes: Vec<Option<PosterOutcome>> = vec![None; movie_ids.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, outcome)) => outcomes[slot] = Some(outcome),
                Err(e) => error!("Poster task did not complete: {}", e),
            }
        }

        outcomes
            .into_iter()
            .map(|outcome| {
                outcome.unwrap_or_else(|| PosterOutcome::Exhausted {
                    attempts: 0,
                    last_error: "poster task did not complete".to_string(),
                })
            })
            .collect()
    }

    /// One metadata request. `Ok(None)` means "no poster", not a failure.
    async fn fetch_poster_path(&self, movie_id: MovieId) -> Result<Option<String>, PosterError> {
        let url = format!("{}/movie/{}", self.api_base, movie_id);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PosterError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let details: MovieDetails =
            serde_json::from_str(&body).map_err(|e| PosterError::Malformed(e.to_string()))?;

        Ok(details.poster_path.filter(|path| !path.is_empty()))
    }

    /// Plain concatenation: TMDB paths already start with `/`, and the
    /// resulting double slash is kept as-is.
    fn poster_url(&self, poster_path: &str) -> String {
        format!("{}/{}", self.image_base, poster_path)
    }
}
