//! Server crate for the Marquee movie recommender.
//!
//! Contains the orchestrator that ties the catalog lookup to poster
//! resolution, the environment-driven configuration, and the HTTP
//! presentation layer.

pub mod api;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod page;

pub use config::Config;
pub use orchestrator::{MovieRecommendation, PosterStatus, RecommendationOrchestrator};
