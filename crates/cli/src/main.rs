use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{CatalogIndex, MovieId};
use poster_client::{PosterOutcome, PosterResolver};
use server::page::NO_RECOMMENDATIONS;
use server::{Config, MovieRecommendation, PosterStatus, RecommendationOrchestrator};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Log level used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "info";

/// Marquee - content-based movie recommendations with posters
#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Find movies similar to one you like, with posters from TMDB", long_about = None)]
struct Cli {
    /// Directory holding movies.{json,dat} and similarity.{json,dat} (overrides DATA_DIR)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Explicit catalog artifact (use together with --similarity)
    #[arg(long, requires = "similarity")]
    catalog: Option<PathBuf>,

    /// Explicit similarity matrix artifact (use together with --catalog)
    #[arg(long, requires = "catalog")]
    similarity: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a title
    Recommend {
        /// Exact catalog title (case-sensitive)
        #[arg(long)]
        title: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "5")]
        limit: usize,

        /// Skip poster lookups and show similarity scores only
        #[arg(long)]
        no_posters: bool,
    },

    /// List catalog titles in order
    List {
        /// Stop after this many titles
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,

        /// Maximum number of matches to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Resolve the poster URL for one movie id
    Poster {
        /// TMDB movie id
        #[arg(long)]
        movie_id: MovieId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing on stderr so stdout stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Dispatch to appropriate command handler
    match &cli.command {
        Commands::Recommend {
            title,
            limit,
            no_posters,
        } => {
            let catalog = load_catalog(&cli, &config)?;
            handle_recommend(catalog, &config, title, *limit, *no_posters).await?
        }
        Commands::List { limit } => {
            let catalog = load_catalog(&cli, &config)?;
            handle_list(&catalog, *limit)
        }
        Commands::Search { title, limit } => {
            let catalog = load_catalog(&cli, &config)?;
            handle_search(&catalog, title, *limit)
        }
        Commands::Poster { movie_id } => handle_poster(&config, *movie_id).await?,
    }

    Ok(())
}

/// Load the catalog once. Any failure here is fatal.
fn load_catalog(cli: &Cli, config: &Config) -> Result<Arc<CatalogIndex>> {
    let start = Instant::now();
    let index = match (&cli.catalog, &cli.similarity) {
        (Some(catalog), Some(similarity)) => CatalogIndex::load_from_files(catalog, similarity),
        _ => {
            let data_dir = cli.data_dir.as_ref().unwrap_or(&config.data_dir);
            CatalogIndex::load_from_dir(data_dir)
        }
    }
    .context("Failed to load movie catalog and similarity matrix")?;

    eprintln!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        index.len(),
        start.elapsed()
    );
    Ok(Arc::new(index))
}

/// Poster resolver from config; a missing API key is only a warning
fn poster_resolver(config: &Config) -> Result<PosterResolver> {
    if config.tmdb_api_key.is_empty() {
        warn!("TMDB_API_KEY is not set; every poster will fall back to the placeholder");
    }
    config
        .poster_resolver()
        .context("Failed to build poster client")
}

/// Handle the 'recommend' command
async fn handle_recommend(
    catalog: Arc<CatalogIndex>,
    config: &Config,
    title: &str,
    limit: usize,
    no_posters: bool,
) -> Result<()> {
    if no_posters {
        match catalog.recommend_top(title, limit) {
            Ok(recs) if !recs.is_empty() => {
                println!("{}", format!("Movies similar to '{}':", title).bold().blue());
                for (rank, rec) in recs.iter().enumerate() {
                    println!(
                        "{}. {} [{}] - Score: {:.3}",
                        (rank + 1).to_string().green(),
                        rec.title,
                        rec.movie_id,
                        rec.score
                    );
                }
            }
            Ok(_) => warn_no_recommendations(None),
            Err(e) => warn_no_recommendations(Some(&e.to_string())),
        }
        return Ok(());
    }

    let posters = poster_resolver(config)?;
    let orchestrator = RecommendationOrchestrator::new(catalog, posters).with_limit(limit);

    match orchestrator.get_recommendations(title).await {
        Ok(recs) if !recs.is_empty() => print_recommendations(title, &recs),
        Ok(_) => warn_no_recommendations(None),
        Err(e) => warn_no_recommendations(Some(&e.to_string())),
    }
    Ok(())
}

/// Handle the 'list' command
fn handle_list(catalog: &CatalogIndex, limit: Option<usize>) {
    let limit = limit.unwrap_or(usize::MAX);
    for (position, movie) in catalog.movies().iter().take(limit).enumerate() {
        println!("{:>5}  {}  [{}]", position, movie.title, movie.id);
    }
}

/// Handle the 'search' command
fn handle_search(catalog: &CatalogIndex, title: &str, limit: usize) {
    let matches = catalog.search(title, limit);
    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  {}", "no matches".dimmed());
    }
    for movie in matches {
        println!("{}: {}", movie.id, movie.title);
    }
}

/// Handle the 'poster' command
async fn handle_poster(config: &Config, movie_id: MovieId) -> Result<()> {
    let resolver = poster_resolver(config)?;

    let outcome = resolver.resolve(movie_id).await;
    println!("{}", outcome.url());
    match outcome {
        PosterOutcome::Found(_) => {}
        PosterOutcome::Missing => {
            eprintln!("{}", format!("Movie {} has no poster", movie_id).yellow())
        }
        PosterOutcome::Exhausted {
            attempts,
            last_error,
        } => eprintln!(
            "{}",
            format!(
                "Failed to fetch poster for movie ID {} after {} attempts: {}",
                movie_id, attempts, last_error
            )
            .yellow()
        ),
    }
    Ok(())
}

fn warn_no_recommendations(reason: Option<&str>) {
    eprintln!("{} {}", "!".yellow().bold(), NO_RECOMMENDATIONS.yellow());
    if let Some(reason) = reason {
        eprintln!("  {}", reason.dimmed());
    }
}

/// Helper function to format and print recommendations
fn print_recommendations(title: &str, recommendations: &[MovieRecommendation]) {
    println!("{}", format!("Recommended Movies for '{}':", title).bold().blue());
    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} [{}] - Score: {:.3}",
            (rank + 1).to_string().green(),
            rec.title,
            rec.movie_id,
            rec.score
        );
        println!("   Poster: {}", rec.poster_url);
        if rec.poster == PosterStatus::Unavailable {
            println!("   {}", "poster service unavailable, showing placeholder".yellow());
        }
    }
}
