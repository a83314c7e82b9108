//! Jellyfin catalog source CLI application.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use jellyfin_source::{JellyfinSource, SearchFilters, SortDirection, SortField};
use serde::Serialize;
use shared::{Config, LogConfig, PreferenceStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the catalog
    Popular {
        #[arg(short, long, default_value = "1")]
        page: u32,
    },
    /// List the most recently added entries
    Latest {
        #[arg(short, long, default_value = "1")]
        page: u32,
    },
    /// Search the catalog
    Search {
        /// Search term (may be empty)
        #[arg(default_value = "")]
        query: String,

        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Category name from the configuration
        #[arg(long)]
        category: Option<String>,

        #[arg(long, value_enum)]
        sort: Option<SortArg>,

        /// Sort ascending instead of descending
        #[arg(long)]
        ascending: bool,
    },
    /// Show details of an entry
    Details {
        /// Entry locator url
        url: String,
    },
    /// List the episodes of an entry
    Episodes {
        /// Entry locator url
        url: String,
    },
    /// Resolve playable videos of an episode
    Videos {
        /// Episode url
        url: String,
    },
    /// Show configured categories and sort options
    Filters,
    /// Forget the cached session
    Logout,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortArg {
    Name,
    DateAdded,
    PremiereDate,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortField::Name,
            SortArg::DateAdded => SortField::DateAdded,
            SortArg::PremiereDate => SortField::PremiereDate,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize logging
    let mut log_config = LogConfig::from_config(&config, "jellyfin-source");
    if args.verbose {
        log_config = log_config.with_level(tracing::Level::DEBUG);
    }
    shared::logging::init(log_config)?;

    info!(config_file = %args.config.display(), "Loaded configuration");

    // Open preference store
    let store_path = config.store_path();
    info!(store_path = %store_path.display(), "Opening preference store");
    let store = Arc::new(PreferenceStore::open(&store_path).context("Failed to open preference store")?);

    let source = JellyfinSource::from_config(&config, store)?;

    match args.command {
        Command::Popular { page } => print_json(&source.popular(page).await?)?,
        Command::Latest { page } => print_json(&source.latest(page).await?)?,
        Command::Search {
            query,
            page,
            category,
            sort,
            ascending,
        } => {
            let parent_id = match category {
                Some(name) => Some(
                    source
                        .category_id(&name)
                        .map(str::to_string)
                        .with_context(|| format!("Unknown category: {}", name))?,
                ),
                None => None,
            };
            let direction = if ascending {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            };
            let filters = SearchFilters {
                parent_id,
                sort: sort.map(|s| (SortField::from(s), direction)),
            };
            print_json(&source.search(page, &query, &filters).await?)?
        }
        Command::Details { url } => print_json(&source.anime_details(&url).await?)?,
        Command::Episodes { url } => print_json(&source.episode_list(&url).await?)?,
        Command::Videos { url } => print_json(&source.video_list(&url).await?)?,
        Command::Filters => print_json(&source.filters())?,
        Command::Logout => {
            source.client().session_manager().clear().await?;
            info!("Logged out");
        }
    }

    Ok(())
}
