//! Catalog sources CLI
//!
//! Runs one operation against the configured site and prints the result
//! as JSON.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use catalog_sources::{
    Source,
    config::{load_config, load_validated, to_toml},
    error::Result,
    models::{Config, Partial},
    services::filters_with_value,
};

/// Adapt a themed streaming site into the shared catalog schema
#[derive(Parser, Debug)]
#[command(
    name = "catalog-sources",
    version,
    about = "Query a themed catalog site from the command line"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the popular feed
    Popular {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// List the latest feed
    Latest {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Search by text, by genre, or open a `path:` deep link
    Search {
        /// Free text, or `path:<site path>`
        #[arg(default_value = "")]
        query: String,

        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Taxonomy query value, e.g. `genre/action/`
        #[arg(long)]
        genre: Option<String>,
    },

    /// Show entry details
    Details { path: String },

    /// List the episodes of an entry
    Episodes { path: String },

    /// List the ranked alternatives of an episode
    Videos { path: String },

    /// Show the search filters (loads the taxonomy first)
    Filters,

    /// Validate the configuration file
    Validate,

    /// Print the effective configuration as TOML
    Config,
}

/// Initialize logging from the verbosity flag or the configured level.
fn init_logging(verbose: bool, config: &Config) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_partial<T: Serialize>(partial: &Partial<T>) -> Result<()> {
    if !partial.is_complete() {
        log::warn!("{} item(s) dropped", partial.dropped());
    }
    print_json(&partial.items)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config);
    init_logging(cli.verbose, &config);

    match cli.command {
        Command::Validate => {
            log::info!("Validating {}...", cli.config.display());
            if let Err(e) = load_validated(&cli.config) {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("Config OK");
            return Ok(());
        }
        Command::Config => {
            print!("{}", to_toml(&config)?);
            return Ok(());
        }
        _ => {}
    }

    let source = Source::from_config(&config)?;
    log::info!("Using source {} ({})", source.name(), config.site.base_url);

    match cli.command {
        Command::Popular { page } => print_json(&source.popular(page).await?)?,
        Command::Latest { page } => print_json(&source.latest(page).await?)?,
        Command::Search { query, page, genre } => {
            let mut filters = source.filter_list();
            if genre.is_some() && filters.len() < 2 {
                source.load_taxonomy().await;
                filters = source.filter_list();
            }
            let filters = filters_with_value(filters, genre.as_deref());
            print_json(&source.search(&query, filters, page).await?)?
        }
        Command::Details { path } => print_json(&source.details(&path).await?)?,
        Command::Episodes { path } => print_partial(&source.episodes(&path).await?)?,
        Command::Videos { path } => print_partial(&source.alternatives(&path).await?)?,
        Command::Filters => {
            source.load_taxonomy().await;
            print_json(&json!({
                "status": source.taxonomy_status(),
                "filters": source.filter_list(),
            }))?
        }
        Command::Validate | Command::Config => {}
    }

    Ok(())
}
