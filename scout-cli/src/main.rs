use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use scout::config::{Config, ObservabilityConfig};
use scout::schema::{CommunityPosts, Jobs, TechBlogs};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::SchemaArg;

#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(about = "Scout CLI - typed search and aggregation reports")]
#[command(version)]
struct Cli {
    /// Configuration file path [default: ./scout.toml, then ~/.scout/config.toml]
    #[arg(short, long, global = true, env = "SCOUT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregated statistics reports
    Stats {
        #[command(subcommand)]
        report: StatsReport,
    },

    /// Search an index with field conditions
    Search {
        #[arg(value_enum)]
        schema: SchemaArg,

        /// Condition as field=value or field=lo..hi (repeatable)
        #[arg(short = 'w', long = "where", value_name = "CONDITION")]
        conditions: Vec<String>,

        /// Offset of the first result
        #[arg(long, allow_hyphen_values = true)]
        from: Option<i64>,

        /// Offset past the last result
        #[arg(long)]
        to: Option<i64>,
    },

    /// Fetch one document by id
    Get {
        #[arg(value_enum)]
        schema: SchemaArg,

        id: String,
    },

    /// Print the compiled search body without sending it
    Compile {
        #[arg(value_enum)]
        schema: SchemaArg,

        /// Condition as field=value or field=lo..hi (repeatable)
        #[arg(short = 'w', long = "where", value_name = "CONDITION")]
        conditions: Vec<String>,

        #[arg(long, allow_hyphen_values = true)]
        from: Option<i64>,

        #[arg(long)]
        to: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
enum StatsReport {
    /// Daily job posting statistics
    Daily {
        /// Reference time (RFC 3339), defaults to now
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

/// Logs go to stderr so stdout carries only the JSON result.
fn init_tracing(config: &ObservabilityConfig) {
    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level));

    if config.log_format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_or_default(path)?,
        None => Config::discover()?,
    };
    init_tracing(&config.observability);

    if let Some(path) = &cli.config {
        tracing::debug!("Config file: {}", path.display());
    }

    match cli.command {
        Commands::Stats {
            report: StatsReport::Daily { now },
        } => commands::stats::run_daily(&config, now).await?,

        Commands::Search {
            schema,
            conditions,
            from,
            to,
        } => {
            let index = schema.index(&config.indices);
            match schema {
                SchemaArg::Jobs => {
                    commands::search::run_search::<Jobs>(&config, index, &conditions, from, to)
                        .await?
                }
                SchemaArg::TechBlogs => {
                    commands::search::run_search::<TechBlogs>(
                        &config,
                        index,
                        &conditions,
                        from,
                        to,
                    )
                    .await?
                }
                SchemaArg::CommunityPosts => {
                    commands::search::run_search::<CommunityPosts>(
                        &config,
                        index,
                        &conditions,
                        from,
                        to,
                    )
                    .await?
                }
            }
        }

        Commands::Get { schema, id } => {
            let index = schema.index(&config.indices);
            match schema {
                SchemaArg::Jobs => commands::search::run_get::<Jobs>(&config, index, &id).await?,
                SchemaArg::TechBlogs => {
                    commands::search::run_get::<TechBlogs>(&config, index, &id).await?
                }
                SchemaArg::CommunityPosts => {
                    commands::search::run_get::<CommunityPosts>(&config, index, &id).await?
                }
            }
        }

        Commands::Compile {
            schema,
            conditions,
            from,
            to,
        } => {
            let index = schema.index(&config.indices);
            match schema {
                SchemaArg::Jobs => {
                    commands::compile::run_compile::<Jobs>(&config, index, &conditions, from, to)?
                }
                SchemaArg::TechBlogs => commands::compile::run_compile::<TechBlogs>(
                    &config,
                    index,
                    &conditions,
                    from,
                    to,
                )?,
                SchemaArg::CommunityPosts => commands::compile::run_compile::<CommunityPosts>(
                    &config,
                    index,
                    &conditions,
                    from,
                    to,
                )?,
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "scout",
            "search",
            "tech-blogs",
            "--where",
            "company=kakao",
            "-w",
            "created_at=1700000000000..",
            "--from",
            "10",
            "--to",
            "20",
        ])
        .unwrap();

        match cli.command {
            Commands::Search {
                schema,
                conditions,
                from,
                to,
            } => {
                assert!(matches!(schema, SchemaArg::TechBlogs));
                assert_eq!(conditions.len(), 2);
                assert_eq!((from, to), (Some(10), Some(20)));
            }
            other => panic!("Expected search, got {:?}", other),
        }
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_daily_stats_with_time() {
        let cli = Cli::try_parse_from([
            "scout",
            "--config",
            "/etc/scout.toml",
            "stats",
            "daily",
            "--now",
            "2025-10-27T00:00:00Z",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/etc/scout.toml")));
        match cli.command {
            Commands::Stats {
                report: StatsReport::Daily { now },
            } => assert_eq!(now.unwrap().to_rfc3339(), "2025-10-27T00:00:00+00:00"),
            other => panic!("Expected stats, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_schema_is_rejected() {
        assert!(Cli::try_parse_from(["scout", "search", "users"]).is_err());
    }
}
