use std::collections::HashSet;

use chrono::{DateTime, Utc};
use clap::Parser;

use panelfeed::cli::{Cli, Commands, OutputFormat};
use panelfeed::config::Config;
use panelfeed::domain::{ChannelMetadata, ComicFeed};
use panelfeed::errors::{StripError, StripResult};
use panelfeed::fetch::HttpFetcher;
use panelfeed::render;
use panelfeed::services::{Aggregator, SyncService};
use panelfeed::sources::SourceRegistry;
use panelfeed::storage::sqlite::{SqliteStorage, SqliteStripRepository};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> StripResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sources => cmd_sources(),
        Commands::Fetch {
            source,
            since,
            format,
        } => cmd_fetch(&source, since.as_deref(), format),
        Commands::Sync { source, dry_run } => cmd_sync(source.as_deref(), dry_run),
        Commands::Show {
            source,
            format,
            limit,
        } => cmd_show(&source, format, limit),
    }
}

fn cmd_sources() -> StripResult<()> {
    let registry = SourceRegistry::new();

    println!("Supported comic sources:\n");
    for source in registry.iter() {
        println!("  {} ({})", source.name(), source.config().feed_url);
    }

    Ok(())
}

fn cmd_fetch(source_name: &str, since: Option<&str>, format: OutputFormat) -> StripResult<()> {
    let config = Config::from_env()?;
    let registry = SourceRegistry::new();
    let source = registry
        .get(source_name)
        .ok_or_else(|| StripError::UnknownSource(source_name.to_string()))?;

    let since = since.map(parse_since).transpose()?;

    let aggregator = Aggregator::new(Box::new(HttpFetcher::new(config.http_timeout_secs)));
    let feed = aggregator.fetch_feed(source, since, &HashSet::new())?;

    print_feed(&feed, format)
}

fn cmd_sync(source_name: Option<&str>, dry_run: bool) -> StripResult<()> {
    let config = Config::from_env()?;
    let service = sync_service(&config)?;

    let outcomes = match source_name {
        Some(name) => vec![service.sync_source(name, dry_run)?],
        None => service.sync_all(dry_run)?,
    };

    let mut total = 0;
    for outcome in &outcomes {
        println!("  {}: {} new strips", outcome.source_name, outcome.new_strips);
        total += outcome.new_strips;
    }

    if dry_run {
        println!("\nDry run complete. Would store {} strips.", total);
    } else {
        println!("\nStored {} new strips.", total);
    }

    Ok(())
}

fn cmd_show(source_name: &str, format: OutputFormat, limit: Option<usize>) -> StripResult<()> {
    let config = Config::from_env()?;
    let registry = SourceRegistry::new();
    let source = registry
        .get(source_name)
        .ok_or_else(|| StripError::UnknownSource(source_name.to_string()))?;

    let service = sync_service(&config)?;
    let strips = service.stored_strips(source_name, limit)?;

    let feed = ComicFeed {
        channel: ChannelMetadata {
            title: Some(source.name().to_string()),
            link: Some(source.config().feed_url.to_string()),
            ..Default::default()
        },
        strips,
    };

    print_feed(&feed, format)
}

fn sync_service(config: &Config) -> StripResult<SyncService<SqliteStripRepository>> {
    let storage = SqliteStorage::new(&config.db_path)?;
    let repository = SqliteStripRepository::new(storage);
    let aggregator = Aggregator::new(Box::new(HttpFetcher::new(config.http_timeout_secs)));
    Ok(SyncService::new(aggregator, repository, SourceRegistry::new()))
}

fn parse_since(raw: &str) -> StripResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            StripError::InvalidInput(format!(
                "--since must be an RFC 3339 timestamp, got {:?}",
                raw
            ))
        })
}

fn print_feed(feed: &ComicFeed, format: OutputFormat) -> StripResult<()> {
    let rendered = match format {
        OutputFormat::Json => render::json::render(feed)?,
        OutputFormat::Rss => render::rss::render(feed)?,
    };
    println!("{}", rendered);
    Ok(())
}
