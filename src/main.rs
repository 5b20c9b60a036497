//! Folio - content indexer and reader for a markdown portfolio blog.

use anyhow::{Context, Result, bail};
use clap::Parser;
use folio::{
    cli::{Cli, Commands},
    config::SiteConfig,
    indexer::{self, ConfigurationError},
    init::new_site,
    log,
    reader::{self, ContentReader},
    serve::serve_site,
};
use serde::Serialize;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log!("error"; "{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    match &cli.command {
        Commands::Init { .. } => new_site(&config),
        Commands::Index { .. } => match indexer::run(&config) {
            Ok(_) => Ok(()),
            Err(err) if is_recoverable(&err) => {
                log!("warn"; "{err:#}");
                Ok(())
            }
            Err(err) => Err(err),
        },
        Commands::Serve { .. } => {
            // The server still starts so the watcher can pick up the first post.
            if let Err(err) = indexer::run(&config) {
                log!("error"; "{err:#}");
            }
            serve_site(&config)
        }
        Commands::List { tag, search, .. } => {
            let items = ContentReader::from_config(&config)?.fetch_all()?;
            let found = match tag {
                Some(tag) => reader::filter_by_tag(&items, tag),
                None => items.iter().collect(),
            };
            let found = match search {
                Some(term) => reader::search(found, term),
                None => found,
            };
            print_json(&found)
        }
        Commands::Get { id, .. } => {
            match ContentReader::from_config(&config)?.fetch_by_id(id)? {
                Some(item) => print_json(&item),
                None => bail!("no content item with id `{id}`"),
            }
        }
        Commands::Tags { .. } => print_json(&ContentReader::from_config(&config)?.fetch_tags()?),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let config = SiteConfig::load(cli)?;

    if !cli.is_init() {
        config.validate()?;
    }

    Ok(config)
}

/// Indexing stopped, but there is nothing for the operator to fix but
/// adding content.
fn is_recoverable(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ConfigurationError>()
        .is_some_and(|err| !err.is_fatal())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
