//! `evently event` - create, update, and look up events
//!
//! Input documents are JSON in the same camelCase shape the records are
//! printed in:
//!
//! ```bash
//! evently event create --file rustconf.json
//! cat patch.json | evently event update 6f1c... --file -
//! evently event get rustconf-2024
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use evently_store::models::{EventPatch, NewEvent};
use evently_store::EventRepo;
use serde::de::DeserializeOwned;
use tracing::info;
use uuid::Uuid;

use super::{print_json, store};

#[derive(Parser, Debug)]
pub struct EventArgs {
    #[command(subcommand)]
    pub command: EventCommands,
}

#[derive(Subcommand, Debug)]
pub enum EventCommands {
    /// Create an event from a JSON document
    Create(CreateArgs),
    /// Apply a partial update from a JSON document
    Update(UpdateArgs),
    /// Show one event by id or slug
    Get(GetArgs),
    /// List events, newest first
    List,
}

#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// JSON file with the event fields ("-" reads stdin)
    #[arg(long, short)]
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// Event id
    pub id: Uuid,

    /// JSON file with the fields to change ("-" reads stdin)
    #[arg(long, short)]
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Event id or slug
    pub key: String,
}

pub async fn run_event(args: EventArgs) -> Result<()> {
    match args.command {
        EventCommands::Create(args) => {
            let input: NewEvent = read_document(&args.file)?;
            let event = EventRepo::new(store().await?).create(input).await?;
            info!(id = %event.id, slug = %event.slug, "created event");
            print_json(&event)
        }
        EventCommands::Update(args) => {
            let patch: EventPatch = read_document(&args.file)?;
            let event = EventRepo::new(store().await?).update(args.id, patch).await?;
            print_json(&event)
        }
        EventCommands::Get(args) => {
            let repo = EventRepo::new(store().await?);
            let event = match args.key.parse::<Uuid>() {
                Ok(id) => repo.get(id).await?,
                Err(_) => repo.find_by_slug(&args.key).await?,
            };
            print_json(&event)
        }
        EventCommands::List => {
            let events = EventRepo::new(store().await?).list().await?;
            print_json(&events)
        }
    }
}

/// Read and parse a JSON document from a file or stdin.
pub(crate) fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_camel_case_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"title": "RustConf", "date": "2024-09-10", "agenda": ["Keynote"]}}"#
        )
        .unwrap();

        let input: NewEvent = read_document(file.path()).unwrap();
        assert_eq!(input.title.as_deref(), Some("RustConf"));
        assert_eq!(input.agenda, Some(vec!["Keynote".to_string()]));
        assert!(input.venue.is_none());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_document::<EventPatch>(Path::new("/nonexistent/event.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
