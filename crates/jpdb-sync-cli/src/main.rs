mod commands;
mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use jpdb_sync::ImportRequest;
use jpdb_sync_client::{ClientConfig, JpdbClient};
use jpdb_sync_store::CollectionStore;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "jpdb-sync")]
#[command(about = "Import JPDB vocabulary decks into a local flashcard collection")]
struct Cli {
    /// Path to the local collection database
    #[arg(long, global = true)]
    collection: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Credentials {
    /// JPDB API key (defaults to the stored one)
    #[arg(long, env = "JPDB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// List the decks of your JPDB account
    Decks {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Import a JPDB deck into the local collection
    Import {
        /// JPDB deck ID (see `jpdb-sync decks`)
        deck_id: i64,
        /// Local deck to import into
        #[arg(long)]
        deck: Option<String>,
        /// Local note type for the new notes
        #[arg(long)]
        note_type: Option<String>,
        #[command(flatten)]
        credentials: Credentials,
    },
    /// List local note types, or add one
    NoteTypes {
        #[command(subcommand)]
        action: Option<NoteTypeAction>,
    },
    /// List notes stored in a local deck
    Notes {
        /// Local deck name (defaults to the stored import deck)
        #[arg(long)]
        deck: Option<String>,
    },
    /// Show or change stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum NoteTypeAction {
    /// Register a note type with the given fields, in order
    Add {
        name: String,
        #[arg(long = "field", required = true)]
        fields: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the stored settings
    Show,
    /// Change stored settings
    Set {
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        deck: Option<String>,
        #[arg(long)]
        note_type: Option<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("could not determine data directory")?;
    let dir = base.join("jpdb-sync");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create data directory: {}", dir.display()))?;
    Ok(dir)
}

fn collection_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(data_dir()?.join("collection.db")),
    }
}

fn open_collection(path: &Path) -> Result<CollectionStore> {
    CollectionStore::open(path)
        .with_context(|| format!("failed to open collection: {}", path.display()))
}

fn build_client(credentials: Credentials, settings: &Settings) -> Result<JpdbClient> {
    let api_key = credentials
        .api_key
        .unwrap_or_else(|| settings.api_key.clone());

    JpdbClient::new(ClientConfig::new(api_key)).map_err(|e| {
        anyhow::anyhow!(
            "{e}; run `jpdb-sync config set --api-key <KEY>` or set JPDB_API_KEY"
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = config::load_settings();

    match cli.command {
        Command::Decks { credentials } => {
            let client = build_client(credentials, &settings)?;
            commands::decks::run(&client).await.map(|_| ())
        }
        Command::Import {
            deck_id,
            deck,
            note_type,
            credentials,
        } => {
            let client = build_client(credentials, &settings)?;
            let store = open_collection(&collection_path(cli.collection)?)?;

            let request = ImportRequest {
                deck_id,
                target_deck: deck.unwrap_or_else(|| settings.deck_name.clone()),
                note_type: note_type.unwrap_or_else(|| settings.note_type.clone()),
            };

            if let Some(remembered) = config::remembered(&settings, &request) {
                config::save_settings(&remembered)?;
            }

            commands::import::run(&client, &store, &request)
                .await
                .map(|_| ())
        }
        Command::NoteTypes { action } => {
            let store = open_collection(&collection_path(cli.collection)?)?;
            match action {
                None => commands::note_types::list(&store),
                Some(NoteTypeAction::Add { name, fields }) => {
                    commands::note_types::add(&store, &name, &fields)
                }
            }
        }
        Command::Notes { deck } => {
            let store = open_collection(&collection_path(cli.collection)?)?;
            let deck = deck.unwrap_or_else(|| settings.deck_name.clone());
            commands::notes::run(&store, &deck)
        }
        Command::Config { action } => match action {
            ConfigAction::Show => {
                commands::settings::show(&settings);
                Ok(())
            }
            ConfigAction::Set {
                api_key,
                deck,
                note_type,
            } => commands::settings::set(settings, api_key, deck, note_type).map(|_| ()),
        },
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn import_parses_deck_id_and_overrides() {
        let cli = Cli::try_parse_from([
            "jpdb-sync",
            "import",
            "42",
            "--deck",
            "Mining",
            "--note-type",
            "Vocab",
        ])
        .unwrap();

        match cli.command {
            Command::Import {
                deck_id,
                deck,
                note_type,
                ..
            } => {
                assert_eq!(deck_id, 42);
                assert_eq!(deck.as_deref(), Some("Mining"));
                assert_eq!(note_type.as_deref(), Some("Vocab"));
            }
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn note_type_add_requires_fields() {
        let result = Cli::try_parse_from(["jpdb-sync", "note-types", "add", "Vocab"]);
        assert!(result.is_err());
    }

    #[test]
    fn blank_key_is_reported_with_a_hint() {
        let settings = Settings::default();
        let err = build_client(Credentials { api_key: None }, &settings)
            .err()
            .unwrap();
        assert!(err.to_string().contains("JPDB_API_KEY"));
    }
}
