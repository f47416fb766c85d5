use anyhow::Result;
use jpdb_sync::{RemoteDeck, VocabularyResolver, VocabularyService};

use super::format;

/// List remote decks. Only talks to the service; the local collection is
/// never opened.
pub async fn run(service: &dyn VocabularyService) -> Result<Vec<RemoteDeck>> {
    eprintln!("Loading decks from JPDB...");

    let decks = VocabularyResolver::new(service).list_decks().await?;
    eprintln!("Loaded {} decks.", decks.len());

    format::print_deck_table(&decks);

    Ok(decks)
}
