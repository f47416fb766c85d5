use anyhow::Result;
use jpdb_sync_store::CollectionStore;

use super::format;

pub fn run(store: &CollectionStore, deck: &str) -> Result<()> {
    let notes = store.notes_in_deck(deck)?;
    format::print_note_table(deck, &notes);
    Ok(())
}
