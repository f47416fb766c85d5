use anyhow::Result;
use jpdb_sync_store::CollectionStore;

use super::format;

pub fn list(store: &CollectionStore) -> Result<()> {
    let note_types = store.note_types()?;
    format::print_note_type_table(&note_types);
    Ok(())
}

pub fn add(store: &CollectionStore, name: &str, fields: &[String]) -> Result<()> {
    let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
    let note_type = store.add_note_type(name, &fields)?;

    println!(
        "Added note type '{}' with {} fields.",
        note_type.name,
        note_type.field_count()
    );

    Ok(())
}
