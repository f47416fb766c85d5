use anyhow::Result;

use crate::config::{self, Settings};

use super::format;

pub fn show(settings: &Settings) {
    println!("API key:   {}", format::mask_secret(&settings.api_key));
    println!("Deck:      {}", settings.deck_name);
    println!("Note type: {}", settings.note_type);

    if let Some(path) = config::settings_path() {
        println!("File:      {}", path.display());
    }
}

/// Apply the given changes and persist them. Returns the updated settings.
pub fn set(
    mut settings: Settings,
    api_key: Option<String>,
    deck: Option<String>,
    note_type: Option<String>,
) -> Result<Settings> {
    if let Some(key) = api_key {
        settings.api_key = key.trim().to_owned();
    }
    if let Some(deck) = deck {
        settings.deck_name = deck.trim().to_owned();
    }
    if let Some(note_type) = note_type {
        settings.note_type = note_type;
    }

    config::save_settings(&settings)?;
    println!("Settings saved.");

    Ok(settings)
}
