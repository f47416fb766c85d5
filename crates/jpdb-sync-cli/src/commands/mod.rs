pub mod decks;
pub mod format;
pub mod import;
pub mod note_types;
pub mod notes;
pub mod settings;
