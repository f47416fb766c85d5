use rusqlite_migration::{M, Migrations};

pub fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(
        "CREATE TABLE decks (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE
        );

        CREATE TABLE note_types (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE,
            fields_json TEXT NOT NULL DEFAULT '[]'
        );

        CREATE TABLE notes (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            deck_id       INTEGER NOT NULL,
            note_type_id  INTEGER NOT NULL,
            fields_json   TEXT NOT NULL,
            created_at    TEXT NOT NULL,
            FOREIGN KEY (deck_id) REFERENCES decks(id),
            FOREIGN KEY (note_type_id) REFERENCES note_types(id)
        );

        CREATE TABLE meta (
            key         TEXT PRIMARY KEY,
            value       TEXT
        );

        CREATE INDEX idx_notes_deck ON notes(deck_id);

        INSERT INTO note_types (name, fields_json) VALUES ('Basic', '[\"Front\",\"Back\"]');",
    )])
}
