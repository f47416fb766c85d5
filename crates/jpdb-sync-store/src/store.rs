use std::path::Path;
use std::sync::Mutex;

use jpdb_sync::{Collection, CollectionError, DeckHandle, NoteType};

use crate::schema;

/// A note as stored in the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredNote {
    pub id: i64,
    pub deck: String,
    pub note_type: String,
    pub fields: Vec<String>,
}

/// A SQLite-backed flashcard collection that implements `Collection`.
pub struct CollectionStore {
    conn: Mutex<rusqlite::Connection>,
}

impl CollectionStore {
    /// Open a collection backed by a file on disk.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn =
            rusqlite::Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::from_connection(conn)
    }

    /// Open an in-memory collection (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = rusqlite::Connection::open_in_memory()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: rusqlite::Connection) -> Result<Self, StoreError> {
        schema::migrations()
            .to_latest(&mut conn)
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Register a note type with the given field names.
    pub fn add_note_type(&self, name: &str, fields: &[&str]) -> Result<NoteType, StoreError> {
        let conn = self.conn.lock().unwrap();

        let fields_json =
            serde_json::to_string(fields).map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "INSERT INTO note_types (name, fields_json) VALUES (?1, ?2)",
            rusqlite::params![name, fields_json],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Duplicate(name.to_owned())
            }
            other => StoreError::Database(other.to_string()),
        })?;

        Ok(NoteType {
            id: conn.last_insert_rowid(),
            name: name.to_owned(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        })
    }

    /// All note types, ordered by name.
    pub fn note_types(&self) -> Result<Vec<NoteType>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare("SELECT id, name, fields_json FROM note_types ORDER BY name")
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let note_types = stmt
            .query_map([], Self::row_to_note_type)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(note_types)
    }

    pub fn deck_names(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare("SELECT name FROM decks ORDER BY name")
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let names: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(names)
    }

    /// Notes of one deck, oldest first.
    pub fn notes_in_deck(&self, deck: &str) -> Result<Vec<StoredNote>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(
                "SELECT notes.id, decks.name, note_types.name, notes.fields_json
                 FROM notes
                 JOIN decks ON decks.id = notes.deck_id
                 JOIN note_types ON note_types.id = notes.note_type_id
                 WHERE decks.name = ?1
                 ORDER BY notes.id",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let notes = stmt
            .query_map([deck], Self::row_to_note)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(notes)
    }

    /// Epoch seconds of the last `refresh`, if any.
    pub fn last_refreshed_at(&self) -> Result<Option<u64>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let value: Option<Option<String>> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'last_refreshed_at'",
                [],
                |row| row.get(0),
            )
            .ok();

        Ok(value.flatten().and_then(|v| v.parse().ok()))
    }

    fn row_to_note_type(row: &rusqlite::Row) -> rusqlite::Result<NoteType> {
        let id: i64 = row.get(0)?;
        let name: String = row.get(1)?;
        let fields_json: String = row.get(2)?;

        Ok(NoteType {
            id,
            name,
            fields: serde_json::from_str(&fields_json).unwrap_or_default(),
        })
    }

    fn row_to_note(row: &rusqlite::Row) -> rusqlite::Result<StoredNote> {
        let id: i64 = row.get(0)?;
        let deck: String = row.get(1)?;
        let note_type: String = row.get(2)?;
        let fields_json: String = row.get(3)?;

        Ok(StoredNote {
            id,
            deck,
            note_type,
            fields: serde_json::from_str(&fields_json).unwrap_or_default(),
        })
    }
}

impl Collection for CollectionStore {
    fn ensure_deck(&self, name: &str) -> Result<DeckHandle, CollectionError> {
        let conn = self.conn.lock().unwrap();

        conn.execute("INSERT OR IGNORE INTO decks (name) VALUES (?1)", [name])
            .map_err(|e| CollectionError::Storage(e.to_string()))?;

        let id: i64 = conn
            .query_row("SELECT id FROM decks WHERE name = ?1", [name], |row| {
                row.get(0)
            })
            .map_err(|e| CollectionError::Storage(e.to_string()))?;

        tracing::debug!(deck = name, id, "using deck");

        Ok(DeckHandle {
            id,
            name: name.to_owned(),
        })
    }

    fn find_note_type(&self, name: &str) -> Result<Option<NoteType>, CollectionError> {
        let conn = self.conn.lock().unwrap();

        match conn.query_row(
            "SELECT id, name, fields_json FROM note_types WHERE name = ?1",
            [name],
            Self::row_to_note_type,
        ) {
            Ok(note_type) => Ok(Some(note_type)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CollectionError::Storage(e.to_string())),
        }
    }

    fn note_type_names(&self) -> Result<Vec<String>, CollectionError> {
        Ok(self
            .note_types()
            .map_err(|e| CollectionError::Storage(e.to_string()))?
            .into_iter()
            .map(|nt| nt.name)
            .collect())
    }

    fn create_note(
        &self,
        note_type: &NoteType,
        deck: &DeckHandle,
        fields: &[String],
    ) -> Result<(), CollectionError> {
        let conn = self.conn.lock().unwrap();

        let fields_json =
            serde_json::to_string(fields).map_err(|e| CollectionError::Storage(e.to_string()))?;

        conn.execute(
            "INSERT INTO notes (deck_id, note_type_id, fields_json, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![deck.id, note_type.id, fields_json, now_epoch_secs()],
        )
        .map_err(|e| CollectionError::Storage(e.to_string()))?;

        Ok(())
    }

    fn refresh(&self) -> Result<(), CollectionError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES ('last_refreshed_at', ?1)",
            [now_epoch_secs()],
        )
        .map_err(|e| CollectionError::Storage(e.to_string()))?;

        Ok(())
    }
}

/// Errors specific to store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("note type '{0}' already exists")]
    Duplicate(String),
}

fn now_epoch_secs() -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    now.to_string()
}
