/// A deck in the local collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckHandle {
    pub id: i64,
    pub name: String,
}

/// A note type in the local collection and the names of its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteType {
    pub id: i64,
    pub name: String,
    pub fields: Vec<String>,
}

impl NoteType {
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Errors raised by the local collection.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Other(String),
}

/// The local flashcard collection notes are written into.
pub trait Collection: Send + Sync {
    /// Return the deck with this name, creating it if it does not exist.
    fn ensure_deck(&self, name: &str) -> Result<DeckHandle, CollectionError>;

    fn find_note_type(&self, name: &str) -> Result<Option<NoteType>, CollectionError>;

    fn note_type_names(&self) -> Result<Vec<String>, CollectionError>;

    /// Add one note. `fields` is ordered like `note_type.fields`.
    fn create_note(
        &self,
        note_type: &NoteType,
        deck: &DeckHandle,
        fields: &[String],
    ) -> Result<(), CollectionError>;

    /// Called once after a successful import so the collection can update
    /// whatever view it keeps of its contents.
    fn refresh(&self) -> Result<(), CollectionError>;
}
