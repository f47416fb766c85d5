use std::collections::HashMap;
use std::sync::Mutex;

use crate::{
    Collection, CollectionError, DeckHandle, Meaning, NoteType, RemoteDeck, ResolvedVocabulary,
    ServiceError, VocabIdPair, VocabularyService,
};

/// Scriptable in-memory vocabulary service for testing.
///
/// Pairs without an explicit record resolve to a generated one whose
/// spelling is `word{vid}`, so lookups can be traced back to their ids.
#[derive(Default)]
pub struct FakeVocabularyService {
    decks: Vec<RemoteDeck>,
    entries: HashMap<i64, Vec<Vec<i64>>>,
    records: HashMap<VocabIdPair, Option<ResolvedVocabulary>>,
    fail_deck_listing: bool,
    fail_lookup_call: Option<usize>,
    lookup_calls: Mutex<Vec<Vec<VocabIdPair>>>,
}

impl FakeVocabularyService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deck(mut self, id: i64, name: &str) -> Self {
        self.decks.push(RemoteDeck {
            id,
            name: name.to_owned(),
        });
        self
    }

    pub fn with_deck_entries(mut self, deck_id: i64, entries: Vec<Vec<i64>>) -> Self {
        self.entries.insert(deck_id, entries);
        self
    }

    pub fn with_record(mut self, pair: VocabIdPair, record: Option<ResolvedVocabulary>) -> Self {
        self.records.insert(pair, record);
        self
    }

    /// Make deck listing and deck vocabulary listing fail with a transport error.
    pub fn fail_deck_listing(mut self) -> Self {
        self.fail_deck_listing = true;
        self
    }

    /// Make the lookup call with this zero-based index fail with HTTP 500.
    pub fn fail_lookup_call(mut self, index: usize) -> Self {
        self.fail_lookup_call = Some(index);
        self
    }

    /// Every lookup request received so far, including the failed one.
    pub fn lookup_calls(&self) -> Vec<Vec<VocabIdPair>> {
        self.lookup_calls.lock().unwrap().clone()
    }

    pub fn generated_record(pair: VocabIdPair) -> ResolvedVocabulary {
        ResolvedVocabulary {
            spellings: vec![format!("word{}", pair.vocabulary_id)],
            readings: vec![format!("reading{}", pair.vocabulary_id)],
            meanings: vec![Meaning::text(format!("meaning {}", pair.vocabulary_id))],
        }
    }
}

#[async_trait::async_trait]
impl VocabularyService for FakeVocabularyService {
    async fn list_decks(&self) -> Result<Vec<RemoteDeck>, ServiceError> {
        if self.fail_deck_listing {
            return Err(ServiceError::Transport("connection refused".into()));
        }
        Ok(self.decks.clone())
    }

    async fn list_deck_vocabulary(&self, deck_id: i64) -> Result<Vec<Vec<i64>>, ServiceError> {
        if self.fail_deck_listing {
            return Err(ServiceError::Transport("connection refused".into()));
        }
        self.entries
            .get(&deck_id)
            .cloned()
            .ok_or_else(|| ServiceError::Remote {
                status: 404,
                body: format!("unknown deck {deck_id}"),
            })
    }

    async fn lookup_vocabulary(
        &self,
        pairs: &[VocabIdPair],
    ) -> Result<Vec<Option<ResolvedVocabulary>>, ServiceError> {
        let call_index = {
            let mut calls = self.lookup_calls.lock().unwrap();
            calls.push(pairs.to_vec());
            calls.len() - 1
        };

        if self.fail_lookup_call == Some(call_index) {
            return Err(ServiceError::Remote {
                status: 500,
                body: "internal error".into(),
            });
        }

        Ok(pairs
            .iter()
            .map(|pair| match self.records.get(pair) {
                Some(record) => record.clone(),
                None => Some(Self::generated_record(*pair)),
            })
            .collect())
    }
}

/// A note written to an [`InMemoryCollection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenNote {
    pub deck: String,
    pub note_type: String,
    pub fields: Vec<String>,
}

#[derive(Default)]
struct CollectionState {
    decks: Vec<DeckHandle>,
    notes: Vec<WrittenNote>,
    ensure_deck_calls: usize,
    refreshes: usize,
}

/// In-memory collection for testing.
#[derive(Default)]
pub struct InMemoryCollection {
    note_types: Vec<NoteType>,
    fail_after_notes: Option<usize>,
    state: Mutex<CollectionState>,
}

impl InMemoryCollection {
    /// A collection holding the default two-field `Basic` note type.
    pub fn new() -> Self {
        Self::default().with_note_type("Basic", &["Front", "Back"])
    }

    pub fn with_note_type(mut self, name: &str, fields: &[&str]) -> Self {
        let id = self.note_types.len() as i64 + 1;
        self.note_types.push(NoteType {
            id,
            name: name.to_owned(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        });
        self
    }

    /// Reject every note after the first `count` successful writes.
    pub fn fail_after_notes(mut self, count: usize) -> Self {
        self.fail_after_notes = Some(count);
        self
    }

    pub fn notes(&self) -> Vec<WrittenNote> {
        self.state.lock().unwrap().notes.clone()
    }

    pub fn deck_names(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.decks.iter().map(|d| d.name.clone()).collect()
    }

    pub fn ensure_deck_calls(&self) -> usize {
        self.state.lock().unwrap().ensure_deck_calls
    }

    pub fn refreshes(&self) -> usize {
        self.state.lock().unwrap().refreshes
    }
}

impl Collection for InMemoryCollection {
    fn ensure_deck(&self, name: &str) -> Result<DeckHandle, CollectionError> {
        let mut state = self.state.lock().unwrap();
        state.ensure_deck_calls += 1;

        if let Some(deck) = state.decks.iter().find(|d| d.name == name) {
            return Ok(deck.clone());
        }

        let deck = DeckHandle {
            id: state.decks.len() as i64 + 1,
            name: name.to_owned(),
        };
        state.decks.push(deck.clone());
        Ok(deck)
    }

    fn find_note_type(&self, name: &str) -> Result<Option<NoteType>, CollectionError> {
        Ok(self.note_types.iter().find(|nt| nt.name == name).cloned())
    }

    fn note_type_names(&self) -> Result<Vec<String>, CollectionError> {
        Ok(self.note_types.iter().map(|nt| nt.name.clone()).collect())
    }

    fn create_note(
        &self,
        note_type: &NoteType,
        deck: &DeckHandle,
        fields: &[String],
    ) -> Result<(), CollectionError> {
        let mut state = self.state.lock().unwrap();

        if self
            .fail_after_notes
            .is_some_and(|limit| state.notes.len() >= limit)
        {
            return Err(CollectionError::Storage("disk full".into()));
        }

        state.notes.push(WrittenNote {
            deck: deck.name.clone(),
            note_type: note_type.name.clone(),
            fields: fields.to_vec(),
        });
        Ok(())
    }

    fn refresh(&self) -> Result<(), CollectionError> {
        self.state.lock().unwrap().refreshes += 1;
        Ok(())
    }
}
