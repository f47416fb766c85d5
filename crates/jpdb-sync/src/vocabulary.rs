use std::fmt;

/// A `(vocabulary id, spelling id)` pair identifying one lookup-able entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VocabIdPair {
    pub vocabulary_id: i64,
    pub spelling_id: i64,
}

impl VocabIdPair {
    pub fn new(vocabulary_id: i64, spelling_id: i64) -> Self {
        Self {
            vocabulary_id,
            spelling_id,
        }
    }

    /// Build a pair from a raw id entry as listed for a deck.
    ///
    /// A single id is used for both halves of the pair, extra trailing ids
    /// are ignored, and an empty entry yields `None`.
    pub fn from_ids(ids: &[i64]) -> Option<Self> {
        match ids {
            [] => None,
            [id] => Some(Self::new(*id, *id)),
            [vid, sid, ..] => Some(Self::new(*vid, *sid)),
        }
    }

    /// Wire form: `[vid, sid]`.
    pub fn as_array(&self) -> [i64; 2] {
        [self.vocabulary_id, self.spelling_id]
    }
}

impl fmt::Display for VocabIdPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.vocabulary_id, self.spelling_id)
    }
}

/// A deck owned by the remote account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDeck {
    pub id: i64,
    pub name: String,
}

/// One entry of a vocabulary's meaning list.
///
/// The service usually returns plain glosses, but anything else it sends is
/// kept as raw JSON so it can still be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Meaning {
    Text(String),
    Structured(serde_json::Value),
}

impl Meaning {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl From<serde_json::Value> for Meaning {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::Text(s),
            other => Self::Structured(other),
        }
    }
}

impl fmt::Display for Meaning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Structured(value) => write!(f, "{value}"),
        }
    }
}

/// Display fields for one looked-up id pair, in the order they were requested.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedVocabulary {
    pub spellings: Vec<String>,
    pub readings: Vec<String>,
    pub meanings: Vec<Meaning>,
}

impl ResolvedVocabulary {
    pub fn spelling(&self) -> Option<&str> {
        self.spellings.first().map(String::as_str)
    }

    pub fn reading(&self) -> Option<&str> {
        self.readings.first().map(String::as_str)
    }
}
