//! Request bodies and response translation for the JPDB API.
//!
//! The service answers with positional arrays (`[id, name]`,
//! `[vid, sid]`, `[spellings, readings, meanings]`). Everything that
//! indexes into those arrays lives here.

use jpdb_sync::{Meaning, RemoteDeck, ResolvedVocabulary, ServiceError, VocabIdPair};
use serde::Serialize;
use serde_json::{Map, Value};

pub const LIST_DECKS: &str = "list-user-decks";
pub const LIST_DECK_VOCABULARY: &str = "deck/list-vocabulary";
pub const LOOKUP_VOCABULARY: &str = "lookup-vocabulary";

/// Body of `list-user-decks`.
#[derive(Debug, Serialize)]
pub struct ListDecksRequest {
    pub fields: [&'static str; 2],
}

impl Default for ListDecksRequest {
    fn default() -> Self {
        Self {
            fields: ["id", "name"],
        }
    }
}

/// Body of `deck/list-vocabulary`.
#[derive(Debug, Serialize)]
pub struct ListDeckVocabularyRequest {
    pub id: i64,
    // Spelled the way the API spells it.
    pub fetch_occurences: bool,
}

impl ListDeckVocabularyRequest {
    pub fn new(deck_id: i64) -> Self {
        Self {
            id: deck_id,
            fetch_occurences: false,
        }
    }
}

/// Body of `lookup-vocabulary`.
#[derive(Debug, Serialize)]
pub struct LookupVocabularyRequest {
    pub list: Vec<[i64; 2]>,
    pub fields: [&'static str; 3],
}

impl LookupVocabularyRequest {
    pub fn new(pairs: &[VocabIdPair]) -> Self {
        Self {
            list: pairs.iter().map(VocabIdPair::as_array).collect(),
            fields: ["spelling", "reading", "meanings"],
        }
    }
}

/// Serialize a request struct into the JSON object sent as the body.
pub fn to_payload<T: Serialize>(request: &T) -> Result<Value, ServiceError> {
    serde_json::to_value(request).map_err(|e| ServiceError::Parse(e.to_string()))
}

fn take_array(body: &mut Map<String, Value>, key: &str) -> Result<Vec<Value>, ServiceError> {
    match body.remove(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(ServiceError::Parse(format!(
            "expected '{key}' to be an array, got {other}"
        ))),
        None => Err(ServiceError::Parse(format!("response has no '{key}' field"))),
    }
}

/// Translate a `list-user-decks` response. Malformed deck entries are dropped.
pub fn parse_decks(mut body: Map<String, Value>) -> Result<Vec<RemoteDeck>, ServiceError> {
    let entries = take_array(&mut body, "decks")?;

    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            let deck = parse_deck(&entry);
            if deck.is_none() {
                tracing::warn!(%entry, "dropping malformed deck entry");
            }
            deck
        })
        .collect())
}

fn parse_deck(entry: &Value) -> Option<RemoteDeck> {
    match entry.as_array()?.as_slice() {
        [id, name, ..] => Some(RemoteDeck {
            id: id.as_i64()?,
            name: name.as_str()?.to_owned(),
        }),
        _ => None,
    }
}

/// Translate a `deck/list-vocabulary` response into raw id entries.
///
/// An entry holding anything but integers becomes empty, which the resolver
/// drops.
pub fn parse_vocabulary_ids(mut body: Map<String, Value>) -> Result<Vec<Vec<i64>>, ServiceError> {
    let entries = take_array(&mut body, "vocabulary")?;

    Ok(entries
        .iter()
        .map(|entry| {
            entry
                .as_array()
                .and_then(|ids| ids.iter().map(Value::as_i64).collect::<Option<Vec<_>>>())
                .unwrap_or_default()
        })
        .collect())
}

/// Translate a `lookup-vocabulary` response, one slot per requested pair.
///
/// A missing or null `vocabulary_info` is an empty result.
pub fn parse_vocabulary_info(
    mut body: Map<String, Value>,
) -> Result<Vec<Option<ResolvedVocabulary>>, ServiceError> {
    let entries = match body.remove("vocabulary_info") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(ServiceError::Parse(format!(
                "expected 'vocabulary_info' to be an array, got {other}"
            )));
        }
    };

    Ok(entries.into_iter().map(parse_info).collect())
}

/// `[spellings, readings, meanings]`, or `None` when the entry is null,
/// too short, or holds slots of the wrong type.
fn parse_info(entry: Value) -> Option<ResolvedVocabulary> {
    let Value::Array(slots) = entry else {
        return None;
    };
    let mut slots = slots.into_iter();
    let (Some(spellings), Some(readings), Some(meanings)) =
        (slots.next(), slots.next(), slots.next())
    else {
        return None;
    };

    Some(ResolvedVocabulary {
        spellings: string_list(spellings)?,
        readings: string_list(readings)?,
        meanings: meaning_list(meanings),
    })
}

// The live API sends bare strings for spelling and reading.
fn string_list(value: Value) -> Option<Vec<String>> {
    match value {
        Value::Null => Some(Vec::new()),
        Value::String(s) if s.is_empty() => Some(Vec::new()),
        Value::String(s) => Some(vec![s]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

fn meaning_list(value: Value) -> Vec<Meaning> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().map(Meaning::from).collect(),
        other => vec![Meaning::from(other)],
    }
}
