use std::sync::Arc;

use crate::vocabulary::{RemoteDeck, ResolvedVocabulary, VocabIdPair};

/// Errors that can occur when talking to the remote vocabulary service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("connection error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("parse error: {0}")]
    Parse(String),
}

/// The remote side of a sync: decks, their vocabulary ids, and lookups.
///
/// Implementations translate the service's positional wire format into the
/// typed records of this crate. Nothing here retries.
#[async_trait::async_trait]
pub trait VocabularyService: Send + Sync {
    /// List the decks of the authenticated account, in service order.
    async fn list_decks(&self) -> Result<Vec<RemoteDeck>, ServiceError>;

    /// List the raw vocabulary id entries of a deck.
    ///
    /// Entries are returned as sent by the service; they may hold zero, one,
    /// or several ids and are normalized by the resolver.
    async fn list_deck_vocabulary(&self, deck_id: i64) -> Result<Vec<Vec<i64>>, ServiceError>;

    /// Resolve a batch of id pairs to display fields.
    ///
    /// The result is positional: entry `i` belongs to `pairs[i]`, and is
    /// `None` when the service could not resolve that pair.
    async fn lookup_vocabulary(
        &self,
        pairs: &[VocabIdPair],
    ) -> Result<Vec<Option<ResolvedVocabulary>>, ServiceError>;
}

#[async_trait::async_trait]
impl<T: VocabularyService + ?Sized> VocabularyService for Arc<T> {
    async fn list_decks(&self) -> Result<Vec<RemoteDeck>, ServiceError> {
        (**self).list_decks().await
    }

    async fn list_deck_vocabulary(&self, deck_id: i64) -> Result<Vec<Vec<i64>>, ServiceError> {
        (**self).list_deck_vocabulary(deck_id).await
    }

    async fn lookup_vocabulary(
        &self,
        pairs: &[VocabIdPair],
    ) -> Result<Vec<Option<ResolvedVocabulary>>, ServiceError> {
        (**self).lookup_vocabulary(pairs).await
    }
}
