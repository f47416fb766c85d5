use crate::service::{ServiceError, VocabularyService};
use crate::vocabulary::{RemoteDeck, ResolvedVocabulary, VocabIdPair};

/// Maximum number of deck entries resolved in one run.
pub const DEFAULT_LIMIT: usize = 1000;

/// Maximum number of id pairs sent in one lookup request.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Caps applied while resolving a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveLimits {
    pub limit: usize,
    pub batch_size: usize,
}

impl Default for ResolveLimits {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Turns a deck id into resolved vocabulary records.
pub struct VocabularyResolver<'a> {
    service: &'a dyn VocabularyService,
    limits: ResolveLimits,
}

impl<'a> VocabularyResolver<'a> {
    pub fn new(service: &'a dyn VocabularyService) -> Self {
        Self::with_limits(service, ResolveLimits::default())
    }

    pub fn with_limits(service: &'a dyn VocabularyService, limits: ResolveLimits) -> Self {
        Self { service, limits }
    }

    pub fn limits(&self) -> ResolveLimits {
        self.limits
    }

    pub async fn list_decks(&self) -> Result<Vec<RemoteDeck>, ServiceError> {
        self.service.list_decks().await
    }

    /// Fetch the deck's id list and plan its lookup batches without
    /// issuing any lookup yet.
    pub async fn chunks(&self, deck_id: i64) -> Result<ChunkedResolution<'a>, ServiceError> {
        let entries = self.service.list_deck_vocabulary(deck_id).await?;
        let chunks = plan_chunks(&entries, self.limits);

        tracing::debug!(
            deck_id,
            listed = entries.len(),
            batches = chunks.len(),
            "planned vocabulary lookups"
        );

        Ok(ChunkedResolution {
            service: self.service,
            pending: chunks.into_iter(),
        })
    }

    /// Resolve every retained entry of a deck, in deck order.
    ///
    /// The first failing request aborts the whole resolution.
    pub async fn resolve_deck(
        &self,
        deck_id: i64,
    ) -> Result<Vec<Option<ResolvedVocabulary>>, ServiceError> {
        let mut chunks = self.chunks(deck_id).await?;
        let mut resolved = Vec::new();

        while let Some(batch) = chunks.next_chunk().await {
            resolved.extend(batch?);
        }

        Ok(resolved)
    }
}

/// Lookup batches of one deck, resolved one request at a time.
pub struct ChunkedResolution<'a> {
    service: &'a dyn VocabularyService,
    pending: std::vec::IntoIter<Vec<VocabIdPair>>,
}

impl ChunkedResolution<'_> {
    /// Number of lookup requests still to be made.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Look up the next batch. Returns `None` once every batch was issued.
    pub async fn next_chunk(
        &mut self,
    ) -> Option<Result<Vec<Option<ResolvedVocabulary>>, ServiceError>> {
        let pairs = self.pending.next()?;
        tracing::debug!(pairs = pairs.len(), "looking up vocabulary batch");
        Some(self.service.lookup_vocabulary(&pairs).await)
    }
}

/// Truncate raw deck entries to the limit, split them into batches and
/// normalize each entry into an id pair.
///
/// Batches are cut before empty entries are dropped, so a batch may end up
/// smaller than `batch_size`. Batches left with no pairs are omitted.
pub fn plan_chunks(entries: &[Vec<i64>], limits: ResolveLimits) -> Vec<Vec<VocabIdPair>> {
    let retained = &entries[..entries.len().min(limits.limit)];

    retained
        .chunks(limits.batch_size.max(1))
        .map(|chunk| {
            chunk
                .iter()
                .filter_map(|ids| VocabIdPair::from_ids(ids))
                .collect::<Vec<_>>()
        })
        .filter(|pairs| !pairs.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::test_support::FakeVocabularyService;

    use super::*;

    fn ids(n: usize) -> Vec<Vec<i64>> {
        (1..=n as i64).map(|i| vec![i, i + 10_000]).collect()
    }

    fn limits(limit: usize, batch_size: usize) -> ResolveLimits {
        ResolveLimits { limit, batch_size }
    }

    #[test]
    fn chunks_cover_every_retained_entry_once() {
        let entries = ids(250);
        let chunks = plan_chunks(&entries, limits(1000, 100));

        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![100, 100, 50]);

        let flat: Vec<i64> = chunks.iter().flatten().map(|p| p.vocabulary_id).collect();
        let expected: Vec<i64> = (1..=250).collect();
        assert_eq!(flat, expected);
    }

    #[test]
    fn chunks_respect_limit() {
        let entries = ids(30);
        let chunks = plan_chunks(&entries, limits(25, 10));

        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![10, 10, 5]);
    }

    #[test]
    fn chunks_drop_empty_entries_and_normalize_pairs() {
        let entries = vec![vec![1], vec![], vec![2, 3], vec![4, 5, 6]];
        let chunks = plan_chunks(&entries, limits(1000, 100));

        assert_eq!(
            chunks,
            vec![vec![
                VocabIdPair::new(1, 1),
                VocabIdPair::new(2, 3),
                VocabIdPair::new(4, 5),
            ]]
        );
    }

    #[test]
    fn batch_of_only_empty_entries_is_omitted() {
        let entries = vec![vec![], vec![], vec![7]];
        let chunks = plan_chunks(&entries, limits(1000, 2));
        assert_eq!(chunks, vec![vec![VocabIdPair::new(7, 7)]]);
    }

    #[test]
    fn zero_batch_size_is_treated_as_one() {
        let chunks = plan_chunks(&ids(3), limits(1000, 0));
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn empty_deck_plans_nothing() {
        assert!(plan_chunks(&[], ResolveLimits::default()).is_empty());
    }

    #[tokio::test]
    async fn resolve_deck_issues_one_lookup_per_batch_in_order() {
        let service = FakeVocabularyService::new().with_deck_entries(7, ids(250));
        let resolver = VocabularyResolver::with_limits(&service, limits(1000, 100));

        let resolved = resolver.resolve_deck(7).await.unwrap();
        assert_eq!(resolved.len(), 250);

        let calls = service.lookup_calls();
        let sizes: Vec<usize> = calls.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
        assert_eq!(calls[0][0], VocabIdPair::new(1, 10_001));
        assert_eq!(calls[2][49], VocabIdPair::new(250, 10_250));
    }

    #[tokio::test]
    async fn resolve_deck_never_exceeds_limit() {
        let service = FakeVocabularyService::new().with_deck_entries(7, ids(40));
        let resolver = VocabularyResolver::with_limits(&service, limits(15, 10));

        let resolved = resolver.resolve_deck(7).await.unwrap();
        assert_eq!(resolved.len(), 15);
    }

    #[tokio::test]
    async fn resolve_deck_aborts_on_first_failed_lookup() {
        let service = FakeVocabularyService::new()
            .with_deck_entries(7, ids(250))
            .fail_lookup_call(1);
        let resolver = VocabularyResolver::with_limits(&service, limits(1000, 100));

        let result = resolver.resolve_deck(7).await;
        assert!(matches!(result, Err(ServiceError::Remote { status: 500, .. })));
        assert_eq!(service.lookup_calls().len(), 2);
    }

    #[tokio::test]
    async fn resolve_deck_propagates_listing_failure() {
        let service = FakeVocabularyService::new().fail_deck_listing();
        let resolver = VocabularyResolver::new(&service);

        let result = resolver.resolve_deck(1).await;
        assert!(matches!(result, Err(ServiceError::Transport(_))));
        assert!(service.lookup_calls().is_empty());
    }

    #[tokio::test]
    async fn chunked_resolution_counts_down() {
        let service = FakeVocabularyService::new().with_deck_entries(3, ids(5));
        let resolver = VocabularyResolver::with_limits(&service, limits(1000, 2));

        let mut chunks = resolver.chunks(3).await.unwrap();
        assert_eq!(chunks.remaining(), 3);
        chunks.next_chunk().await.unwrap().unwrap();
        assert_eq!(chunks.remaining(), 2);
        chunks.next_chunk().await.unwrap().unwrap();
        chunks.next_chunk().await.unwrap().unwrap();
        assert!(chunks.next_chunk().await.is_none());
    }
}
