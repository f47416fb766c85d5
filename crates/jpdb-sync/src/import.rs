use std::fmt;

use crate::collection::{Collection, CollectionError, DeckHandle};
use crate::feedback::Feedback;
use crate::mapping::{FieldMapping, map_fields};
use crate::resolver::{ResolveLimits, VocabularyResolver};
use crate::service::{ServiceError, VocabularyService};
use crate::vocabulary::RemoteDeck;

/// What to import and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    /// Remote deck to read from.
    pub deck_id: i64,
    /// Local deck to write into; created if missing.
    pub target_deck: String,
    /// Name of an existing local note type.
    pub note_type: String,
}

/// Where a run is (or was when it stopped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Idle,
    Resolving,
    Writing,
    Done,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Resolving => write!(f, "resolving"),
            Self::Writing => write!(f, "writing"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Counters and status log of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub target_deck: String,
    /// Records returned by the service, usable or not.
    pub retrieved: u64,
    pub imported: u64,
    pub skipped: u64,
    pub feedback: Vec<Feedback>,
}

impl ImportReport {
    fn new(target_deck: &str) -> Self {
        Self {
            target_deck: target_deck.to_owned(),
            ..Self::default()
        }
    }

    fn log(&mut self, feedback: Feedback) {
        feedback.trace();
        self.feedback.push(feedback);
    }

    /// One-line outcome of a completed run.
    pub fn summary(&self) -> String {
        format!(
            "Successfully imported {} cards to '{}'!",
            self.imported, self.target_deck
        )
    }
}

/// Problems detected before any request is sent.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("no JPDB API key configured")]
    MissingApiKey,

    #[error("target deck name is empty")]
    EmptyDeckName,

    #[error("note type '{0}' not found")]
    UnknownNoteType(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Collection(#[from] CollectionError),
}

/// A run that stopped early.
///
/// Notes written before the failure stay in the collection; `report` holds
/// the counters up to that point.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct ImportAborted {
    pub stage: ImportStage,
    pub report: ImportReport,
    #[source]
    pub error: ImportError,
}

/// Drives a deck import from the remote service into a local collection.
pub struct ImportPipeline<'a> {
    service: &'a dyn VocabularyService,
    collection: &'a dyn Collection,
    limits: ResolveLimits,
}

impl<'a> ImportPipeline<'a> {
    pub fn new(service: &'a dyn VocabularyService, collection: &'a dyn Collection) -> Self {
        Self {
            service,
            collection,
            limits: ResolveLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ResolveLimits) -> Self {
        self.limits = limits;
        self
    }

    fn resolver(&self) -> VocabularyResolver<'a> {
        VocabularyResolver::with_limits(self.service, self.limits)
    }

    /// Decks available on the remote account, in service order.
    pub async fn list_decks(&self) -> Result<Vec<RemoteDeck>, ServiceError> {
        tracing::info!("Loading decks from JPDB...");
        let decks = self.resolver().list_decks().await?;
        tracing::info!("Loaded {} decks.", decks.len());
        Ok(decks)
    }

    /// Import every resolvable entry of a remote deck.
    ///
    /// Batches are written as soon as they are resolved, so a failing
    /// request leaves the notes of earlier batches in place.
    pub async fn run_import(&self, request: &ImportRequest) -> Result<ImportReport, ImportAborted> {
        let mut report = ImportReport::new(request.target_deck.trim());
        let mut stage = ImportStage::Idle;

        match self.drive(request, &mut report, &mut stage).await {
            Ok(()) => Ok(report),
            Err(error) => {
                report.log(Feedback::error(format!("Error during import: {error}")));
                Err(ImportAborted {
                    stage,
                    report,
                    error,
                })
            }
        }
    }

    async fn drive(
        &self,
        request: &ImportRequest,
        report: &mut ImportReport,
        stage: &mut ImportStage,
    ) -> Result<(), ImportError> {
        let target_deck = request.target_deck.trim();
        if target_deck.is_empty() {
            return Err(ValidationError::EmptyDeckName.into());
        }

        let note_type = self
            .collection
            .find_note_type(&request.note_type)?
            .ok_or_else(|| ValidationError::UnknownNoteType(request.note_type.clone()))?;
        let field_count = note_type.field_count();

        *stage = ImportStage::Resolving;
        report.log(Feedback::info("Starting import..."));
        report.log(Feedback::info("Fetching cards from JPDB..."));

        let mut chunks = self.resolver().chunks(request.deck_id).await?;
        let total_batches = chunks.remaining();
        let mut deck: Option<DeckHandle> = None;
        let mut batch_number = 0usize;

        while let Some(batch) = chunks.next_chunk().await {
            *stage = ImportStage::Resolving;
            let records = batch?;
            batch_number += 1;
            report.retrieved += records.len() as u64;
            report.log(Feedback::info(format!(
                "Retrieved {} cards (batch {batch_number} of {total_batches}).",
                records.len()
            )));

            *stage = ImportStage::Writing;
            for (position, record) in records.iter().enumerate() {
                let fields = match map_fields(record.as_ref(), field_count) {
                    FieldMapping::Mapped(fields) => fields,
                    FieldMapping::Skip => {
                        tracing::warn!(
                            batch = batch_number,
                            position,
                            "skipping record without spelling"
                        );
                        report.skipped += 1;
                        continue;
                    }
                };

                let deck = match deck {
                    Some(ref deck) => deck,
                    None => deck.insert(self.collection.ensure_deck(target_deck)?),
                };
                self.collection
                    .create_note(&note_type, deck, fields.as_slice())?;
                report.imported += 1;
            }
        }

        self.collection.refresh()?;
        *stage = ImportStage::Done;

        report.log(Feedback::info("Import complete!"));
        report.log(Feedback::info(format!("Imported: {} cards", report.imported)));

        let skipped = format!("Skipped: {} cards", report.skipped);
        if report.skipped > 0 {
            report.log(Feedback::warning(skipped));
        } else {
            report.log(Feedback::info(skipped));
        }

        Ok(())
    }
}
