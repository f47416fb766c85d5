pub mod collection;
pub mod feedback;
pub mod import;
pub mod mapping;
pub mod resolver;
pub mod service;
pub mod vocabulary;

pub use collection::{Collection, CollectionError, DeckHandle, NoteType};
pub use feedback::Feedback;
pub use import::{
    ImportAborted, ImportError, ImportPipeline, ImportReport, ImportRequest, ImportStage,
    ValidationError,
};
pub use mapping::{FieldMapping, MappedFields, map_fields};
pub use resolver::{
    ChunkedResolution, DEFAULT_BATCH_SIZE, DEFAULT_LIMIT, ResolveLimits, VocabularyResolver,
};
pub use service::{ServiceError, VocabularyService};
pub use vocabulary::{Meaning, RemoteDeck, ResolvedVocabulary, VocabIdPair};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
