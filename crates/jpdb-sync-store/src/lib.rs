pub mod schema;
pub mod store;

pub use store::{CollectionStore, StoreError, StoredNote};
