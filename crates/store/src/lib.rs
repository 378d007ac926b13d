//! `slabtrack-store` — the record lifecycle facade.
//!
//! Composes the validation engine, the workflow guard, and the audit trail
//! around an in-memory record set that is flushed to a pluggable key-value
//! storage port through an explicit write buffer.
//!
//! Construct one [`RecordStore`] at startup and pass it to collaborators;
//! there is no ambient singleton.

pub mod buffer;
pub mod error;
pub mod filter;
pub mod schema;
pub mod storage;
pub mod store;
pub mod summary;


pub use buffer::{WriteBuffer, DEFAULT_FLUSH_DELAY_MS};
pub use error::{BulkResult, StoreError, StoreResult};
pub use filter::RecordFilter;
pub use schema::{SchemaData, SchemaMetadata, StoredSchema, SCHEMA_VERSION};
pub use storage::{FileStorage, InMemoryStorage, StorageError, StoragePort};
pub use store::{RecordDraft, RecordStore};
pub use summary::{InventorySummary, LOW_STOCK_THRESHOLD};
