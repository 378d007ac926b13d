//! The persisted schema envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use slabtrack_domain::InventoryRecord;

/// Current envelope version. Bump the minor on additive changes.
pub const SCHEMA_VERSION: &str = "1.0";

/// Everything the store persists, wrapped with version and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSchema {
    pub version: String,
    pub data: SchemaData,
    pub metadata: SchemaMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaData {
    pub records: Vec<InventoryRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMetadata {
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub record_count: usize,
}

impl StoredSchema {
    pub fn new(
        records: Vec<InventoryRecord>,
        created_at: DateTime<Utc>,
        last_modified: DateTime<Utc>,
    ) -> Self {
        let record_count = records.len();
        Self {
            version: SCHEMA_VERSION.to_string(),
            data: SchemaData { records },
            metadata: SchemaMetadata {
                created_at,
                last_modified,
                record_count,
            },
        }
    }

    /// Whether this envelope's version is one we can read.
    pub fn is_compatible(&self) -> bool {
        self.version.split('.').next() == SCHEMA_VERSION.split('.').next()
    }
}
