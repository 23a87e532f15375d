/// Habits document schema management
///
/// The habits file is a single JSON object. This module creates fresh
/// documents and brings older ones up to the current layout before records
/// are read from them.

use serde_json::{json, Map, Value};

use crate::storage::StorageError;

/// Current document schema version
///
/// Increment this when you add new migrations
pub const CURRENT_VERSION: u64 = 1;

/// Key holding the schema version in the habits document
pub const VERSION_KEY: &str = "schemaVersion";

/// Key holding the habit array in the habits document
pub const HABITS_KEY: &str = "habits";

/// A document with no habits, as written on first use
pub fn empty_document() -> Value {
    json!({ VERSION_KEY: CURRENT_VERSION, HABITS_KEY: [] })
}

/// Wrap serialized habits into a current-version document
pub fn build_document(habits: Vec<Value>) -> Value {
    json!({ VERSION_KEY: CURRENT_VERSION, HABITS_KEY: habits })
}

/// Get the schema version of a document
///
/// Documents written before versioning existed have no version key and
/// count as version 0.
pub fn document_version(doc: &Value) -> u64 {
    doc.get(VERSION_KEY).and_then(Value::as_u64).unwrap_or(0)
}

/// Upgrade a document in place to the current version
///
/// Returns the version the document had before migrating. Documents from a
/// newer version are left untouched and read as well as possible.
pub fn migrate_document(doc: &mut Value) -> Result<u64, StorageError> {
    let from_version = document_version(doc);
    let obj = doc.as_object_mut().ok_or_else(|| {
        StorageError::Migration("habits document is not a JSON object".to_string())
    })?;

    if from_version > CURRENT_VERSION {
        tracing::warn!(
            "Habits document has schema version {} (newer than {}), reading it best-effort",
            from_version,
            CURRENT_VERSION
        );
        return Ok(from_version);
    }

    if from_version < 1 {
        migration_v1(obj);
    }

    // Future migrations would go here:
    // if from_version < 2 {
    //     migration_v2(obj);
    // }

    Ok(from_version)
}

/// Migration to version 1: stamp the version and make sure the habit array exists
fn migration_v1(obj: &mut Map<String, Value>) {
    if !obj.get(HABITS_KEY).is_some_and(Value::is_array) {
        obj.insert(HABITS_KEY.to_string(), Value::Array(Vec::new()));
    }
    obj.insert(VERSION_KEY.to_string(), json!(1));
    tracing::info!("Applied migration v1: versioned habits document");
}
