/*
 * Bulk export and import of checkbox states.
 *
 * An export document is a flat JSON object of storage key -> bool, covering
 * the checkboxes currently rendered. Importing validates the whole document
 * before a single entry is written; keys are stored verbatim, so entries for
 * other courses or renamed items are kept until a matching item shows up.
 */
use serde_json::Value;

use super::models::{ExportDocument, ToggleControl};
use super::storage_key::{Scope, make_key};
use super::toggle_store::{ToggleStoreError, ToggleStoreOperations};

pub const EXPORT_FILENAME: &str = "checkbox_states.json";
pub const EXPORT_MIME_TYPE: &str = "application/json";

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug)]
pub enum ImportError {
    MalformedDocument(serde_json::Error),
    InvalidShape,
    InvalidValueType { key: String },
    Store(ToggleStoreError),
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::MalformedDocument(err)
    }
}

impl From<ToggleStoreError> for ImportError {
    fn from(err: ToggleStoreError) -> Self {
        ImportError::Store(err)
    }
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::MalformedDocument(e) => write!(f, "Invalid data: not JSON ({e})"),
            ImportError::InvalidShape => write!(f, "Invalid data: not an object"),
            ImportError::InvalidValueType { key } => {
                write!(f, "Invalid data: not a boolean (key '{key}')")
            }
            ImportError::Store(e) => write!(f, "Could not save imported states: {e}"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::MalformedDocument(e) => Some(e),
            ImportError::Store(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;

pub fn export_document(scope: &Scope, controls: &[ToggleControl]) -> ExportDocument {
    controls
        .iter()
        .map(|control| {
            (
                make_key(scope, control.fingerprint).into_string(),
                control.checked,
            )
        })
        .collect()
}

pub fn serialize_export_document(document: &ExportDocument) -> String {
    // A map of strings to bools always serializes.
    serde_json::to_string(document).unwrap_or_else(|e| {
        log::error!("Transfer: Failed to serialize export document: {e}");
        String::from("{}")
    })
}

/*
 * Parses and validates an import document. Checks run in order: valid JSON,
 * then a JSON object, then strictly boolean values. No coercion from numbers
 * or strings. A leading UTF-8 byte order mark is skipped, and numbers of any
 * magnitude parse (and are then rejected as non-boolean).
 */
pub fn parse_import_document(bytes: &[u8]) -> Result<ExportDocument> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Object(map) = value else {
        return Err(ImportError::InvalidShape);
    };

    let mut document = ExportDocument::new();
    for (key, value) in map {
        match value {
            Value::Bool(checked) => {
                document.insert(key, checked);
            }
            _ => return Err(ImportError::InvalidValueType { key }),
        }
    }
    Ok(document)
}

/*
 * Validates `bytes` and then writes every entry to `store` as one batch.
 * Returns the number of entries written. On error the store is unchanged.
 */
pub fn import_document(bytes: &[u8], store: &dyn ToggleStoreOperations) -> Result<usize> {
    let document = parse_import_document(bytes)?;
    let entries: Vec<(String, bool)> = document.into_iter().collect();
    store.set_many(&entries)?;
    log::info!("Transfer: Imported {} checkbox states.", entries.len());
    Ok(entries.len())
}
