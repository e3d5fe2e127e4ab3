use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::fingerprint::Fingerprint;

// One logical unit on the page, e.g. a module item.
// Locked items on a modules page are rendered without a title; they are kept
// here with `title: None` and skipped when toggles are created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub title: Option<String>,
}

#[cfg(test)]
impl Item {
    pub fn new(title: &str) -> Self {
        Item {
            title: Some(title.to_string()),
        }
    }

    pub fn locked() -> Self {
        Item { title: None }
    }
}

// Identifies a rendered toggle control. Assigned in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToggleControlId(pub u64);

/*
 * A rendered checkbox. The `fingerprint` is recorded when the control is
 * created and is what later toggles and exports use to rebuild the storage
 * key, so a control keeps its identity even if the page text changes.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleControl {
    pub id: ToggleControlId,
    pub fingerprint: Fingerprint,
    pub label: String,
    pub checked: bool,
}

impl ToggleControl {
    // The element id the page script gives the checkbox.
    pub fn element_id(&self) -> String {
        format!("checkbox_{}", self.fingerprint)
    }
}

/*
 * Portable snapshot of storage key -> checked state. Keys are plain strings
 * because imported documents may carry keys this crate did not produce.
 */
pub type ExportDocument = BTreeMap<String, bool>;
