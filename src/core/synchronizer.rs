/*
 * Keeps rendered checkboxes and the toggle store in step. `synchronize`
 * builds one control per page item from the stored states; `apply_toggle`
 * writes a user's change back under the key recorded in the control.
 */
use super::fingerprint::fingerprint_item_text;
use super::models::{Item, ToggleControl, ToggleControlId};
use super::storage_key::{Scope, StorageKey, make_key};
use super::toggle_store::ToggleStoreOperations;

// Per-item failure while creating a toggle. Never aborts the whole page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    MissingTitle { index: usize },
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::MissingTitle { index } => {
                write!(f, "Item {index} has no title (locked?); no checkbox created")
            }
        }
    }
}

impl std::error::Error for SyncError {}

#[derive(Debug, Default)]
pub struct SyncOutcome {
    pub controls: Vec<ToggleControl>,
    pub skipped: Vec<SyncError>,
}

fn item_title(index: usize, item: &Item) -> Result<&str, SyncError> {
    item.title
        .as_deref()
        .ok_or(SyncError::MissingTitle { index })
}

/*
 * Creates a control for every well-formed item, in document order. A missing
 * store entry counts as unchecked. Malformed items are logged and reported in
 * `SyncOutcome::skipped`; control ids keep the item's document index, so ids
 * may have gaps.
 */
pub fn synchronize(
    scope: &Scope,
    items: &[Item],
    store: &dyn ToggleStoreOperations,
) -> SyncOutcome {
    let mut outcome = SyncOutcome::default();
    for (index, item) in items.iter().enumerate() {
        let title = match item_title(index, item) {
            Ok(title) => title,
            Err(e) => {
                log::warn!("Synchronizer: Skipping item: {e}");
                outcome.skipped.push(e);
                continue;
            }
        };

        let fingerprint = fingerprint_item_text(title);
        let key = make_key(scope, fingerprint);
        let checked = store.get(key.as_str()).unwrap_or(false);
        log::debug!("Synchronizer: Key {key} for '{}' -> {checked}", title.trim());

        outcome.controls.push(ToggleControl {
            id: ToggleControlId(index as u64),
            fingerprint,
            label: title.trim().to_string(),
            checked,
        });
    }
    log::info!(
        "Synchronizer: Rendered {} checkboxes for scope {scope}, skipped {}.",
        outcome.controls.len(),
        outcome.skipped.len()
    );
    outcome
}

/*
 * Records a user's toggle. The key comes from the control's recorded
 * fingerprint. Write failures are logged and otherwise dropped; the control
 * keeps its new visual state either way.
 */
pub fn apply_toggle(
    scope: &Scope,
    control: &mut ToggleControl,
    checked: bool,
    store: &dyn ToggleStoreOperations,
) -> StorageKey {
    control.checked = checked;
    let key = make_key(scope, control.fingerprint);
    log::debug!("Synchronizer: Setting {key} to {checked}.");
    if let Err(e) = store.set(key.as_str(), checked) {
        log::error!("Synchronizer: Failed to store state for {key}: {e}");
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fingerprint::{Fingerprint, fingerprint_text};
    use crate::core::toggle_store::{Result as StoreResult, ToggleStoreError};
    use std::collections::BTreeMap;
    use std::io;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<BTreeMap<String, bool>>,
        fail_writes: bool,
    }

    impl ToggleStoreOperations for MemoryStore {
        fn get(&self, key: &str) -> Option<bool> {
            self.records.lock().unwrap().get(key).copied()
        }
        fn set(&self, key: &str, value: bool) -> StoreResult<()> {
            self.set_many(&[(key.to_string(), value)])
        }
        fn set_many(&self, entries: &[(String, bool)]) -> StoreResult<()> {
            if self.fail_writes {
                return Err(ToggleStoreError::Io(io::Error::other("disk full")));
            }
            let mut records = self.records.lock().unwrap();
            for (k, v) in entries {
                records.insert(k.clone(), *v);
            }
            Ok(())
        }
        fn snapshot(&self) -> Vec<(String, bool)> {
            self.records
                .lock()
                .unwrap()
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect()
        }
    }

    fn scope() -> Scope {
        Scope::new("12345").unwrap()
    }

    #[test]
    fn test_synchronize_reflects_stored_states() {
        let store = MemoryStore::default();
        let fp_b = fingerprint_text("Week 2");
        store.set(&format!("12345_{fp_b}"), true).unwrap();
        store.set(&format!("12345_{}", fingerprint_text("Week 3")), false).unwrap();

        let items = vec![Item::new("Week 1"), Item::new(" Week 2 "), Item::new("Week 3")];
        let outcome = synchronize(&scope(), &items, &store);

        let states: Vec<bool> = outcome.controls.iter().map(|c| c.checked).collect();
        assert_eq!(states, vec![false, true, false]);
        assert_eq!(outcome.controls[1].fingerprint, fp_b);
        assert_eq!(outcome.controls[1].label, "Week 2");
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_malformed_item_is_skipped_not_fatal() {
        let store = MemoryStore::default();
        let items = vec![
            Item::new("Intro"),
            Item::locked(),
            Item::new("Quiz"),
            Item::new("Wrap-up"),
        ];

        let outcome = synchronize(&scope(), &items, &store);

        assert_eq!(outcome.controls.len(), items.len() - 1);
        assert_eq!(outcome.skipped, vec![SyncError::MissingTitle { index: 1 }]);
        let ids: Vec<u64> = outcome.controls.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![0, 2, 3]);
    }

    #[test]
    fn test_toggle_then_resync_reflects_new_state() {
        let store = MemoryStore::default();
        let items = vec![Item::new("Intro"), Item::new("Quiz")];

        let mut outcome = synchronize(&scope(), &items, &store);
        let key = apply_toggle(&scope(), &mut outcome.controls[1], true, &store);
        assert_eq!(key, make_key(&scope(), fingerprint_text("Quiz")));

        let reloaded = synchronize(&scope(), &items, &store);
        assert!(!reloaded.controls[0].checked);
        assert!(reloaded.controls[1].checked);
    }

    #[test]
    fn test_toggle_uses_recorded_fingerprint() {
        let store = MemoryStore::default();
        let mut control = ToggleControl {
            id: ToggleControlId(0),
            fingerprint: Fingerprint(-7),
            label: "Renamed on the page since".into(),
            checked: false,
        };
        apply_toggle(&scope(), &mut control, true, &store);
        assert_eq!(store.get("12345_-7"), Some(true));
        assert!(control.checked);
    }

    #[test]
    fn test_toggle_write_failure_is_swallowed() {
        let store = MemoryStore {
            fail_writes: true,
            ..Default::default()
        };
        let mut control = ToggleControl {
            id: ToggleControlId(0),
            fingerprint: Fingerprint(1),
            label: "A".into(),
            checked: false,
        };
        apply_toggle(&scope(), &mut control, true, &store);
        assert!(control.checked);
        assert!(store.snapshot().is_empty());
    }
}
