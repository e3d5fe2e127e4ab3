/*
 * Supplies the items of the current page in document order. The concrete
 * source reads a JSON page snapshot, either a bare array of items or an object
 * that also records the address the page was captured from:
 *
 *   [{"title": "Week 1"}, {}, {"title": "Week 2"}]
 *   {"address": "https://host/courses/12345/modules", "items": [...]}
 *
 * Items without a title stand for locked module items.
 */
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use super::models::Item;

#[derive(Debug)]
pub enum ItemSourceError {
    Io(io::Error),
    Serde(serde_json::Error),
}

impl From<io::Error> for ItemSourceError {
    fn from(err: io::Error) -> Self {
        ItemSourceError::Io(err)
    }
}

impl From<serde_json::Error> for ItemSourceError {
    fn from(err: serde_json::Error) -> Self {
        ItemSourceError::Serde(err)
    }
}

impl std::fmt::Display for ItemSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemSourceError::Io(e) => write!(f, "Could not read page items: {e}"),
            ItemSourceError::Serde(e) => write!(f, "Page items are not valid: {e}"),
        }
    }
}

impl std::error::Error for ItemSourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ItemSourceError::Io(e) => Some(e),
            ItemSourceError::Serde(e) => Some(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ItemSourceError>;

pub trait ItemSourceOperations: Send + Sync {
    fn load_items(&self) -> Result<Vec<Item>>;
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PageSnapshot {
    Items(Vec<Item>),
    Page {
        #[serde(default)]
        address: Option<String>,
        items: Vec<Item>,
    },
}

impl PageSnapshot {
    pub fn address(&self) -> Option<&str> {
        match self {
            PageSnapshot::Items(_) => None,
            PageSnapshot::Page { address, .. } => address.as_deref(),
        }
    }

    pub fn into_items(self) -> Vec<Item> {
        match self {
            PageSnapshot::Items(items) | PageSnapshot::Page { items, .. } => items,
        }
    }
}

pub fn read_page_snapshot(path: &Path) -> Result<PageSnapshot> {
    let reader = BufReader::new(File::open(path)?);
    let snapshot: PageSnapshot = serde_json::from_reader(reader)?;
    Ok(snapshot)
}

// Re-reads the snapshot file on every load, so a reload sees edits to it.
pub struct CoreItemSource {
    snapshot_path: PathBuf,
}

impl CoreItemSource {
    pub fn new(snapshot_path: PathBuf) -> Self {
        CoreItemSource { snapshot_path }
    }
}

impl ItemSourceOperations for CoreItemSource {
    fn load_items(&self) -> Result<Vec<Item>> {
        let items = read_page_snapshot(&self.snapshot_path)?.into_items();
        log::debug!(
            "CoreItemSource: Loaded {} items from {:?}.",
            items.len(),
            self.snapshot_path
        );
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_bare_item_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.json");
        fs::write(&path, r#"[{"title": "Week 1"}, {}, {"title": null}]"#).unwrap();

        let items = CoreItemSource::new(path).load_items().unwrap();
        assert_eq!(items, vec![Item::new("Week 1"), Item::locked(), Item::locked()]);
    }

    #[test]
    fn test_load_page_object_with_address() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.json");
        fs::write(
            &path,
            r#"{"address": "https://host/courses/5/modules", "items": [{"title": "A"}]}"#,
        )
        .unwrap();

        let snapshot = read_page_snapshot(&path).unwrap();
        assert_eq!(snapshot.address(), Some("https://host/courses/5/modules"));
        assert_eq!(snapshot.into_items(), vec![Item::new("A")]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let source = CoreItemSource::new(dir.path().join("absent.json"));
        assert!(matches!(source.load_items(), Err(ItemSourceError::Io(_))));
    }

    #[test]
    fn test_wrong_shape_is_serde_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.json");
        fs::write(&path, r#"{"modules": []}"#).unwrap();
        assert!(matches!(
            CoreItemSource::new(path).load_items(),
            Err(ItemSourceError::Serde(_))
        ));
    }
}
