/*
 * Persistent key/value store for checkbox states. Keys are storage keys
 * (`<scope>_<fingerprint>`), values the checked state.
 *
 * `ToggleStoreOperations` is the seam used by the synchronizer and the
 * importer, so both can be exercised against an in-memory fake. The concrete
 * `CoreToggleStore` keeps all records in memory and writes the full map back
 * to a JSON file on every change. A change is only committed to memory after
 * the file write succeeded, which keeps a failed batch from leaving partial
 * state behind.
 */
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::core::path_utils;
use tempfile::NamedTempFile;

pub const TOGGLE_STORE_FILENAME: &str = "toggle_states.json";

#[derive(Debug)]
pub enum ToggleStoreError {
    Io(io::Error),
    Serde(serde_json::Error),
    NoConfigDirectory,
}

impl From<io::Error> for ToggleStoreError {
    fn from(err: io::Error) -> Self {
        ToggleStoreError::Io(err)
    }
}

impl From<serde_json::Error> for ToggleStoreError {
    fn from(err: serde_json::Error) -> Self {
        ToggleStoreError::Serde(err)
    }
}

impl std::fmt::Display for ToggleStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToggleStoreError::Io(e) => write!(f, "Toggle store I/O error: {e}"),
            ToggleStoreError::Serde(e) => write!(f, "Toggle store format error: {e}"),
            ToggleStoreError::NoConfigDirectory => {
                write!(f, "Could not determine directory for the toggle store")
            }
        }
    }
}

impl std::error::Error for ToggleStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToggleStoreError::Io(e) => Some(e),
            ToggleStoreError::Serde(e) => Some(e),
            ToggleStoreError::NoConfigDirectory => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ToggleStoreError>;

pub trait ToggleStoreOperations: Send + Sync {
    fn get(&self, key: &str) -> Option<bool>;
    fn set(&self, key: &str, value: bool) -> Result<()>;

    // Writes all entries or none of them.
    fn set_many(&self, entries: &[(String, bool)]) -> Result<()>;

    // All records, ordered by key.
    fn snapshot(&self) -> Vec<(String, bool)>;
}

pub struct CoreToggleStore {
    file_path: PathBuf,
    records: Mutex<BTreeMap<String, bool>>,
}

impl CoreToggleStore {
    /*
     * Opens the store file at `file_path`, starting empty if it does not exist
     * yet. A file that exists but does not hold a JSON object of booleans is
     * an error rather than being silently replaced.
     */
    pub fn open(file_path: &Path) -> Result<Self> {
        let records = if file_path.exists() {
            let reader = BufReader::new(File::open(file_path)?);
            let records: BTreeMap<String, bool> = serde_json::from_reader(reader)?;
            log::debug!(
                "CoreToggleStore: Loaded {} records from {file_path:?}.",
                records.len()
            );
            records
        } else {
            log::debug!("CoreToggleStore: No store at {file_path:?}, starting empty.");
            BTreeMap::new()
        };
        Ok(CoreToggleStore {
            file_path: file_path.to_path_buf(),
            records: Mutex::new(records),
        })
    }

    // Opens the store in the app's local config directory.
    pub fn open_default(app_name: &str) -> Result<Self> {
        let dir = path_utils::get_base_app_config_local_dir(app_name)
            .ok_or(ToggleStoreError::NoConfigDirectory)?;
        Self::open(&dir.join(TOGGLE_STORE_FILENAME))
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn lock_records(&self) -> MutexGuard<'_, BTreeMap<String, bool>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, records: &BTreeMap<String, bool>) -> Result<()> {
        write_replacing(&self.file_path, |writer| {
            serde_json::to_writer_pretty(writer, records)?;
            Ok(())
        })?;
        log::trace!(
            "CoreToggleStore: Wrote {} records to {:?}.",
            records.len(),
            self.file_path
        );
        Ok(())
    }
}

/*
 * Writes a new version of `path` into a temporary file next to it and renames
 * that over `path`. Until the rename, the previous file stays intact; a failed
 * write only removes the temporary file.
 */
fn write_replacing<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp_file = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| ToggleStoreError::Io(e.error))?;
    Ok(())
}

impl ToggleStoreOperations for CoreToggleStore {
    fn get(&self, key: &str) -> Option<bool> {
        self.lock_records().get(key).copied()
    }

    fn set(&self, key: &str, value: bool) -> Result<()> {
        self.set_many(&[(key.to_string(), value)])
    }

    fn set_many(&self, entries: &[(String, bool)]) -> Result<()> {
        let mut records = self.lock_records();
        let mut updated = records.clone();
        for (key, value) in entries {
            updated.insert(key.clone(), *value);
        }
        self.persist(&updated)?;
        *records = updated;
        log::debug!("CoreToggleStore: Committed {} entries.", entries.len());
        Ok(())
    }

    fn snapshot(&self) -> Vec<(String, bool)> {
        self.lock_records()
            .iter()
            .map(|(key, value)| (key.clone(), *value))
            .collect()
    }
}
