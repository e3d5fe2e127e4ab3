/*
 * Platform-agnostic core of the checklist: fingerprinting of item titles,
 * storage keys, scope resolution, the persistent toggle store, synchronizing
 * rendered checkboxes with that store, and bulk export/import. Collaborators
 * with side effects (`ToggleStoreOperations`, `ItemSourceOperations`,
 * `ConfigManagerOperations`) are traits so they can be replaced in tests.
 */
pub mod config;
pub mod fingerprint;
pub mod item_source;
pub mod models;
pub mod path_utils;
pub mod scope_resolver;
pub mod storage_key;
pub mod synchronizer;
pub mod toggle_store;
pub mod transfer;

pub use models::{Item, ToggleControl, ToggleControlId};

#[cfg(test)]
pub use fingerprint::fingerprint_text;
pub use storage_key::{Scope, split_key};

#[cfg(test)]
pub use storage_key::make_key;

pub use scope_resolver::{ScopeError, resolve_scope};

pub use config::{ConfigManagerOperations, CoreConfigManager};

#[cfg(test)]
pub use config::ConfigError;

pub use item_source::{CoreItemSource, ItemSourceOperations};

#[cfg(test)]
pub use item_source::ItemSourceError;

pub use toggle_store::{CoreToggleStore, ToggleStoreOperations};

#[cfg(test)]
pub use toggle_store::ToggleStoreError;

pub use synchronizer::{apply_toggle, synchronize};

pub use transfer::{
    EXPORT_FILENAME, EXPORT_MIME_TYPE, export_document, import_document,
    serialize_export_document,
};
