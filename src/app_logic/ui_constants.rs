/*
 * Texts shown by the checklist: header button labels, the import file picker,
 * and the prefixes of user notifications.
 */

pub const IMPORT_BUTTON_TEXT: &str = "Import";
pub const EXPORT_BUTTON_TEXT: &str = "Export";

pub const IMPORT_DIALOG_TITLE: &str = "Import checkbox states";
pub const IMPORT_FILTER_SPEC: &str = ".json";

// Prefix for notifications about rejected import documents.
pub const IMPORT_FAILED_PREFIX: &str = "Failed to import checkbox states";

// Prefix for notifications about unreadable import files.
pub const FILE_READ_FAILED_PREFIX: &str = "Failed to read file";

pub const ITEMS_LOAD_FAILED_PREFIX: &str = "Failed to load page items";
