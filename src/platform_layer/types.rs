/*
 * Types exchanged between the application logic and the platform layer:
 * platform-agnostic events (`AppEvent`), commands the platform executes
 * (`PlatformCommand`), notification severities, the descriptor of a rendered
 * checkbox, and the `PlatformEventHandler` trait the logic implements.
 */

use std::path::PathBuf;

use crate::core::ToggleControlId;

// Represents the visual check state of a checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Checked,
    Unchecked,
}

impl CheckState {
    pub fn from_checked(checked: bool) -> Self {
        if checked {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }
    }

    pub fn is_checked(self) -> bool {
        self == CheckState::Checked
    }
}

// Describes a checkbox to be placed in front of a page item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleDescriptor {
    pub control_id: ToggleControlId,
    pub element_id: String,
    pub label: String,
    pub state: CheckState,
}

// Buttons added to the page header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderAction {
    Import,
    Export,
}

// --- Events from Platform to App Logic ---

#[derive(Debug)]
pub enum AppEvent {
    // The page finished loading (or reloading); items can be enumerated.
    PageReady,
    ToggleChangedByUser {
        control_id: ToggleControlId,
        new_state: CheckState,
    },
    HeaderButtonClicked {
        action: HeaderAction,
    },
    // Result of the file picker. `None` means the user chose no file.
    FileOpenDialogCompleted {
        result: Option<PathBuf>,
    },
    // Completion of a `ReadFileContents` command.
    FileReadCompleted {
        path: PathBuf,
        result: Result<Vec<u8>, String>,
    },
}

// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageSeverity {
    Information,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCommand {
    AddHeaderButton {
        action: HeaderAction,
        text: String,
    },
    RenderToggles {
        toggles: Vec<ToggleDescriptor>,
    },
    ShowOpenFileDialog {
        title: String,
        filter_spec: String,
    },
    ReadFileContents {
        path: PathBuf,
    },
    OfferDownload {
        filename: String,
        mime_type: String,
        content: String,
    },
    ShowNotification {
        severity: MessageSeverity,
        message: String,
    },
    ReloadPage,
}

// --- Trait for App Logic to Handle Events ---

// Implemented by the application logic. The platform layer calls
// `handle_event` for each event, then drains queued commands.
pub trait PlatformEventHandler: Send + Sync + 'static {
    fn handle_event(&mut self, event: AppEvent);

    fn try_dequeue_command(&mut self) -> Option<PlatformCommand>;

    fn on_quit(&mut self) {}
}
