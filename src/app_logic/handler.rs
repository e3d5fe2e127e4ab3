use crate::app_logic::ui_constants;
use crate::core::{
    self, EXPORT_FILENAME, EXPORT_MIME_TYPE, ItemSourceOperations, Scope, ToggleControl,
    ToggleControlId, ToggleStoreOperations,
};
use crate::platform_layer::{
    AppEvent, CheckState, HeaderAction, MessageSeverity, PlatformCommand, PlatformEventHandler,
    ToggleDescriptor,
};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

/*
 * Checklist logic for one page session, in a platform-agnostic manner. It
 * reacts to `AppEvent`s from the platform layer and queues `PlatformCommand`s
 * for it: rendering checkboxes from the toggle store, writing toggles back,
 * and running the export and import flows.
 *
 * The toggle store and the item source are injected, so tests can drive the
 * logic with fakes and inspect the queued commands.
 */
pub struct ChecklistLogic {
    scope: Scope,
    toggle_store: Arc<dyn ToggleStoreOperations>,
    item_source: Arc<dyn ItemSourceOperations>,
    pub(crate) controls: Vec<ToggleControl>,
    header_buttons_created: bool,
    // File chosen in the import dialog whose contents are still being read.
    pub(crate) pending_import: Option<PathBuf>,
    synthetic_commands: VecDeque<PlatformCommand>,
}

impl ChecklistLogic {
    pub fn new(
        scope: Scope,
        toggle_store: Arc<dyn ToggleStoreOperations>,
        item_source: Arc<dyn ItemSourceOperations>,
    ) -> Self {
        ChecklistLogic {
            scope,
            toggle_store,
            item_source,
            controls: Vec::new(),
            header_buttons_created: false,
            pending_import: None,
            synthetic_commands: VecDeque::new(),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    fn enqueue_command(&mut self, command: PlatformCommand) {
        self.synthetic_commands.push_back(command);
    }

    fn notify(&mut self, severity: MessageSeverity, message: String) {
        self.enqueue_command(PlatformCommand::ShowNotification { severity, message });
    }

    fn ensure_header_buttons(&mut self) {
        if self.header_buttons_created {
            return;
        }
        self.enqueue_command(PlatformCommand::AddHeaderButton {
            action: HeaderAction::Import,
            text: ui_constants::IMPORT_BUTTON_TEXT.to_string(),
        });
        self.enqueue_command(PlatformCommand::AddHeaderButton {
            action: HeaderAction::Export,
            text: ui_constants::EXPORT_BUTTON_TEXT.to_string(),
        });
        self.header_buttons_created = true;
    }

    /*
     * Enumerates the page items and renders one checkbox per well-formed
     * item, reflecting the stored states. Runs on every page (re)load.
     */
    fn on_page_ready(&mut self) {
        self.ensure_header_buttons();

        let items = match self.item_source.load_items() {
            Ok(items) => items,
            Err(e) => {
                log::error!("AppLogic: Could not enumerate page items: {e}");
                self.notify(
                    MessageSeverity::Error,
                    format!("{}: {e}", ui_constants::ITEMS_LOAD_FAILED_PREFIX),
                );
                Vec::new()
            }
        };

        let outcome = core::synchronize(&self.scope, &items, self.toggle_store.as_ref());
        if !outcome.skipped.is_empty() {
            log::debug!(
                "AppLogic: {} of {} items have no checkbox.",
                outcome.skipped.len(),
                items.len()
            );
        }
        self.controls = outcome.controls;

        let toggles = self
            .controls
            .iter()
            .map(|control| ToggleDescriptor {
                control_id: control.id,
                element_id: control.element_id(),
                label: control.label.clone(),
                state: CheckState::from_checked(control.checked),
            })
            .collect();
        self.enqueue_command(PlatformCommand::RenderToggles { toggles });
    }

    fn on_toggle_changed(&mut self, control_id: ToggleControlId, new_state: CheckState) {
        let Some(control) = self.controls.iter_mut().find(|c| c.id == control_id) else {
            log::warn!("AppLogic: Toggle event for unknown control {control_id:?}.");
            return;
        };
        core::apply_toggle(
            &self.scope,
            control,
            new_state.is_checked(),
            self.toggle_store.as_ref(),
        );
    }

    fn on_export_requested(&mut self) {
        let document = core::export_document(&self.scope, &self.controls);
        log::info!(
            "AppLogic: Exporting {} checkbox states for scope {}.",
            document.len(),
            self.scope
        );
        let content = core::serialize_export_document(&document);
        self.enqueue_command(PlatformCommand::OfferDownload {
            filename: EXPORT_FILENAME.to_string(),
            mime_type: EXPORT_MIME_TYPE.to_string(),
            content,
        });
    }

    fn on_import_requested(&mut self) {
        self.enqueue_command(PlatformCommand::ShowOpenFileDialog {
            title: ui_constants::IMPORT_DIALOG_TITLE.to_string(),
            filter_spec: ui_constants::IMPORT_FILTER_SPEC.to_string(),
        });
    }

    fn on_file_open_dialog_completed(&mut self, result: Option<PathBuf>) {
        let Some(path) = result else {
            log::debug!("AppLogic: Import cancelled, no file chosen.");
            return;
        };
        log::debug!("AppLogic: Reading import file {path:?}.");
        self.pending_import = Some(path.clone());
        self.enqueue_command(PlatformCommand::ReadFileContents { path });
    }

    /*
     * Second half of the import flow. The document is validated in full
     * before anything is written; on success the page is reloaded so the
     * checkboxes show the imported states.
     */
    fn on_file_read_completed(&mut self, path: PathBuf, result: Result<Vec<u8>, String>) {
        if self.pending_import.as_ref() != Some(&path) {
            log::warn!("AppLogic: Ignoring read result for unexpected file {path:?}.");
            return;
        }
        self.pending_import = None;

        let bytes = match result {
            Ok(bytes) => bytes,
            Err(reason) => {
                log::error!("AppLogic: Reading {path:?} failed: {reason}");
                self.notify(
                    MessageSeverity::Error,
                    format!("{}: {reason}", ui_constants::FILE_READ_FAILED_PREFIX),
                );
                return;
            }
        };

        match core::import_document(&bytes, self.toggle_store.as_ref()) {
            Ok(count) => {
                log::info!("AppLogic: Imported {count} states from {path:?}, reloading.");
                self.notify(
                    MessageSeverity::Information,
                    format!("Imported {count} checkbox states."),
                );
                self.enqueue_command(PlatformCommand::ReloadPage);
            }
            Err(e) => {
                log::error!("AppLogic: Import of {path:?} rejected: {e}");
                self.notify(
                    MessageSeverity::Error,
                    format!("{}: {e}", ui_constants::IMPORT_FAILED_PREFIX),
                );
            }
        }
    }
}

impl PlatformEventHandler for ChecklistLogic {
    fn handle_event(&mut self, event: AppEvent) {
        log::trace!("AppLogic: Handling {event:?}");
        match event {
            AppEvent::PageReady => self.on_page_ready(),
            AppEvent::ToggleChangedByUser {
                control_id,
                new_state,
            } => self.on_toggle_changed(control_id, new_state),
            AppEvent::HeaderButtonClicked { action } => match action {
                HeaderAction::Import => self.on_import_requested(),
                HeaderAction::Export => self.on_export_requested(),
            },
            AppEvent::FileOpenDialogCompleted { result } => {
                self.on_file_open_dialog_completed(result)
            }
            AppEvent::FileReadCompleted { path, result } => {
                self.on_file_read_completed(path, result)
            }
        }
    }

    fn try_dequeue_command(&mut self) -> Option<PlatformCommand> {
        self.synthetic_commands.pop_front()
    }

    fn on_quit(&mut self) {
        log::debug!(
            "AppLogic: Session for scope {} ending with {} checkboxes.",
            self.scope,
            self.controls.len()
        );
    }
}

#[cfg(test)]
impl ChecklistLogic {
    pub(crate) fn test_drain_commands(&mut self) -> Vec<PlatformCommand> {
        self.synthetic_commands.drain(..).collect()
    }
}
