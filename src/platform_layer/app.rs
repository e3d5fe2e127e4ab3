/*
 * Terminal implementation of the platform layer. It plays the role the page
 * and the browser play for the checklist: it raises `AppEvent`s (page ready,
 * checkbox clicks, header button clicks, file picker and file read results)
 * and executes the `PlatformCommand`s the logic queues in response.
 *
 * User interaction is scripted: the run loop replays a list of `UserAction`s
 * after the initial page load. The import file picker "chooses" the file
 * configured up front, or nothing if none was configured. Downloads are
 * written into the downloads directory.
 */
use std::collections::VecDeque;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::error::{PlatformError, Result as PlatformResult};
use super::types::{
    AppEvent, CheckState, HeaderAction, MessageSeverity, PlatformCommand, PlatformEventHandler,
    ToggleDescriptor,
};

// A scripted user interaction, replayed after the page has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    // Clicks the checkbox at a 1-based position in the rendered list.
    ClickToggle { position: usize },
    ClickHeaderButton(HeaderAction),
}

pub struct PlatformInterface<W: Write> {
    downloads_dir: PathBuf,
    import_file: Option<PathBuf>,
    out: W,
    header_buttons: Vec<(HeaderAction, String)>,
    toggles: Vec<ToggleDescriptor>,
    pending_events: VecDeque<AppEvent>,
    saved_downloads: Vec<PathBuf>,
    highest_severity: Option<MessageSeverity>,
}

impl<W: Write> PlatformInterface<W> {
    pub fn new(
        downloads_dir: &Path,
        import_file: Option<PathBuf>,
        out: W,
    ) -> PlatformResult<Self> {
        if !downloads_dir.is_dir() {
            return Err(PlatformError::InitializationFailed(format!(
                "Downloads directory {downloads_dir:?} does not exist"
            )));
        }
        Ok(PlatformInterface {
            downloads_dir: downloads_dir.to_path_buf(),
            import_file,
            out,
            header_buttons: Vec::new(),
            toggles: Vec::new(),
            pending_events: VecDeque::new(),
            saved_downloads: Vec::new(),
            highest_severity: None,
        })
    }

    #[cfg(test)]
    pub fn saved_downloads(&self) -> &[PathBuf] {
        &self.saved_downloads
    }

    // Most severe notification shown during the run, if any.
    pub fn highest_severity(&self) -> Option<MessageSeverity> {
        self.highest_severity
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /*
     * Loads the page, replays `actions` one by one (draining every event and
     * command each action causes), then prints the final page.
     */
    pub fn run(
        &mut self,
        event_handler: Arc<Mutex<dyn PlatformEventHandler>>,
        actions: &[UserAction],
    ) -> PlatformResult<()> {
        self.pending_events.push_back(AppEvent::PageReady);
        self.dispatch_pending_events(&event_handler)?;

        for action in actions {
            log::debug!("Platform: Replaying {action:?}");
            if let Some(event) = self.event_for_action(*action)? {
                self.pending_events.push_back(event);
                self.dispatch_pending_events(&event_handler)?;
            }
        }

        if let Ok(mut handler_guard) = event_handler.lock() {
            handler_guard.on_quit();
        }
        self.print_page()
    }

    fn event_for_action(&mut self, action: UserAction) -> PlatformResult<Option<AppEvent>> {
        match action {
            UserAction::ClickToggle { position } => {
                let Some(toggle) = position
                    .checked_sub(1)
                    .and_then(|index| self.toggles.get_mut(index))
                else {
                    log::warn!("Platform: No checkbox at position {position}.");
                    writeln!(self.out, "No checkbox at position {position}.")?;
                    return Ok(None);
                };
                toggle.state = CheckState::from_checked(!toggle.state.is_checked());
                Ok(Some(AppEvent::ToggleChangedByUser {
                    control_id: toggle.control_id,
                    new_state: toggle.state,
                }))
            }
            UserAction::ClickHeaderButton(action) => {
                if !self.header_buttons.iter().any(|(a, _)| *a == action) {
                    log::warn!("Platform: Header button {action:?} is not on the page.");
                    return Ok(None);
                }
                Ok(Some(AppEvent::HeaderButtonClicked { action }))
            }
        }
    }

    fn dispatch_pending_events(
        &mut self,
        event_handler: &Arc<Mutex<dyn PlatformEventHandler>>,
    ) -> PlatformResult<()> {
        while let Some(event) = self.pending_events.pop_front() {
            let commands = {
                let mut handler_guard = event_handler.lock().map_err(|_e| {
                    PlatformError::OperationFailed("Event handler mutex was poisoned".to_string())
                })?;
                handler_guard.handle_event(event);
                let mut commands = Vec::new();
                while let Some(command) = handler_guard.try_dequeue_command() {
                    commands.push(command);
                }
                commands
            };
            for command in commands {
                self.execute_command(command)?;
            }
        }
        Ok(())
    }

    pub fn execute_command(&mut self, command: PlatformCommand) -> PlatformResult<()> {
        log::trace!("Platform: Executing {command:?}");
        match command {
            PlatformCommand::AddHeaderButton { action, text } => {
                self.header_buttons.push((action, text));
            }
            PlatformCommand::RenderToggles { toggles } => {
                self.toggles = toggles;
            }
            PlatformCommand::ShowOpenFileDialog { title, filter_spec } => {
                let result = self.import_file.take();
                log::debug!("Platform: '{title}' ({filter_spec}) -> {result:?}");
                self.pending_events
                    .push_back(AppEvent::FileOpenDialogCompleted { result });
            }
            PlatformCommand::ReadFileContents { path } => {
                let result = fs::read(&path).map_err(|e| e.to_string());
                self.pending_events
                    .push_back(AppEvent::FileReadCompleted { path, result });
            }
            PlatformCommand::OfferDownload {
                filename,
                mime_type,
                content,
            } => self.save_download(&filename, &mime_type, &content)?,
            PlatformCommand::ShowNotification { severity, message } => {
                self.highest_severity = self.highest_severity.max(Some(severity));
                let label = match severity {
                    MessageSeverity::Information => "info",
                    MessageSeverity::Error => "error",
                };
                writeln!(self.out, "[{label}] {message}")?;
            }
            PlatformCommand::ReloadPage => {
                self.pending_events.push_back(AppEvent::PageReady);
            }
        }
        Ok(())
    }

    fn save_download(
        &mut self,
        filename: &str,
        mime_type: &str,
        content: &str,
    ) -> PlatformResult<()> {
        let target = self.downloads_dir.join(filename);
        match fs::write(&target, content) {
            Ok(()) => {
                log::info!("Platform: Saved download {target:?} ({mime_type}).");
                writeln!(self.out, "Saved {filename} to {}", target.display())?;
                self.saved_downloads.push(target);
            }
            Err(e) => {
                log::error!("Platform: Could not save download {target:?}: {e}");
                self.highest_severity = Some(MessageSeverity::Error);
                writeln!(self.out, "[error] Could not save {filename}: {e}")?;
            }
        }
        Ok(())
    }

    fn print_page(&mut self) -> PlatformResult<()> {
        let buttons: Vec<String> = self
            .header_buttons
            .iter()
            .map(|(_, text)| format!("[{text}]"))
            .collect();
        writeln!(self.out, "{}", buttons.join(" "))?;
        for (index, toggle) in self.toggles.iter().enumerate() {
            let mark = if toggle.state.is_checked() { 'x' } else { ' ' };
            writeln!(
                self.out,
                "[{mark}] {:>3}. {}  ({})",
                index + 1,
                toggle.label,
                toggle.element_id
            )?;
        }
        Ok(())
    }
}
