// src/main.rs

mod app_logic;
mod core;
mod platform_layer;

use crate::app_logic::ChecklistLogic;
use crate::core::{
    ConfigManagerOperations, CoreConfigManager, CoreItemSource, CoreToggleStore,
    ItemSourceOperations, Scope, ScopeError, ToggleStoreOperations, resolve_scope, split_key,
};
use crate::platform_layer::{HeaderAction, MessageSeverity, PlatformInterface, UserAction};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, SimpleLogger, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex, Once};

pub(crate) const APP_NAME: &str = "ModuleChecklist";

static LOGGING_INIT: Once = Once::new();

// Installs the global logger once; later calls are ignored.
pub(crate) fn initialize_logging(level: LevelFilter) {
    LOGGING_INIT.call_once(|| {
        let term_result = TermLogger::init(
            level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        );
        if term_result.is_err() {
            let _ = SimpleLogger::init(level, Config::default());
        }
    });
}

#[derive(Parser, Debug)]
#[command(
    name = "module-checklist",
    version,
    about = "Per-course checkboxes for module items, with JSON export and import"
)]
struct Cli {
    /// Address of the modules page, e.g. https://host/courses/12345/modules
    #[arg(long, env = "CHECKLIST_PAGE")]
    page: Option<String>,

    /// JSON snapshot of the page items
    #[arg(long, default_value = "page.json")]
    items: PathBuf,

    /// Toggle store file (defaults to the user's local config directory)
    #[arg(long, env = "CHECKLIST_STORE")]
    store: Option<PathBuf>,

    /// Directory that receives exported files
    #[arg(long, default_value = ".")]
    downloads: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the page with its checkboxes
    Show,
    /// Click the checkboxes at the given 1-based positions
    Toggle {
        #[arg(required = true)]
        positions: Vec<usize>,
    },
    /// Export the visible checkbox states to checkbox_states.json
    Export,
    /// Import checkbox states from a file; without FILE the import is cancelled
    Import { file: Option<PathBuf> },
    /// List stored records of this course
    Keys,
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/*
 * Picks the page address: the command line first, then the address recorded
 * in the page snapshot, then the address remembered from the previous run.
 * Having none at all is fatal.
 */
fn resolve_page_scope(
    cli_page: Option<&str>,
    items_path: &Path,
    config_manager: &dyn ConfigManagerOperations,
) -> Result<Scope, ScopeError> {
    let snapshot_address = match core::item_source::read_page_snapshot(items_path) {
        Ok(snapshot) => snapshot.address().map(str::to_string),
        Err(e) => {
            log::debug!("Main: No address from page snapshot {items_path:?}: {e}");
            None
        }
    };
    let remembered_address = || match config_manager.load_last_page_address() {
        Ok(address) => address,
        Err(e) => {
            log::warn!("Main: Could not load remembered page address: {e}");
            None
        }
    };

    let address = cli_page
        .map(str::to_string)
        .or(snapshot_address)
        .or_else(remembered_address)
        .ok_or(ScopeError::NoAddress)?;
    let scope = resolve_scope(&address)?;

    if let Err(e) = config_manager.save_last_page_address(&address) {
        log::warn!("Main: Could not remember page address: {e}");
    }
    Ok(scope)
}

fn print_scope_keys(scope: &Scope, store: &dyn ToggleStoreOperations) {
    let mut foreign = 0usize;
    for (key, checked) in store.snapshot() {
        match split_key(&key) {
            Some((key_scope, fingerprint)) if key_scope == *scope => {
                println!("{key}\t{fingerprint}\t{checked}");
            }
            _ => foreign += 1,
        }
    }
    if foreign > 0 {
        println!("({foreign} records belong to other courses or are not checklist keys)");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_logging(log_level(cli.verbose));
    log::debug!("Main: Parsed arguments {cli:?}");

    let config_manager = CoreConfigManager::new(APP_NAME);
    let scope = match resolve_page_scope(cli.page.as_deref(), &cli.items, &config_manager) {
        Ok(scope) => scope,
        Err(e) => {
            log::error!("Main: {e}");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let store_result = match &cli.store {
        Some(path) => CoreToggleStore::open(path),
        None => CoreToggleStore::open_default(APP_NAME),
    };
    let toggle_store = match store_result {
        Ok(store) => {
            log::info!("Main: Using toggle store {:?}", store.file_path());
            Arc::new(store)
        }
        Err(e) => {
            log::error!("Main: Could not open toggle store: {e}");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let (actions, import_file) = match cli.command {
        Command::Keys => {
            print_scope_keys(&scope, toggle_store.as_ref());
            return ExitCode::SUCCESS;
        }
        Command::Show => (Vec::new(), None),
        Command::Toggle { positions } => (
            positions
                .into_iter()
                .map(|position| UserAction::ClickToggle { position })
                .collect(),
            None,
        ),
        Command::Export => (
            vec![UserAction::ClickHeaderButton(HeaderAction::Export)],
            None,
        ),
        Command::Import { file } => (
            vec![UserAction::ClickHeaderButton(HeaderAction::Import)],
            file,
        ),
    };

    let logic = ChecklistLogic::new(
        scope,
        toggle_store as Arc<dyn ToggleStoreOperations>,
        Arc::new(CoreItemSource::new(cli.items.clone())) as Arc<dyn ItemSourceOperations>,
    );
    log::info!("Main: Checklist ready for scope {}", logic.scope());

    let mut platform = match PlatformInterface::new(&cli.downloads, import_file, std::io::stdout())
    {
        Ok(platform) => platform,
        Err(e) => {
            log::error!("Main: {e}");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = platform.run(Arc::new(Mutex::new(logic)), &actions) {
        log::error!("Main: Platform run failed: {e}");
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match platform.highest_severity() {
        Some(MessageSeverity::Error) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigError;
    use std::fs;
    use tempfile::tempdir;

    struct MockConfigManager {
        remembered: Mutex<Option<String>>,
    }

    impl ConfigManagerOperations for MockConfigManager {
        fn load_last_page_address(&self) -> Result<Option<String>, ConfigError> {
            Ok(self.remembered.lock().unwrap().clone())
        }
        fn save_last_page_address(&self, address: &str) -> Result<(), ConfigError> {
            *self.remembered.lock().unwrap() = Some(address.to_string());
            Ok(())
        }
    }

    fn mock_config(remembered: Option<&str>) -> MockConfigManager {
        MockConfigManager {
            remembered: Mutex::new(remembered.map(str::to_string)),
        }
    }

    #[test]
    fn test_cli_page_wins_and_is_remembered() {
        let dir = tempdir().unwrap();
        let config = mock_config(Some("https://host/courses/1"));
        let scope = resolve_page_scope(
            Some("https://host/courses/2/modules"),
            &dir.path().join("absent.json"),
            &config,
        )
        .unwrap();
        assert_eq!(scope.as_str(), "2");
        assert_eq!(
            config.load_last_page_address().unwrap().as_deref(),
            Some("https://host/courses/2/modules")
        );
    }

    #[test]
    fn test_snapshot_address_before_remembered_address() {
        let dir = tempdir().unwrap();
        let items = dir.path().join("page.json");
        fs::write(
            &items,
            r#"{"address": "https://host/courses/3/modules", "items": []}"#,
        )
        .unwrap();
        let scope = resolve_page_scope(None, &items, &mock_config(Some("https://host/courses/1")))
            .unwrap();
        assert_eq!(scope.as_str(), "3");
    }

    #[test]
    fn test_remembered_address_is_last_resort() {
        let dir = tempdir().unwrap();
        let scope = resolve_page_scope(
            None,
            &dir.path().join("absent.json"),
            &mock_config(Some("https://host/courses/1")),
        )
        .unwrap();
        assert_eq!(scope.as_str(), "1");
    }

    #[test]
    fn test_no_address_is_fatal() {
        let dir = tempdir().unwrap();
        let result = resolve_page_scope(None, &dir.path().join("absent.json"), &mock_config(None));
        assert_eq!(result.unwrap_err(), ScopeError::NoAddress);
    }

    #[test]
    fn test_address_without_course_is_fatal_and_not_remembered() {
        let dir = tempdir().unwrap();
        let config = mock_config(None);
        let result = resolve_page_scope(
            Some("https://host/dashboard"),
            &dir.path().join("absent.json"),
            &config,
        );
        assert!(matches!(result, Err(ScopeError::NotFound(_))));
        assert_eq!(config.load_last_page_address().unwrap(), None);
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(log_level(0), LevelFilter::Warn);
        assert_eq!(log_level(2), LevelFilter::Debug);
        assert_eq!(log_level(9), LevelFilter::Trace);
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["module-checklist", "toggle", "1", "3"]).unwrap();
        assert!(matches!(cli.command, Command::Toggle { ref positions } if positions == &[1, 3]));

        let cli = Cli::try_parse_from(["module-checklist", "import"]).unwrap();
        assert!(matches!(cli.command, Command::Import { file: None }));

        assert!(Cli::try_parse_from(["module-checklist", "toggle"]).is_err());
    }
}
