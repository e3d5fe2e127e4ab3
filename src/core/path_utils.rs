/*
 * Locates the per-user directory where the checklist keeps its toggle store
 * and remembered settings.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/*
 * Returns the platform's local (non-roaming) config directory for `app_name`,
 * creating it on first use. `None` if the platform has no such directory or
 * it could not be created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", app_name)?;
    let config_path = proj_dirs.config_local_dir();
    if config_path.is_dir() {
        log::trace!("PathUtils: Using existing config directory {config_path:?}");
        return Some(config_path.to_path_buf());
    }
    match fs::create_dir_all(config_path) {
        Ok(()) => {
            log::debug!("PathUtils: Created config directory {config_path:?}");
            Some(config_path.to_path_buf())
        }
        Err(e) => {
            log::error!("PathUtils: Failed to create config directory {config_path:?}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remove_test_dir(app_name: &str) {
        if let Some(proj_dirs) = ProjectDirs::from("", "", app_name) {
            let dir = proj_dirs.config_local_dir();
            if dir.exists() {
                if let Err(e) = fs::remove_dir_all(dir) {
                    eprintln!("Test cleanup failed for {dir:?}: {e}");
                }
            }
        }
    }

    #[test]
    fn test_config_dir_is_created_and_reused() {
        let app_name = format!("TestApp_Checklist_{}", rand::random::<u128>());

        let first = get_base_app_config_local_dir(&app_name).expect("config dir");
        assert!(first.is_dir());
        assert!(
            first
                .to_string_lossy()
                .to_lowercase()
                .contains(&app_name.to_lowercase())
        );

        let second = get_base_app_config_local_dir(&app_name).expect("config dir");
        assert_eq!(first, second);

        remove_test_dir(&app_name);
    }
}
