//! XDG Base Directory paths for dra.
//!
//! CLI tools should use XDG paths for cross-platform consistency,
//! not platform-native paths. This matches tools like gh, docker, kubectl.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "dra";
const CONFIG_FILE: &str = "config.toml";

/// Project-local config directory name.
pub const PROJECT_DIR: &str = ".dra";

/// Get the dra config directory.
///
/// Returns `$XDG_CONFIG_HOME/dra` if set, otherwise `~/.config/dra`.
///
/// # Examples
///
/// ```
/// use dra_paths::config_dir;
///
/// let config = config_dir();
/// let file = config.join("config.toml");
/// ```
pub fn config_dir() -> PathBuf {
    resolve_config_dir(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// Path of the user config file, `config_dir()/config.toml`.
pub fn user_config_file() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Path of the project config file under `project_root`.
pub fn project_config_file(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR).join(CONFIG_FILE)
}

fn resolve_config_dir(xdg_config: Option<String>, home: Option<PathBuf>) -> PathBuf {
    match (xdg_config, home) {
        (Some(xdg), _) => PathBuf::from(xdg).join(APP_DIR),
        (None, Some(home)) => home.join(".config").join(APP_DIR),
        (None, None) => PathBuf::from(".config").join(APP_DIR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_ends_with_dra() {
        let path = config_dir();
        assert!(path.ends_with("dra"), "config_dir should end with 'dra'");
    }

    #[test]
    fn test_xdg_config_home_wins() {
        let path = resolve_config_dir(
            Some("/tmp/test-config".to_string()),
            Some(PathBuf::from("/home/someone")),
        );
        assert_eq!(path, PathBuf::from("/tmp/test-config/dra"));
    }

    #[test]
    fn test_home_fallback() {
        let path = resolve_config_dir(None, Some(PathBuf::from("/home/someone")));
        assert_eq!(path, PathBuf::from("/home/someone/.config/dra"));
    }

    #[test]
    fn test_relative_fallback_without_home() {
        assert_eq!(resolve_config_dir(None, None), PathBuf::from(".config/dra"));
    }

    #[test]
    fn test_project_config_file() {
        let path = project_config_file(Path::new("/work/repo"));
        assert_eq!(path, PathBuf::from("/work/repo/.dra/config.toml"));
    }
}
