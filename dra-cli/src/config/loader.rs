use super::types::{DraConfig, ModelsConfigSection, RawDraConfig};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<DraConfig> {
        Self::load_layers(&Self::user_config_path(), &Self::project_config_path())
    }

    /// Load and merge the two layers; missing files are skipped
    pub fn load_layers(user_path: &Path, project_path: &Path) -> Result<DraConfig> {
        let mut raw = RawDraConfig::default();

        // Layer 1: User config
        if let Some(user_config) = Self::read_raw(user_path)? {
            raw = Self::merge_raw(raw, user_config);
        }

        // Layer 2: Project config
        if let Some(project_config) = Self::read_raw(project_path)? {
            raw = Self::merge_raw(raw, project_config);
        }

        Ok(Self::finalize(raw))
    }

    /// Get user config path
    pub fn user_config_path() -> PathBuf {
        dra_paths::user_config_file()
    }

    /// Get project config path
    /// Can be overridden with DRA_PROJECT_CONFIG_DIR env var (useful for isolated tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("DRA_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            dra_paths::project_config_file(Path::new("."))
        }
    }

    fn read_raw(path: &Path) -> Result<Option<RawDraConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let raw = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Some(raw))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawDraConfig, overlay: RawDraConfig) -> RawDraConfig {
        RawDraConfig {
            use_local_proxy: overlay.use_local_proxy.or(base.use_local_proxy),
            models: ModelsConfigSection::merge(base.models, overlay.models),
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawDraConfig) -> DraConfig {
        DraConfig {
            use_local_proxy: raw.use_local_proxy.unwrap_or(false),
            models: raw.models,
        }
    }
}
