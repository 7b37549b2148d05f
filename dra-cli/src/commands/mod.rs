pub mod ask;
pub mod config;
pub mod models;

use anyhow::Result;
use dra_models::env::ProcessEnv;
use dra_models::registry::{self, ModelRegistry};
use dra_models::{DeploymentMode, ModelSelection};
use tracing::info;

use crate::ModeArgs;
use crate::config::{ConfigLoader, DraConfig};

/// Loaded config plus the mode and registry derived from it.
pub struct Session {
    pub config: DraConfig,
    pub mode: DeploymentMode,
    pub registry: &'static ModelRegistry,
}

impl Session {
    /// Load config, pick the mode and install the process-wide registry.
    pub fn start(mode_args: &ModeArgs) -> Result<Self> {
        let config = ConfigLoader::load()?;
        let mode = mode_args.forced().unwrap_or_else(|| config.mode());
        info!(%mode, "building model registry");
        let registry = registry::init_global(mode)?;
        Ok(Self {
            config,
            mode,
            registry,
        })
    }

    /// Tool model selection: environment first, then config overrides.
    pub fn selection(&self) -> ModelSelection {
        self.config
            .models
            .apply(ModelSelection::from_env(&ProcessEnv))
    }
}
