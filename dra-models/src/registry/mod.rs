//! Model registry.
//!
//! Maps logical model names to adapters. A registry is built once by
//! [`init_models`] and, for process-wide use, published through [`install`];
//! after that it is only read.

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::{debug, info};

use crate::adapters::{Adapter, Generate, Message, RoleMap};
use crate::env::{EnvSource, ProcessEnv};
use crate::providers::PROVIDERS;
use crate::{DeploymentMode, Error, Result};

static REGISTRY: OnceLock<ModelRegistry> = OnceLock::new();

/// A logical model name bound to its adapter and role map.
#[derive(Debug, Clone)]
pub struct ModelEntry {
    name: String,
    adapter: Adapter,
    role_map: RoleMap,
}

impl ModelEntry {
    /// Bind `adapter` under `name` with the default tool remap.
    pub fn new(name: impl Into<String>, adapter: Adapter) -> Self {
        Self {
            name: name.into(),
            adapter,
            role_map: RoleMap::default(),
        }
    }

    pub fn with_role_map(mut self, role_map: RoleMap) -> Self {
        self.role_map = role_map;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    pub fn role_map(&self) -> &RoleMap {
        &self.role_map
    }

    /// Run `conversation` through the adapter using this entry's role map.
    pub async fn generate(&self, conversation: &[Message]) -> Result<Message> {
        self.adapter.generate(conversation, &self.role_map).await
    }
}

#[derive(Debug, Default)]
pub struct ModelRegistry {
    entries: HashMap<String, ModelEntry>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `entry`, replacing any entry with the same name.
    ///
    /// Returns the replaced entry.
    pub fn register(&mut self, entry: ModelEntry) -> Option<ModelEntry> {
        let replaced = self.entries.insert(entry.name.clone(), entry);
        if let Some(old) = &replaced {
            debug!(model = %old.name, "replaced existing model binding");
        }
        replaced
    }

    pub fn get(&self, name: &str) -> Result<&ModelEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| Error::ModelNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelEntry> {
        self.entries.values()
    }
}

/// Build a registry by running every provider registrar in order.
///
/// Later registrations overwrite earlier ones with the same name.
pub fn init_models(mode: DeploymentMode, env: &impl EnvSource) -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    for descriptor in PROVIDERS {
        for entry in descriptor.register(mode, env) {
            registry.register(entry);
        }
    }
    info!(%mode, models = registry.len(), "model registry initialized");
    registry
}

/// Publish `registry` as the process-wide registry.
///
/// Succeeds once; later calls return [`Error::RegistryAlreadyInitialized`].
pub fn install(registry: ModelRegistry) -> Result<&'static ModelRegistry> {
    REGISTRY
        .set(registry)
        .map_err(|_| Error::RegistryAlreadyInitialized)?;
    global()
}

/// The process-wide registry.
pub fn global() -> Result<&'static ModelRegistry> {
    REGISTRY.get().ok_or(Error::RegistryUninitialized)
}

/// Build from the process environment and install.
pub fn init_global(mode: DeploymentMode) -> Result<&'static ModelRegistry> {
    install(init_models(mode, &ProcessEnv))
}
