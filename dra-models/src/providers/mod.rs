//! Provider registrars.
//!
//! Each provider family is a [`ProviderDescriptor`]: one [`Branch`] per
//! deployment mode describing which credential variables to resolve and which
//! logical names to bind. [`ProviderDescriptor::register`] is the single
//! routine that turns a descriptor into [`ModelEntry`] values; the table of
//! descriptors lives in [`PROVIDERS`], in registration order.

mod table;

use tracing::{debug, info, warn};

pub use table::PROVIDERS;

use crate::adapters::{
    Adapter, ChatAdapter, GenerateThenFetchAdapter, ReasonerAdapter, ResponseAdapter,
    TranscriptionAdapter, Transport,
};
use crate::auth::{CredentialPair, CredentialVars};
use crate::env::EnvSource;
use crate::registry::ModelEntry;
use crate::types::UNSET;
use crate::{DeploymentMode, ProviderFamily};

/// Adapter shape to build for one binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Chat,
    Reasoner,
    Transcription,
    Response,
    /// Two-stage generation; the binding's id is the predict id.
    GenerateThenFetch { fetch_id: &'static str },
}

/// How a provider behaves in one deployment mode.
#[derive(Debug, Clone, Copy)]
pub enum Branch {
    /// Nothing to register; logged at info level.
    Skip(&'static str),
    /// Mode not supported; logged at warning level.
    Unsupported(&'static str),
    /// Self-hosted OpenAI-compatible endpoint with per-model id overrides.
    Proxy(ProxyPlan),
    /// Fixed table of published model ids.
    Published(PublishedPlan),
}

/// Environment variables for the tiered default model ids.
///
/// `reasoner` defaults to the chat id and `responses` to the reasoner id.
#[derive(Debug, Clone, Copy)]
pub struct DefaultTiers {
    pub chat_var: &'static str,
    pub chat_default: &'static str,
    pub reasoner_var: Option<&'static str>,
    pub responses_var: Option<&'static str>,
}

/// Default ids after environment lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTiers {
    pub chat: String,
    pub reasoner: String,
    pub responses: String,
}

impl DefaultTiers {
    pub fn resolve(&self, env: &impl EnvSource) -> ResolvedTiers {
        let chat = env.var_or(self.chat_var, self.chat_default);
        let reasoner = match self.reasoner_var {
            Some(var) => env.var_or(var, &chat),
            None => chat.clone(),
        };
        let responses = match self.responses_var {
            Some(var) => env.var_or(var, &reasoner),
            None => reasoner.clone(),
        };
        ResolvedTiers {
            chat,
            reasoner,
            responses,
        }
    }
}

/// What a per-model override falls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdFallback {
    Chat,
    Reasoner,
    Responses,
    Literal(&'static str),
}

/// Logical name of a proxy binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelName {
    Fixed(&'static str),
    /// Taken from `var`, or `default` when absent.
    Env {
        var: &'static str,
        default: &'static str,
    },
}

impl ModelName {
    fn resolve(&self, env: &impl EnvSource) -> String {
        match *self {
            ModelName::Fixed(name) => name.to_string(),
            ModelName::Env { var, default } => env.var_or(var, default),
        }
    }
}

/// One binding under a proxy branch.
#[derive(Debug, Clone, Copy)]
pub struct ProxyModel {
    pub name: ModelName,
    pub shape: Shape,
    /// Per-model id override variable.
    pub id_var: &'static str,
    pub fallback: IdFallback,
}

/// Optional secondary vision binding.
///
/// Built only when `name_var` is non-empty. Its credentials fall back to the
/// primary pair of the enclosing plan.
#[derive(Debug, Clone, Copy)]
pub struct VisionPlan {
    pub name_var: &'static str,
    /// Defaults to the vision model name.
    pub id_var: &'static str,
    pub credentials: CredentialVars,
}

#[derive(Debug, Clone, Copy)]
pub struct ProxyPlan {
    pub credentials: CredentialVars,
    pub tiers: Option<DefaultTiers>,
    pub models: &'static [ProxyModel],
    pub vision: Option<VisionPlan>,
}

/// One binding under a published branch.
#[derive(Debug, Clone, Copy)]
pub struct PublishedModel {
    pub name: &'static str,
    pub id: &'static str,
    pub shape: Shape,
}

#[derive(Debug, Clone, Copy)]
pub struct PublishedPlan {
    pub credentials: CredentialVars,
    pub models: &'static [PublishedModel],
}

/// A provider family and its behavior in each deployment mode.
#[derive(Debug, Clone, Copy)]
pub struct ProviderDescriptor {
    pub family: ProviderFamily,
    pub local_proxy: Branch,
    pub remote: Branch,
}

impl ProviderDescriptor {
    pub fn branch(&self, mode: DeploymentMode) -> &Branch {
        match mode {
            DeploymentMode::LocalProxy => &self.local_proxy,
            DeploymentMode::Remote => &self.remote,
        }
    }

    /// Build this provider's bindings for `mode`.
    ///
    /// Never fails: missing configuration yields adapters holding unset
    /// credentials, and skipped modes yield no entries.
    pub fn register(&self, mode: DeploymentMode, env: &impl EnvSource) -> Vec<ModelEntry> {
        let family = self.family;
        let entries = match self.branch(mode) {
            Branch::Skip(reason) => {
                info!(provider = %family, %mode, "{reason}");
                Vec::new()
            }
            Branch::Unsupported(reason) => {
                warn!(provider = %family, %mode, "{reason}");
                Vec::new()
            }
            Branch::Proxy(plan) => {
                info!(provider = %family, %mode, "using locally hosted models");
                register_proxy(family, plan, env)
            }
            Branch::Published(plan) => {
                info!(provider = %family, %mode, "using published models");
                register_published(family, plan, env)
            }
        };

        for entry in &entries {
            debug!(
                provider = %family,
                model = %entry.name(),
                kind = %entry.adapter().kind(),
                "built model binding"
            );
        }
        entries
    }
}

fn build_adapter(
    family: ProviderFamily,
    shape: Shape,
    id: String,
    credentials: CredentialPair,
    transport: Transport,
) -> Adapter {
    match shape {
        Shape::Chat => ChatAdapter::new(family, id, credentials, transport).into(),
        Shape::Reasoner => ReasonerAdapter::new(family, id, credentials, transport).into(),
        Shape::Transcription => TranscriptionAdapter::new(family, id, credentials, transport).into(),
        Shape::Response => ResponseAdapter::new(family, id, credentials, transport).into(),
        Shape::GenerateThenFetch { fetch_id } => {
            GenerateThenFetchAdapter::new(family, id, fetch_id, credentials, transport).into()
        }
    }
}

fn register_proxy(
    family: ProviderFamily,
    plan: &ProxyPlan,
    env: &impl EnvSource,
) -> Vec<ModelEntry> {
    let credentials = plan.credentials.resolve(env);
    let tiers = plan.tiers.map(|t| t.resolve(env));
    let transport = Transport::new();

    let mut entries: Vec<ModelEntry> = plan
        .models
        .iter()
        .map(|model| {
            let fallback = match model.fallback {
                IdFallback::Literal(id) => id,
                IdFallback::Chat => tiers.as_ref().map_or(UNSET, |t| t.chat.as_str()),
                IdFallback::Reasoner => tiers.as_ref().map_or(UNSET, |t| t.reasoner.as_str()),
                IdFallback::Responses => tiers.as_ref().map_or(UNSET, |t| t.responses.as_str()),
            };
            let id = env.var_or(model.id_var, fallback);
            let adapter = build_adapter(
                family,
                model.shape,
                id,
                credentials.clone(),
                transport.clone(),
            );
            ModelEntry::new(model.name.resolve(env), adapter)
        })
        .collect();

    if let Some(vision) = &plan.vision {
        entries.extend(register_vision(family, vision, &credentials, env));
    }
    entries
}

fn register_vision(
    family: ProviderFamily,
    vision: &VisionPlan,
    primary: &CredentialPair,
    env: &impl EnvSource,
) -> Option<ModelEntry> {
    let name = env.var(vision.name_var).filter(|n| !n.is_empty())?;
    let id = env.var_or(vision.id_var, &name);
    let credentials = vision.credentials.resolve_with_defaults(
        env,
        Some(primary.key_str()),
        Some(primary.base_str()),
    );
    info!(provider = %family, model = %name, "registering vision model");
    let adapter = ChatAdapter::new(family, id, credentials, Transport::new());
    Some(ModelEntry::new(name, adapter.into()))
}

fn register_published(
    family: ProviderFamily,
    plan: &PublishedPlan,
    env: &impl EnvSource,
) -> Vec<ModelEntry> {
    let credentials = plan.credentials.resolve(env);
    let transport = Transport::new();

    plan.models
        .iter()
        .map(|model| {
            let adapter = build_adapter(
                family,
                model.shape,
                model.id.to_string(),
                credentials.clone(),
                transport.clone(),
            );
            ModelEntry::new(model.name, adapter)
        })
        .collect()
}
