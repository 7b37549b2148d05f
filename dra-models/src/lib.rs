//! Model registry for dra.
//!
//! This crate provides:
//! - Tiered credential resolution from environment variables
//! - A static provider table with one registrar routine
//! - Model adapters behind a uniform `generate` capability
//! - A process-wide registry keyed by logical model name
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   ModelRegistry                      │
//! │        name ──► ModelEntry { Adapter, RoleMap }      │
//! └─────────────────────────────────────────────────────┘
//!                          ▲
//!                          │ init_models(mode, env)
//! ┌─────────────────────────────────────────────────────┐
//! │                     PROVIDERS                        │
//! │  OpenAI · Anthropic · Google · Qwen · LangChain ·    │
//! │  vLLM · DeepSeek                                     │
//! └─────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────┐
//! │            resolve_key / resolve_base                │
//! │     (local var ─► default ─► remote var ─► unset)    │
//! └─────────────────────────────────────────────────────┘
//! ```

mod error;
mod types;

pub mod adapters;
pub mod auth;
pub mod env;
pub mod providers;
pub mod registry;
pub mod selection;

pub use error::{Error, Result};
pub use registry::{ModelEntry, ModelRegistry, init_models};
pub use selection::ModelSelection;
pub use types::{DeploymentMode, ProviderFamily, Setting, UNSET};
