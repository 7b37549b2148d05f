//! Core types shared by the resolver, adapters and registry.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Reserved value meaning "no configuration provided".
///
/// Never produced by legitimate configuration. An environment variable holding
/// exactly this string reads as [`Setting::Unset`].
pub const UNSET: &str = "PLACEHOLDER";

/// Where model traffic is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentMode {
    /// Everything goes to a self-hosted OpenAI-compatible endpoint.
    LocalProxy,
    /// Each provider's public API.
    Remote,
}

impl DeploymentMode {
    /// Map the `use_local_proxy` flag onto a mode.
    pub fn from_flag(use_local_proxy: bool) -> Self {
        if use_local_proxy {
            Self::LocalProxy
        } else {
            Self::Remote
        }
    }

    pub fn is_local_proxy(self) -> bool {
        matches!(self, Self::LocalProxy)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LocalProxy => "local-proxy",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider families, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFamily {
    OpenAi,
    Anthropic,
    Google,
    Qwen,
    LangChain,
    Vllm,
    DeepSeek,
}

impl ProviderFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::Qwen => "qwen",
            Self::LangChain => "langchain",
            Self::Vllm => "vllm",
            Self::DeepSeek => "deepseek",
        }
    }
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved configuration value, or the unset sentinel.
///
/// An empty string is a real value: `Setting::Value(String::new())` is not
/// `Setting::Unset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting<T = String> {
    Value(T),
    Unset,
}

impl<T> Default for Setting<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> Setting<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unset => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Setting<U> {
        match self {
            Self::Value(v) => Setting::Value(f(v)),
            Self::Unset => Setting::Unset,
        }
    }

    /// Borrow the value, or fail with [`Error::Unconfigured`] for `model`.
    pub fn require(&self, model: &str, field: &'static str) -> Result<&T> {
        self.value().ok_or_else(|| Error::Unconfigured {
            model: model.to_string(),
            field,
        })
    }
}

impl Setting<String> {
    /// Interpret a raw environment lookup.
    pub fn from_env_value(raw: Option<String>) -> Self {
        match raw {
            Some(v) if v != UNSET => Self::Value(v),
            _ => Self::Unset,
        }
    }

    /// The value, or the literal sentinel when unset.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Value(v) => v,
            Self::Unset => UNSET,
        }
    }
}

impl From<&str> for Setting<String> {
    fn from(s: &str) -> Self {
        Self::Value(s.to_string())
    }
}

impl From<String> for Setting<String> {
    fn from(s: String) -> Self {
        Self::Value(s)
    }
}

impl fmt::Display for Setting<String> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_from_flag() {
        assert_eq!(DeploymentMode::from_flag(true), DeploymentMode::LocalProxy);
        assert_eq!(DeploymentMode::from_flag(false), DeploymentMode::Remote);
        assert!(DeploymentMode::LocalProxy.is_local_proxy());
    }

    #[test]
    fn mode_serializes_kebab_case() {
        let json = serde_json::to_string(&DeploymentMode::LocalProxy).unwrap();
        assert_eq!(json, "\"local-proxy\"");
        let mode: DeploymentMode = serde_json::from_str("\"remote\"").unwrap();
        assert_eq!(mode, DeploymentMode::Remote);
    }

    #[test]
    fn provider_family_display() {
        assert_eq!(ProviderFamily::OpenAi.to_string(), "openai");
        assert_eq!(ProviderFamily::Vllm.to_string(), "vllm");
    }

    #[test]
    fn sentinel_env_value_reads_as_unset() {
        assert!(Setting::from_env_value(None).is_unset());
        assert!(Setting::from_env_value(Some(UNSET.to_string())).is_unset());
    }

    #[test]
    fn empty_string_is_a_value() {
        let setting = Setting::from_env_value(Some(String::new()));
        assert_eq!(setting, Setting::Value(String::new()));
        assert_eq!(setting.as_str(), "");
    }

    #[test]
    fn unset_displays_sentinel() {
        assert_eq!(Setting::<String>::Unset.to_string(), "PLACEHOLDER");
    }

    #[test]
    fn require_reports_model_and_field() {
        let err = Setting::<String>::Unset.require("o3", "API base").unwrap_err();
        assert!(matches!(err, Error::Unconfigured { field: "API base", .. }));
        assert_eq!(Setting::from("x").require("o3", "API base").unwrap(), "x");
    }
}
