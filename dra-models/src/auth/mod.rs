//! Credential resolution for API keys and API base URLs.
//!
//! Every provider context resolves one key and one base from a pair of
//! environment variables: a local-proxy name checked first and a remote name
//! used as fallback. Resolution never fails; absence degrades to a supplied
//! default or to [`Setting::Unset`], with a warning naming the variables.
//!
//! # Example
//!
//! ```
//! use dra_models::auth::resolve_base;
//! use dra_models::env::EnvSnapshot;
//! use dra_models::Setting;
//!
//! let env = EnvSnapshot::new().with("OPENAI_API_BASE", "https://api.example.com/v1");
//! let base = resolve_base(&env, "LOCAL_OPENAI_API_BASE", "OPENAI_API_BASE", None);
//! assert_eq!(base, Setting::from("https://api.example.com/v1"));
//! ```

use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use crate::env::EnvSource;
use crate::types::{Setting, UNSET};

/// A secure API key that prevents accidental logging.
///
/// The key is wrapped in `SecretString` which:
/// - Implements `Debug` as `"[REDACTED]"`
/// - Zeroizes memory on drop
/// - Requires explicit `.expose_secret()` to access the value
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Create a new API key from a string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// Expose the secret key value.
    ///
    /// Use sparingly - only when actually sending to an API.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey([REDACTED])")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Resolve an API key.
///
/// 1. `local_name` if it is set to anything other than the sentinel.
/// 2. `default`, when supplied.
/// 3. `remote_name`, which may itself be unset.
pub fn resolve_key(
    env: &impl EnvSource,
    local_name: &str,
    remote_name: &str,
    default: Option<&str>,
) -> Setting {
    if let Setting::Value(key) = Setting::from_env_value(env.var(local_name)) {
        return Setting::Value(key);
    }

    if let Some(default) = default {
        warn!(
            local = local_name,
            "local API key is not set, falling back to default value"
        );
        return Setting::from_env_value(Some(default.to_string()));
    }

    warn!(
        local = local_name,
        remote = remote_name,
        "local API key is not set, using remote API key"
    );
    Setting::from_env_value(env.var(remote_name))
}

/// Resolve an API base URL.
///
/// Same ladder as [`resolve_key`], with one extra step: when the remote
/// variable is also unset and a default exists, the default is returned
/// instead of the sentinel.
pub fn resolve_base(
    env: &impl EnvSource,
    local_name: &str,
    remote_name: &str,
    default: Option<&str>,
) -> Setting {
    if let Setting::Value(base) = Setting::from_env_value(env.var(local_name)) {
        return Setting::Value(base);
    }

    if let Some(default) = default {
        warn!(
            local = local_name,
            "local API base is not set, falling back to default value"
        );
        return Setting::from_env_value(Some(default.to_string()));
    }

    warn!(
        local = local_name,
        remote = remote_name,
        "local API base is not set, using remote API base"
    );
    let base = Setting::from_env_value(env.var(remote_name));
    // Dead while a default short-circuits above.
    match (base, default) {
        (Setting::Unset, Some(default)) => {
            warn!(remote = remote_name, "remote API base is not set, using default value");
            Setting::from_env_value(Some(default.to_string()))
        }
        (base, _) => base,
    }
}

/// Resolved key and base for one provider context.
#[derive(Debug, Clone, Default)]
pub struct CredentialPair {
    pub key: Setting<ApiKey>,
    pub base: Setting,
}

impl CredentialPair {
    pub fn new(key: Setting, base: Setting) -> Self {
        Self {
            key: key.map(ApiKey::new),
            base,
        }
    }

    /// The key as a plain setting, for use as another pair's default.
    pub fn key_str(&self) -> &str {
        self.key.value().map(ApiKey::expose_secret).unwrap_or(UNSET)
    }

    pub fn base_str(&self) -> &str {
        self.base.as_str()
    }

    pub fn is_complete(&self) -> bool {
        !self.key.is_unset() && !self.base.is_unset()
    }
}

/// Variable names and defaults for one [`CredentialPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialVars {
    pub local_key: &'static str,
    pub remote_key: &'static str,
    pub default_key: Option<&'static str>,
    pub local_base: &'static str,
    pub remote_base: &'static str,
    pub default_base: Option<&'static str>,
}

impl CredentialVars {
    /// Resolve using the statically declared defaults.
    pub fn resolve(&self, env: &impl EnvSource) -> CredentialPair {
        self.resolve_with_defaults(env, self.default_key, self.default_base)
    }

    /// Resolve with defaults supplied at runtime, e.g. another resolved pair.
    pub fn resolve_with_defaults(
        &self,
        env: &impl EnvSource,
        default_key: Option<&str>,
        default_base: Option<&str>,
    ) -> CredentialPair {
        CredentialPair::new(
            resolve_key(env, self.local_key, self.remote_key, default_key),
            resolve_base(env, self.local_base, self.remote_base, default_base),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::EnvSnapshot;

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("sk-secret-key-12345");
        let debug = format!("{:?}", key);
        assert_eq!(debug, "ApiKey([REDACTED])");
        assert!(!debug.contains("sk-secret"));
    }

    #[test]
    fn api_key_from_string() {
        let key: ApiKey = "my-key".into();
        assert_eq!(key.expose_secret(), "my-key");

        let key: ApiKey = String::from("my-key").into();
        assert_eq!(key.expose_secret(), "my-key");
    }

    #[test]
    fn local_value_wins_over_remote() {
        let env = EnvSnapshot::new()
            .with("LOCAL_X", "local")
            .with("REMOTE_X", "remote");
        assert_eq!(
            resolve_key(&env, "LOCAL_X", "REMOTE_X", Some("default")),
            Setting::from("local")
        );
    }

    #[test]
    fn empty_local_value_is_returned_verbatim() {
        let env = EnvSnapshot::new().with("LOCAL_X", "").with("REMOTE_X", "remote");
        assert_eq!(resolve_key(&env, "LOCAL_X", "REMOTE_X", None), Setting::from(""));
        assert_eq!(resolve_base(&env, "LOCAL_X", "REMOTE_X", None), Setting::from(""));
    }

    #[test]
    fn sentinel_local_value_counts_as_unset() {
        let env = EnvSnapshot::new()
            .with("LOCAL_X", UNSET)
            .with("REMOTE_X", "remote");
        assert_eq!(resolve_key(&env, "LOCAL_X", "REMOTE_X", None), Setting::from("remote"));
    }

    #[test]
    fn default_beats_remote_when_local_unset() {
        let env = EnvSnapshot::new().with("REMOTE_X", "remote");
        assert_eq!(
            resolve_key(&env, "LOCAL_X", "REMOTE_X", Some("default")),
            Setting::from("default")
        );
        assert_eq!(
            resolve_base(&env, "LOCAL_X", "REMOTE_X", Some("default")),
            Setting::from("default")
        );
    }

    #[test]
    fn remote_used_without_default() {
        let env = EnvSnapshot::new().with("REMOTE_X", "remote");
        assert_eq!(resolve_key(&env, "LOCAL_X", "REMOTE_X", None), Setting::from("remote"));
        assert_eq!(resolve_base(&env, "LOCAL_X", "REMOTE_X", None), Setting::from("remote"));
    }

    #[test]
    fn everything_unset_yields_sentinel() {
        let env = EnvSnapshot::new();
        assert!(resolve_key(&env, "LOCAL_X", "REMOTE_X", None).is_unset());
        assert!(resolve_base(&env, "LOCAL_X", "REMOTE_X", None).is_unset());
    }

    #[test]
    fn base_falls_back_to_default_when_both_unset() {
        let env = EnvSnapshot::new();
        assert_eq!(
            resolve_base(&env, "LOCAL_X", "REMOTE_X", Some("http://fallback")),
            Setting::from("http://fallback")
        );
    }

    #[test]
    fn sentinel_default_stays_unset() {
        let env = EnvSnapshot::new();
        assert!(resolve_key(&env, "LOCAL_X", "REMOTE_X", Some(UNSET)).is_unset());
    }

    #[test]
    fn credential_vars_resolve_pair() {
        let vars = CredentialVars {
            local_key: "LOCAL_KEY",
            remote_key: "REMOTE_KEY",
            default_key: Some("local-dev-key"),
            local_base: "LOCAL_BASE",
            remote_base: "REMOTE_BASE",
            default_base: Some("http://localhost:8000/v1"),
        };
        let pair = vars.resolve(&EnvSnapshot::new().with("LOCAL_BASE", "http://proxy/v1"));
        assert_eq!(pair.key_str(), "local-dev-key");
        assert_eq!(pair.base_str(), "http://proxy/v1");
        assert!(pair.is_complete());
    }

    #[test]
    fn incomplete_pair_reports_sentinel() {
        let pair = CredentialPair::new(Setting::Unset, Setting::from("http://x"));
        assert_eq!(pair.key_str(), UNSET);
        assert!(!pair.is_complete());
    }
}
