//! Model adapters.
//!
//! The [`Generate`] trait is the uniform capability every registered model
//! exposes. [`Adapter`] is the closed set of transport shapes; each variant
//! carries only the fields its shape needs.
//!
//! # Example
//!
//! ```ignore
//! use dra_models::adapters::{Generate, Message, RoleMap};
//!
//! async fn ask(adapter: &dyn Generate) {
//!     let reply = adapter
//!         .generate(&[Message::user("Hello!")], &RoleMap::default())
//!         .await?;
//!     println!("{}", reply.content.as_text());
//! }
//! ```

mod chat;
mod generation;
mod response;
mod transcription;
mod types;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use tracing::warn;

pub use chat::{ChatAdapter, ReasonerAdapter};
pub use generation::GenerateThenFetchAdapter;
pub use response::ResponseAdapter;
pub use transcription::TranscriptionAdapter;
pub use types::*;

use crate::auth::CredentialPair;
use crate::{Error, ProviderFamily, Result};

/// Default request timeout for the shared HTTP client.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// How long-running jobs are polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between status checks.
    pub interval: Duration,
    /// Checks before giving up.
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: 360,
        }
    }
}

/// A shared HTTP client.
///
/// Cloning shares the underlying connection pool; one transport is built per
/// provider branch and handed to every adapter of that branch.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Arc<reqwest::Client>,
    poll: PollPolicy,
}

impl Transport {
    /// Create a transport with the default timeout and poll policy.
    ///
    /// Falls back to a client without the timeout, with a warning, when the
    /// TLS backend cannot be initialized.
    pub fn new() -> Self {
        Self::try_new().unwrap_or_else(|err| {
            warn!(error = %err, "HTTP client setup failed, requests will have no timeout");
            Self::with_client(reqwest::Client::new())
        })
    }

    /// Create a transport with the default timeout, or fail.
    pub fn try_new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Arc::new(client),
            poll: PollPolicy::default(),
        }
    }

    /// Replace the poll policy used by long-running adapters.
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn poll_policy(&self) -> PollPolicy {
        self.poll
    }

    /// Whether both transports use the same connection pool.
    pub fn shares_pool_with(&self, other: &Transport) -> bool {
        Arc::ptr_eq(&self.client, &other.client)
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

/// Transport shape of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterKind {
    Chat,
    Reasoner,
    Transcription,
    Response,
    GenerateThenFetch,
}

impl AdapterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Reasoner => "reasoner",
            Self::Transcription => "transcription",
            Self::Response => "response",
            Self::GenerateThenFetch => "generate-then-fetch",
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The capability every registered model exposes.
#[async_trait]
pub trait Generate: Send + Sync {
    /// Provider family that built this adapter.
    fn provider(&self) -> ProviderFamily;

    /// Model id sent to the backend. For two-stage adapters, the submit id.
    fn model_id(&self) -> &str;

    /// Credentials the adapter authenticates with.
    fn credentials(&self) -> &CredentialPair;

    /// Run the conversation and return the model's reply.
    ///
    /// `roles` converts abstract roles to transport roles before anything is
    /// sent.
    async fn generate(&self, conversation: &[Message], roles: &RoleMap) -> Result<Message>;
}

/// One of the supported adapter shapes.
#[derive(Debug, Clone)]
pub enum Adapter {
    Chat(ChatAdapter),
    Reasoner(ReasonerAdapter),
    Transcription(TranscriptionAdapter),
    Response(ResponseAdapter),
    GenerateThenFetch(GenerateThenFetchAdapter),
}

impl Adapter {
    pub fn kind(&self) -> AdapterKind {
        match self {
            Adapter::Chat(_) => AdapterKind::Chat,
            Adapter::Reasoner(_) => AdapterKind::Reasoner,
            Adapter::Transcription(_) => AdapterKind::Transcription,
            Adapter::Response(_) => AdapterKind::Response,
            Adapter::GenerateThenFetch(_) => AdapterKind::GenerateThenFetch,
        }
    }

    pub fn transport(&self) -> &Transport {
        match self {
            Adapter::Chat(a) => a.transport(),
            Adapter::Reasoner(a) => a.transport(),
            Adapter::Transcription(a) => a.transport(),
            Adapter::Response(a) => a.transport(),
            Adapter::GenerateThenFetch(a) => a.transport(),
        }
    }

    fn inner(&self) -> &dyn Generate {
        match self {
            Adapter::Chat(a) => a,
            Adapter::Reasoner(a) => a,
            Adapter::Transcription(a) => a,
            Adapter::Response(a) => a,
            Adapter::GenerateThenFetch(a) => a,
        }
    }
}

#[async_trait]
impl Generate for Adapter {
    fn provider(&self) -> ProviderFamily {
        self.inner().provider()
    }

    fn model_id(&self) -> &str {
        self.inner().model_id()
    }

    fn credentials(&self) -> &CredentialPair {
        self.inner().credentials()
    }

    async fn generate(&self, conversation: &[Message], roles: &RoleMap) -> Result<Message> {
        self.inner().generate(conversation, roles).await
    }
}

impl From<ChatAdapter> for Adapter {
    fn from(a: ChatAdapter) -> Self {
        Adapter::Chat(a)
    }
}

impl From<ReasonerAdapter> for Adapter {
    fn from(a: ReasonerAdapter) -> Self {
        Adapter::Reasoner(a)
    }
}

impl From<TranscriptionAdapter> for Adapter {
    fn from(a: TranscriptionAdapter) -> Self {
        Adapter::Transcription(a)
    }
}

impl From<ResponseAdapter> for Adapter {
    fn from(a: ResponseAdapter) -> Self {
        Adapter::Response(a)
    }
}

impl From<GenerateThenFetchAdapter> for Adapter {
    fn from(a: GenerateThenFetchAdapter) -> Self {
        Adapter::GenerateThenFetch(a)
    }
}

/// Join a base URL and a path without doubling the slash.
fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Key and base for `model`, or [`Error::Unconfigured`].
fn require_credentials<'a>(
    credentials: &'a CredentialPair,
    model: &str,
) -> Result<(&'a str, &'a str)> {
    let key = credentials.key.require(model, "API key")?;
    let base = credentials.base.require(model, "API base")?;
    Ok((key.expose_secret(), base.as_str()))
}

/// Send a request and decode a JSON body, mapping non-2xx to
/// [`Error::ProviderApi`].
async fn send_json<T: serde::de::DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = request.send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::ProviderApi(format!(
            "API returned {}: {}",
            status, body
        )));
    }

    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Setting;

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(
            endpoint("http://host/v1/", "/chat/completions"),
            "http://host/v1/chat/completions"
        );
        assert_eq!(endpoint("http://host/v1", "responses"), "http://host/v1/responses");
    }

    #[test]
    fn transport_builds_with_timeout_client() {
        let transport = Transport::try_new().unwrap();
        assert_eq!(transport.poll_policy(), PollPolicy::default());
    }

    #[test]
    fn cloned_transport_shares_pool() {
        let a = Transport::new();
        let b = a.clone();
        let c = Transport::new();
        assert!(a.shares_pool_with(&b));
        assert!(!a.shares_pool_with(&c));
    }

    #[test]
    fn require_credentials_rejects_unset_key() {
        let creds = CredentialPair::new(Setting::Unset, Setting::from("http://x"));
        let err = require_credentials(&creds, "gpt-4o").unwrap_err();
        assert!(matches!(err, Error::Unconfigured { field: "API key", .. }));
    }

    #[test]
    fn require_credentials_accepts_empty_key() {
        let creds = CredentialPair::new(Setting::from(""), Setting::from("http://x"));
        let (key, base) = require_credentials(&creds, "local").unwrap();
        assert_eq!(key, "");
        assert_eq!(base, "http://x");
    }

    #[test]
    fn adapter_exposes_kind_and_config() {
        let creds = CredentialPair::new(Setting::from("k"), Setting::from("http://x"));
        let adapter: Adapter =
            ChatAdapter::new(ProviderFamily::OpenAi, "gpt-4o", creds, Transport::new()).into();
        assert_eq!(adapter.kind(), AdapterKind::Chat);
        assert_eq!(adapter.model_id(), "gpt-4o");
        assert_eq!(adapter.provider(), ProviderFamily::OpenAi);
        assert_eq!(adapter.credentials().base_str(), "http://x");
    }
}
