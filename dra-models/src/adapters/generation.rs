//! Two-stage generation adapter for image/video models.
//!
//! The configured base may be the OpenAI-compatible route (`.../v1beta/openai`)
//! shared with chat models; both stages talk to the native API under it.
//!
//! Stage one submits `POST {native}/models/{predict_id}:predictLongRunning` and
//! receives an operation name. Stage two polls `GET {native}/{operation}` until
//! the operation reports `done`. A bare job handle without the `models/` prefix
//! is polled under the fetch id as `models/{fetch_id}/operations/{handle}`.
//! The reply carries the operation's `response` object as JSON text.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::{
    Generate, Message, RoleMap, Transport, TransportRole, endpoint, require_credentials, send_json,
};
use crate::auth::CredentialPair;
use crate::{Error, ProviderFamily, Result};

const COMPAT_SUFFIX: &str = "/openai";

/// Strip the OpenAI-compatible suffix from `base`.
fn native_base(base: &str) -> &str {
    let base = base.trim_end_matches('/');
    base.strip_suffix(COMPAT_SUFFIX).unwrap_or(base)
}

/// Poll URL for the operation `name`.
fn operation_url(native: &str, fetch_id: &str, name: &str) -> String {
    if name.starts_with("models/") {
        endpoint(native, name)
    } else {
        endpoint(native, &format!("models/{fetch_id}/operations/{name}"))
    }
}

#[derive(Debug, Deserialize)]
struct Operation {
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    response: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Submit-then-fetch model with distinct predict and fetch ids.
#[derive(Debug, Clone)]
pub struct GenerateThenFetchAdapter {
    provider: ProviderFamily,
    predict_id: String,
    fetch_id: String,
    credentials: CredentialPair,
    transport: Transport,
}

impl GenerateThenFetchAdapter {
    pub fn new(
        provider: ProviderFamily,
        predict_id: impl Into<String>,
        fetch_id: impl Into<String>,
        credentials: CredentialPair,
        transport: Transport,
    ) -> Self {
        Self {
            provider,
            predict_id: predict_id.into(),
            fetch_id: fetch_id.into(),
            credentials,
            transport,
        }
    }

    pub fn predict_id(&self) -> &str {
        &self.predict_id
    }

    pub fn fetch_id(&self) -> &str {
        &self.fetch_id
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}

#[async_trait]
impl Generate for GenerateThenFetchAdapter {
    fn provider(&self) -> ProviderFamily {
        self.provider
    }

    fn model_id(&self) -> &str {
        &self.predict_id
    }

    fn credentials(&self) -> &CredentialPair {
        &self.credentials
    }

    async fn generate(&self, conversation: &[Message], roles: &RoleMap) -> Result<Message> {
        let (key, base) = require_credentials(&self.credentials, &self.predict_id)?;
        let client = self.transport.client();
        let poll = self.transport.poll_policy();

        // The prompt is the latest message that goes out as a user turn.
        let prompt = conversation
            .iter()
            .rev()
            .find(|m| roles.transport_role(m.role) == TransportRole::User)
            .map(|m| m.content.as_text())
            .ok_or_else(|| Error::MissingInput("conversation has no user prompt".into()))?;

        let native = native_base(base);
        let submitted: Operation = send_json(
            client
                .post(endpoint(
                    native,
                    &format!("models/{}:predictLongRunning", self.predict_id),
                ))
                .header("x-goog-api-key", key)
                .json(&json!({ "instances": [{ "prompt": prompt }] })),
        )
        .await?;
        info!(model = %self.predict_id, operation = %submitted.name, "submitted generation");

        let fetch_url = operation_url(native, &self.fetch_id, &submitted.name);
        let mut attempts = 0;
        loop {
            if attempts >= poll.max_attempts {
                return Err(Error::PollTimeout {
                    job: submitted.name,
                    attempts,
                });
            }
            attempts += 1;

            let op: Operation =
                send_json(client.get(&fetch_url).header("x-goog-api-key", key)).await?;

            if op.done {
                if let Some(error) = op.error {
                    return Err(Error::ProviderApi(format!(
                        "operation {} failed: {}",
                        op.name, error
                    )));
                }
                let body = op.response.unwrap_or(serde_json::Value::Null);
                return Ok(Message::assistant(body.to_string()));
            }

            debug!(operation = %op.name, attempts, "generation still running");
            tokio::time::sleep(poll.interval).await;
        }
    }
}
