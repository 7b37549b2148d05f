//! Chat-completions adapters.
//!
//! [`ChatAdapter`] and [`ReasonerAdapter`] share one transport shape:
//! `POST {base}/chat/completions` with a bearer key. They stay distinct types
//! so the registry can tell a reasoning-tier binding apart from a chat one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    Generate, Message, RoleMap, Transport, WireMessage, endpoint, require_credentials, send_json,
};
use crate::auth::CredentialPair;
use crate::{Error, ProviderFamily, Result};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

async fn complete(
    transport: &Transport,
    credentials: &CredentialPair,
    model_id: &str,
    conversation: &[Message],
    roles: &RoleMap,
) -> Result<Message> {
    let (key, base) = require_credentials(credentials, model_id)?;
    let url = endpoint(base, "chat/completions");
    debug!(model = model_id, %url, "sending chat completion");

    let request = ChatCompletionRequest {
        model: model_id,
        messages: roles.apply(conversation),
    };

    let response: ChatCompletionResponse = send_json(
        transport
            .client()
            .post(&url)
            .bearer_auth(key)
            .json(&request),
    )
    .await?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::ProviderApi(format!("{model_id} returned no choices")))?;

    Ok(Message::assistant(choice.message.content.unwrap_or_default()))
}

/// Chat model behind an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct ChatAdapter {
    provider: ProviderFamily,
    model_id: String,
    credentials: CredentialPair,
    transport: Transport,
}

impl ChatAdapter {
    pub fn new(
        provider: ProviderFamily,
        model_id: impl Into<String>,
        credentials: CredentialPair,
        transport: Transport,
    ) -> Self {
        Self {
            provider,
            model_id: model_id.into(),
            credentials,
            transport,
        }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}

#[async_trait]
impl Generate for ChatAdapter {
    fn provider(&self) -> ProviderFamily {
        self.provider
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn credentials(&self) -> &CredentialPair {
        &self.credentials
    }

    async fn generate(&self, conversation: &[Message], roles: &RoleMap) -> Result<Message> {
        complete(
            &self.transport,
            &self.credentials,
            &self.model_id,
            conversation,
            roles,
        )
        .await
    }
}

/// Reasoning-tier model; chat transport, one dedicated model id.
#[derive(Debug, Clone)]
pub struct ReasonerAdapter {
    provider: ProviderFamily,
    model_id: String,
    credentials: CredentialPair,
    transport: Transport,
}

impl ReasonerAdapter {
    pub fn new(
        provider: ProviderFamily,
        model_id: impl Into<String>,
        credentials: CredentialPair,
        transport: Transport,
    ) -> Self {
        Self {
            provider,
            model_id: model_id.into(),
            credentials,
            transport,
        }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}

#[async_trait]
impl Generate for ReasonerAdapter {
    fn provider(&self) -> ProviderFamily {
        self.provider
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn credentials(&self) -> &CredentialPair {
        &self.credentials
    }

    async fn generate(&self, conversation: &[Message], roles: &RoleMap) -> Result<Message> {
        complete(
            &self.transport,
            &self.credentials,
            &self.model_id,
            conversation,
            roles,
        )
        .await
    }
}
