//! Speech-to-text adapter.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use super::{Generate, Message, RoleMap, Transport, endpoint, require_credentials, send_json};
use crate::auth::CredentialPair;
use crate::{Error, ProviderFamily, Result};

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Uploads the most recent audio attachment to
/// `POST {base}/audio/transcriptions` and returns the transcript.
#[derive(Debug, Clone)]
pub struct TranscriptionAdapter {
    provider: ProviderFamily,
    model_id: String,
    credentials: CredentialPair,
    transport: Transport,
}

impl TranscriptionAdapter {
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
impl Generate for TranscriptionAdapter {
    fn provider(&self) -> ProviderFamily {
        self.provider
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn credentials(&self) -> &CredentialPair {
        &self.credentials
    }

    // Roles do not reach the wire; only the audio file is sent.
    async fn generate(&self, conversation: &[Message], _roles: &RoleMap) -> Result<Message> {
        let (key, base) = require_credentials(&self.credentials, &self.model_id)?;

        let audio = conversation
            .iter()
            .rev()
            .find_map(|m| m.content.audio())
            .ok_or_else(|| Error::MissingInput("conversation has no audio attachment".into()))?;

        let bytes = tokio::fs::read(audio).await?;
        let file_name = audio
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        let url = endpoint(base, "audio/transcriptions");
        debug!(model = %self.model_id, %url, file = %file_name, "sending transcription");

        let form = Form::new()
            .text("model", self.model_id.clone())
            .part("file", Part::bytes(bytes).file_name(file_name));

        let response: TranscriptionResponse = send_json(
            self.transport
                .client()
                .post(&url)
                .bearer_auth(key)
                .multipart(form),
        )
        .await?;

        Ok(Message::assistant(response.text))
    }
}
