//! Long-running response adapter (deep research).
//!
//! Submits `POST {base}/responses` in background mode, then polls
//! `GET {base}/responses/{id}` until the job settles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    Generate, Message, RoleMap, Transport, WireMessage, endpoint, require_credentials, send_json,
};
use crate::auth::CredentialPair;
use crate::{Error, ProviderFamily, Result};

#[derive(Debug, Serialize)]
struct CreateResponseRequest<'a> {
    model: &'a str,
    input: Vec<WireMessage>,
    background: bool,
}

#[derive(Debug, Deserialize)]
struct ResponseObject {
    id: String,
    status: String,
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Where a background response stands.
#[derive(Debug, PartialEq, Eq)]
enum JobState {
    Pending,
    Completed,
    Failed,
}

impl ResponseObject {
    fn state(&self) -> JobState {
        match self.status.as_str() {
            "completed" => JobState::Completed,
            "failed" | "cancelled" | "incomplete" => JobState::Failed,
            _ => JobState::Pending,
        }
    }

    fn text(self) -> String {
        if let Some(text) = self.output_text {
            return text;
        }
        self.output
            .into_iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content)
            .filter(|c| c.kind == "output_text")
            .filter_map(|c| c.text)
            .collect::<Vec<_>>()
            .join("")
    }

    fn failure(&self) -> Error {
        let detail = self
            .error
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no details".to_string());
        Error::ProviderApi(format!("response {} {}: {}", self.id, self.status, detail))
    }
}

/// Deep-research style model answered through background responses.
#[derive(Debug, Clone)]
pub struct ResponseAdapter {
    provider: ProviderFamily,
    model_id: String,
    credentials: CredentialPair,
    transport: Transport,
}

impl ResponseAdapter {
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
impl Generate for ResponseAdapter {
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
        let (key, base) = require_credentials(&self.credentials, &self.model_id)?;
        let client = self.transport.client();
        let poll = self.transport.poll_policy();

        let request = CreateResponseRequest {
            model: &self.model_id,
            input: roles.apply(conversation),
            background: true,
        };
        let mut job: ResponseObject = send_json(
            client
                .post(endpoint(base, "responses"))
                .bearer_auth(key)
                .json(&request),
        )
        .await?;
        info!(model = %self.model_id, id = %job.id, "submitted background response");

        let mut attempts = 0;
        loop {
            match job.state() {
                JobState::Completed => return Ok(Message::assistant(job.text())),
                JobState::Failed => return Err(job.failure()),
                JobState::Pending if attempts >= poll.max_attempts => {
                    return Err(Error::PollTimeout {
                        job: job.id,
                        attempts,
                    });
                }
                JobState::Pending => {}
            }

            tokio::time::sleep(poll.interval).await;
            attempts += 1;
            debug!(id = %job.id, status = %job.status, attempts, "polling response");
            job = send_json(
                client
                    .get(endpoint(base, &format!("responses/{}", job.id)))
                    .bearer_auth(key),
            )
            .await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Setting;
    use crate::adapters::PollPolicy;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(base: &str, max_attempts: u32) -> ResponseAdapter {
        ResponseAdapter::new(
            ProviderFamily::OpenAi,
            "o3-deep-research",
            CredentialPair::new(Setting::from("sk-test"), Setting::from(base)),
            Transport::new().with_poll_policy(PollPolicy {
                interval: Duration::from_millis(10),
                max_attempts,
            }),
        )
    }

    #[tokio::test]
    async fn polls_until_completed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/responses"))
            .and(body_partial_json(json!({
                "model": "o3-deep-research",
                "background": true,
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "id": "resp_1", "status": "queued" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/responses/resp_1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "resp_1", "status": "in_progress" })),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/responses/resp_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "resp_1",
                "status": "completed",
                "output": [
                    { "type": "reasoning", "content": [] },
                    { "type": "message", "content": [
                        { "type": "output_text", "text": "Findings: " },
                        { "type": "output_text", "text": "done." },
                    ]},
                ],
            })))
            .mount(&server)
            .await;

        let reply = adapter(&server.uri(), 5)
            .generate(&[Message::user("research this")], &RoleMap::default())
            .await
            .unwrap();
        assert_eq!(reply.content.as_text(), "Findings: done.");
    }

    #[tokio::test]
    async fn immediate_completion_skips_polling() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "resp_2",
                "status": "completed",
                "output_text": "quick answer",
            })))
            .mount(&server)
            .await;

        let reply = adapter(&server.uri(), 0)
            .generate(&[Message::user("q")], &RoleMap::default())
            .await
            .unwrap();
        assert_eq!(reply.content.as_text(), "quick answer");
    }

    #[tokio::test]
    async fn failed_job_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "resp_3",
                "status": "failed",
                "error": { "code": "server_error" },
            })))
            .mount(&server)
            .await;

        let err = adapter(&server.uri(), 3)
            .generate(&[Message::user("q")], &RoleMap::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("server_error"));
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "id": "resp_4", "status": "queued" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/responses/resp_4"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "id": "resp_4", "status": "queued" })),
            )
            .expect(2)
            .mount(&server)
            .await;

        let err = adapter(&server.uri(), 2)
            .generate(&[Message::user("q")], &RoleMap::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PollTimeout { attempts: 2, .. }));
    }
}
