//! A single image analysis round trip

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use super::error::AnalysisError;
use super::events::EventEmitter;
use super::request::{build_request, encode_image, parse_response};
use crate::config::DEFAULT_PROMPT;

/// One unit of work: send an image and a prompt, report what comes back
#[derive(Debug, Clone)]
pub struct AnalysisTask {
    endpoint: String,
    image: Vec<u8>,
    prompt: String,
}

impl AnalysisTask {
    /// Create a task; an empty prompt falls back to [`DEFAULT_PROMPT`]
    pub fn new(endpoint: impl Into<String>, image: Vec<u8>, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        let prompt = if prompt.trim().is_empty() {
            DEFAULT_PROMPT.to_string()
        } else {
            prompt
        };

        Self {
            endpoint: endpoint.into(),
            image,
            prompt,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// Run the request, emitting 25/50/75 progress along the way, then 100
    /// followed by exactly one result or error event.
    pub async fn run(self, client: &reqwest::Client, emitter: &EventEmitter) {
        let task_id = emitter.task_id();
        emitter.progress(25);

        let outcome = self.execute(client, emitter).await;
        emitter.progress(100);

        match outcome {
            Ok(text) => {
                info!("Task {} completed ({} chars)", task_id, text.len());
                emitter.result(text);
            }
            Err(e) => {
                warn!("Task {} failed: {}", task_id, e);
                emitter.error(e.to_string());
            }
        }
    }

    async fn execute(
        &self,
        client: &reqwest::Client,
        emitter: &EventEmitter,
    ) -> Result<String, AnalysisError> {
        let encoded = encode_image(&self.image);
        emitter.progress(50);

        let request = build_request(&self.prompt, encoded);
        let body = serde_json::to_vec(&request).map_err(AnalysisError::Serialize)?;
        emitter.progress(75);

        debug!(
            "Task {} posting {} bytes ({} image bytes)",
            emitter.task_id(),
            body.len(),
            self.image.len()
        );

        let response = client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(redact_url)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AnalysisError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(redact_url)?;
        parse_response(&bytes)
    }
}

/// The endpoint URL carries the API key; keep it out of messages shown to the user
fn redact_url(err: reqwest::Error) -> AnalysisError {
    AnalysisError::Transport(err.without_url())
}
