//! HttpChatBackend -- concrete [`ChatBackend`] over the chat backend's REST API.
//!
//! Endpoints:
//! - `POST {base}/api/chat`
//! - `GET  {base}/api/user/{id}/history?limit=N`
//! - `GET  {base}/api/user/{id}/predict`

use std::time::Duration;

use reqwest::{Response, Url};

use mindneox_core::chat::backend::ChatBackend;
use mindneox_types::chat::{ChatReply, ChatRequest, GreetingResponse, HistoryEntry, HistoryResponse};
use mindneox_types::config::BackendConfig;
use mindneox_types::error::BackendError;
use mindneox_types::visitor::VisitorId;

pub struct HttpChatBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpChatBackend {
    /// Build a client from config. Fails on an unusable base URL.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| BackendError::Transport(format!("invalid base URL '{}': {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::Transport(format!(
                "invalid base URL '{}': cannot be a base",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| BackendError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn check_status(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

fn transport(e: reqwest::Error) -> BackendError {
    BackendError::Transport(e.to_string())
}

fn decode(e: reqwest::Error) -> BackendError {
    BackendError::Decode(e.to_string())
}

impl ChatBackend for HttpChatBackend {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
        let url = self.endpoint(&["api", "chat"]);
        tracing::debug!(%url, user_id = %request.user_id, "sending chat message");

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(transport)?;

        Self::check_status(response).await?.json().await.map_err(decode)
    }

    async fn fetch_history(
        &self,
        visitor_id: &VisitorId,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>, BackendError> {
        let url = self.endpoint(&["api", "user", visitor_id.as_str(), "history"]);

        let response = self
            .client
            .get(url)
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(transport)?;

        let body: HistoryResponse = Self::check_status(response).await?.json().await.map_err(decode)?;
        Ok(body.history)
    }

    async fn fetch_greeting(&self, visitor_id: &VisitorId) -> Result<Option<String>, BackendError> {
        let url = self.endpoint(&["api", "user", visitor_id.as_str(), "predict"]);

        let response = self.client.get(url).send().await.map_err(transport)?;

        let body: GreetingResponse = Self::check_status(response).await?.json().await.map_err(decode)?;
        Ok(body.greeting)
    }
}
