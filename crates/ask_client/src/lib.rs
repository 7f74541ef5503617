//! Session orchestrator for the askdock panel.
//!
//! Owns the outbound request lifecycle against the remote answering service:
//! durable session identity, per-request timeout merged with caller-supplied
//! cancellation, and an offline mock mode that fabricates replies locally.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use shared::{AskReply, AskRequest, ErrorBody, PanelEvent, QueryContext};
use tokio::sync::Mutex;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub mod error;
mod mock;

pub use error::AskError;
pub use mock::MOCK_APR;

/// Default per-request deadline when the caller supplies none.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Host callback receiving panel lifecycle events, for analytics.
pub type EventSink = Arc<dyn Fn(&PanelEvent) + Send + Sync>;

/// Static configuration handed to [`AskClient::new`] by the embedding shell.
#[derive(Clone)]
pub struct AskConfig {
    /// Base URL of the answering service, without the trailing `/ask`.
    pub api_url: String,
    pub dapp: String,
    pub lang: String,
    /// Attached as `Authorization: Bearer <token>` when present.
    pub bearer_token: Option<String>,
    /// Fabricate replies locally instead of contacting the service.
    pub mock: bool,
    pub timeout: Duration,
    /// Opaque host identifier forwarded for analytics.
    pub client_id: Option<String>,
    pub on_event: Option<EventSink>,
}

impl AskConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            dapp: "kamino".to_string(),
            lang: "en".to_string(),
            bearer_token: None,
            mock: false,
            timeout: DEFAULT_TIMEOUT,
            client_id: None,
            on_event: None,
        }
    }
}

/// Per-call knobs for [`AskClient::ask`].
#[derive(Default, Clone)]
pub struct AskOptions {
    /// External cancellation handle; merged with the internal timeout timer
    /// into one effective cancellation.
    pub cancel: Option<CancellationToken>,
    /// Overrides the configured timeout for this call only.
    pub timeout: Option<Duration>,
}

/// One conversational identity against the remote service.
///
/// The session token is generated lazily on the first live request and
/// rotated whenever a reply carries a different `session_id`. Concurrent
/// `ask` calls are legal and independent; rotation is last-writer-wins.
pub struct AskClient {
    http: Client,
    config: AskConfig,
    session: Mutex<Option<String>>,
}

impl AskClient {
    pub fn new(config: AskConfig) -> Self {
        Self {
            http: Client::new(),
            config,
            session: Mutex::new(None),
        }
    }

    pub async fn session_id(&self) -> Option<String> {
        self.session.lock().await.clone()
    }

    /// Overrides the session token, e.g. when the host restores a persisted
    /// conversation.
    pub async fn set_session_id(&self, id: impl Into<String>) {
        *self.session.lock().await = Some(id.into());
    }

    /// Sends one query and resolves to a structured reply.
    ///
    /// `text` is forwarded as-is; trimming and empty-string policy are the
    /// caller's responsibility. Exactly one timeout timer exists per call and
    /// it is dropped on any completion; whichever of the timer and the
    /// caller's cancellation fires first wins.
    pub async fn ask(&self, text: &str, options: AskOptions) -> Result<AskReply, AskError> {
        let timeout = options.timeout.unwrap_or(self.config.timeout);
        let cancel = options.cancel.unwrap_or_default();

        self.emit(PanelEvent::Sent {
            query: text.to_string(),
        });

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("ask cancelled by caller");
                Err(AskError::Cancelled)
            }
            _ = time::sleep(timeout) => {
                warn!(timeout_ms = timeout.as_millis() as u64, "ask timed out");
                Err(AskError::TimedOut)
            }
            result = self.dispatch(text) => result,
        };

        match &result {
            Ok(reply) => self.emit(PanelEvent::Response {
                answer: reply.answer.clone(),
                confidence: reply.confidence,
            }),
            Err(err) => self.emit(PanelEvent::Failed {
                kind: err.kind().to_string(),
                message: err.to_string(),
            }),
        }
        result
    }

    async fn dispatch(&self, text: &str) -> Result<AskReply, AskError> {
        if self.config.mock {
            return Ok(mock::answer(text).await);
        }
        self.ask_remote(text).await
    }

    async fn ask_remote(&self, text: &str) -> Result<AskReply, AskError> {
        let session_id = self.ensure_session().await;
        let request = AskRequest {
            query: text.to_string(),
            pool_id: None,
            amount: None,
            currency: None,
            client_id: self.config.client_id.clone(),
            context: QueryContext {
                dapp: self.config.dapp.clone(),
                lang: self.config.lang.clone(),
            },
            session_id: Some(session_id.clone()),
        };

        let mut builder = self
            .http
            .post(format!("{}/ask", self.config.api_url))
            .json(&request);
        if let Some(token) = &self.config.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(AskError::network)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(AskError::network)?;
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|err| err.error)
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            warn!(status = status.as_u16(), "ask rejected by server");
            return Err(AskError::RequestFailed { message });
        }

        let body = response.text().await.map_err(AskError::network)?;
        let reply: AskReply = serde_json::from_str(&body).map_err(|err| {
            AskError::MalformedResponse {
                detail: err.to_string(),
            }
        })?;

        // Server-directed session rotation. Last writer wins across
        // concurrent calls; see DESIGN.md.
        if let Some(rotated) = &reply.session_id {
            if *rotated != session_id {
                info!("adopting server-rotated session id");
                *self.session.lock().await = Some(rotated.clone());
            }
        }
        Ok(reply)
    }

    async fn ensure_session(&self) -> String {
        let mut slot = self.session.lock().await;
        slot.get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone()
    }

    fn emit(&self, event: PanelEvent) {
        if let Some(sink) = &self.config.on_event {
            (sink.as_ref())(&event);
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
