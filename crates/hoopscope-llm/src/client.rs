// Chat-completion client for team comparison analysis.
//
// Sends one system + user message pair to an OpenAI-style
// `/chat/completions` endpoint with `stream: false` and returns the
// assistant's text. The HTTP leg sits behind the `ChatTransport` trait so the
// classification logic can be exercised against an in-process stub.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use hoopscope_core::config::Config;
use hoopscope_core::matchup::TeamAnalysisConfig;

use crate::prompt::{self, PromptVariant};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why an analysis request produced no text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// No API key configured. Checked before any network activity.
    #[error("API key not found. Please set your API key in the settings.")]
    MissingCredential,

    /// Connection failure, broken transfer or timeout.
    #[error("network error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("API error (status {status}): {body}")]
    Remote { status: u16, body: String },

    /// A success status whose body does not match the completion schema.
    #[error("invalid response format: {0}")]
    MalformedResponse(String),
}

impl AnalysisError {
    /// Whether the user has to visit settings before retrying makes sense.
    pub fn needs_settings(&self) -> bool {
        matches!(self, AnalysisError::MissingCredential)
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Request body for the chat-completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub temperature: f32,
}

/// The two body shapes the endpoint produces.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CompletionBody {
    Success { choices: Vec<Choice> },
    Failure { error: serde_json::Value },
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Raw status and body as received from the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// Extract the assistant text from a reply, classifying every failure.
pub(crate) fn parse_completion(reply: &HttpReply) -> Result<String, AnalysisError> {
    if !(200..300).contains(&reply.status) {
        return Err(AnalysisError::Remote {
            status: reply.status,
            body: reply.body.clone(),
        });
    }

    let body: CompletionBody = serde_json::from_str(&reply.body)
        .map_err(|e| AnalysisError::MalformedResponse(format!("unexpected JSON: {e}")))?;

    match body {
        CompletionBody::Success { choices } => choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                AnalysisError::MalformedResponse("missing choices[0].message.content".into())
            }),
        CompletionBody::Failure { error } => Err(AnalysisError::MalformedResponse(format!(
            "error object in success response: {error}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// One HTTP round trip. Implementations map connection-level failures to
/// `AnalysisError::Transport` and return every received response, whatever
/// its status, as an `HttpReply`.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, api_key: &str, request: &ChatRequest) -> Result<HttpReply, AnalysisError>;
}

/// reqwest-backed transport with a fixed endpoint and timeout.
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, api_key: &str, request: &ChatRequest) -> Result<HttpReply, AnalysisError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        Ok(HttpReply { status, body })
    }
}

fn transport_error(err: reqwest::Error) -> AnalysisError {
    if err.is_timeout() {
        AnalysisError::Transport(format!("request timed out: {err}"))
    } else {
        AnalysisError::Transport(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// AnalysisClient
// ---------------------------------------------------------------------------

/// Submits prompts and returns the assistant's raw text. Performs exactly one
/// request per call; retries are the caller's business.
#[derive(Clone)]
pub struct AnalysisClient {
    transport: Arc<dyn ChatTransport>,
    api_key: String,
    model: String,
}

impl AnalysisClient {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Build a client with an `HttpTransport` from the application config.
    /// A missing key is not an error here; `complete` reports it.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(config.llm.endpoint.clone(), config.llm.timeout())?;
        let api_key = config.credentials.api_key().unwrap_or_default();
        Ok(Self::new(Arc::new(transport), api_key, config.llm.model.clone()))
    }

    /// Same transport and model, different key.
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            api_key: api_key.into(),
            model: self.model.clone(),
        }
    }

    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The request body sent for `prompt`: fixed system message, the prompt
    /// as the user message, no streaming, temperature 0.
    pub fn build_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: prompt::system_prompt(),
                },
                ChatMessage {
                    role: Role::User,
                    content: prompt.to_string(),
                },
            ],
            stream: false,
            temperature: 0.0,
        }
    }

    /// Send `prompt` and return the assistant text.
    pub async fn complete(&self, prompt: &str) -> Result<String, AnalysisError> {
        if !self.has_credential() {
            warn!("Analysis requested without an API key");
            return Err(AnalysisError::MissingCredential);
        }

        let request = self.build_request(prompt);
        debug!(model = %self.model, prompt_len = prompt.len(), "sending chat completion");

        let reply = self.transport.send(self.api_key.trim(), &request).await?;
        debug!(status = reply.status, body_len = reply.body.len(), "chat completion reply");

        let text = parse_completion(&reply)?;
        info!("Analysis received ({} chars)", text.len());
        Ok(text)
    }

    /// Build the prompt for `configs` and submit it.
    pub async fn analyze(
        &self,
        configs: &[TeamAnalysisConfig],
        variant: PromptVariant,
    ) -> Result<String, AnalysisError> {
        let prompt = prompt::build_prompt(variant, configs);
        self.complete(&prompt).await
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Transport that returns a canned reply and records what it was sent.
    struct StubTransport {
        reply: Result<HttpReply, AnalysisError>,
        calls: AtomicUsize,
        last_key: Mutex<Option<String>>,
    }

    impl StubTransport {
        fn replying(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(HttpReply {
                    status,
                    body: body.to_string(),
                }),
                calls: AtomicUsize::new(0),
                last_key: Mutex::new(None),
            })
        }

        fn failing(err: AnalysisError) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(err),
                calls: AtomicUsize::new(0),
                last_key: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatTransport for StubTransport {
        async fn send(&self, api_key: &str, _request: &ChatRequest) -> Result<HttpReply, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_key.lock().unwrap() = Some(api_key.to_string());
            self.reply.clone()
        }
    }

    const OK_BODY: &str = r##"{
        "id": "cmpl-1",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": "# NBA Team Comparison Analysis" } }
        ]
    }"##;

    // -- parse_completion --

    #[test]
    fn parse_success_extracts_first_choice() {
        let reply = HttpReply { status: 200, body: OK_BODY.into() };
        assert_eq!(parse_completion(&reply), Ok("# NBA Team Comparison Analysis".into()));
    }

    #[test]
    fn parse_non_success_status_is_remote_error() {
        let reply = HttpReply { status: 500, body: "rate limited".into() };
        assert_eq!(
            parse_completion(&reply),
            Err(AnalysisError::Remote { status: 500, body: "rate limited".into() })
        );
    }

    #[test]
    fn parse_invalid_json_is_malformed() {
        let reply = HttpReply { status: 200, body: "<html>oops</html>".into() };
        assert!(matches!(parse_completion(&reply), Err(AnalysisError::MalformedResponse(_))));
    }

    #[test]
    fn parse_empty_choices_is_malformed() {
        let reply = HttpReply { status: 200, body: r#"{"choices": []}"#.into() };
        assert!(matches!(parse_completion(&reply), Err(AnalysisError::MalformedResponse(_))));
    }

    #[test]
    fn parse_missing_content_is_malformed() {
        let reply = HttpReply {
            status: 200,
            body: r#"{"choices": [{"message": {"role": "assistant"}}]}"#.into(),
        };
        assert!(matches!(parse_completion(&reply), Err(AnalysisError::MalformedResponse(_))));
    }

    #[test]
    fn parse_error_object_with_ok_status_is_malformed() {
        let reply = HttpReply {
            status: 200,
            body: r#"{"error": {"message": "quota exceeded"}}"#.into(),
        };
        match parse_completion(&reply) {
            Err(AnalysisError::MalformedResponse(msg)) => assert!(msg.contains("quota exceeded")),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    // -- request shape --

    #[test]
    fn request_serializes_to_chat_completion_body() {
        let client = AnalysisClient::new(StubTransport::replying(200, OK_BODY), "xai-k", "grok-4-latest");
        let value = serde_json::to_value(client.build_request("compare")).unwrap();

        assert_eq!(value["model"], "grok-4-latest");
        assert_eq!(value["stream"], false);
        assert_eq!(value["temperature"], 0.0);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], prompt::system_prompt());
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "compare");
        assert_eq!(value["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn identical_prompts_build_identical_requests() {
        let client = AnalysisClient::new(StubTransport::replying(200, OK_BODY), "xai-k", "m");
        assert_eq!(client.build_request("p"), client.build_request("p"));
    }

    // -- AnalysisClient --

    #[tokio::test]
    async fn empty_credential_fails_without_network_call() {
        let stub = StubTransport::replying(200, OK_BODY);
        let client = AnalysisClient::new(stub.clone(), "", "m");

        assert_eq!(client.complete("prompt").await, Err(AnalysisError::MissingCredential));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn blank_credential_counts_as_missing() {
        let stub = StubTransport::replying(200, OK_BODY);
        let client = AnalysisClient::new(stub.clone(), "   ", "m");

        assert!(!client.has_credential());
        assert_eq!(client.complete("prompt").await, Err(AnalysisError::MissingCredential));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn complete_returns_text_and_sends_trimmed_key() {
        let stub = StubTransport::replying(200, OK_BODY);
        let client = AnalysisClient::new(stub.clone(), " xai-key ", "m");

        let text = client.complete("prompt").await.unwrap();
        assert_eq!(text, "# NBA Team Comparison Analysis");
        assert_eq!(stub.calls(), 1);
        assert_eq!(stub.last_key.lock().unwrap().as_deref(), Some("xai-key"));
    }

    #[tokio::test]
    async fn remote_error_is_surfaced_with_status_and_body() {
        let stub = StubTransport::replying(500, "rate limited");
        let client = AnalysisClient::new(stub.clone(), "xai-key", "m");

        assert_eq!(
            client.complete("prompt").await,
            Err(AnalysisError::Remote { status: 500, body: "rate limited".into() })
        );
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn transport_failure_passes_through() {
        let stub = StubTransport::failing(AnalysisError::Transport("connection refused".into()));
        let client = AnalysisClient::new(stub.clone(), "xai-key", "m");

        assert_eq!(
            client.complete("prompt").await,
            Err(AnalysisError::Transport("connection refused".into()))
        );
    }

    #[tokio::test]
    async fn with_api_key_shares_transport() {
        let stub = StubTransport::replying(200, OK_BODY);
        let keyless = AnalysisClient::new(stub.clone(), "", "m");
        let keyed = keyless.with_api_key("xai-new");

        assert!(keyed.complete("prompt").await.is_ok());
        assert_eq!(stub.calls(), 1);
        assert_eq!(keyed.model(), "m");
    }

    #[test]
    fn only_missing_credential_needs_settings() {
        assert!(AnalysisError::MissingCredential.needs_settings());
        assert!(!AnalysisError::Transport("x".into()).needs_settings());
        assert!(!AnalysisError::Remote { status: 401, body: String::new() }.needs_settings());
        assert!(!AnalysisError::MalformedResponse("x".into()).needs_settings());
    }
}
