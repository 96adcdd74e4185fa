//! OpenAI-compatible chat completion client.
//!
//! Generates search summaries, direct answers and related-query
//! suggestions from the top search results. Uses the non-streaming
//! `POST {base_url}/v1/chat/completions` endpoint, so any OpenAI-compatible
//! server (OpenAI, a local Ollama, a proxy) works.

use std::time::Duration;

use mawrid_search::SearchResult;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// Results included in prompt context.
const CONTEXT_RESULTS: usize = 5;

/// Result URLs cited as answer sources.
const ANSWER_SOURCES: usize = 3;

/// LLM suggestions kept per query.
const MAX_SUGGESTIONS: usize = 5;

/// Token cap for suggestion requests.
const SUGGESTION_MAX_TOKENS: u32 = 200;

const SUMMARY_TEMPERATURE: f64 = 0.3;
const ANSWER_TEMPERATURE: f64 = 0.2;
const SUGGESTION_TEMPERATURE: f64 = 0.7;

/// Confidence used when the model's `CONFIDENCE:` line is not a number.
const UNPARSEABLE_CONFIDENCE: f64 = 0.5;

/// Summary shown when the LLM is unavailable or fails.
pub const SUMMARY_FALLBACK: &str = "Unable to generate AI summary at this time.";

/// Answer shown when the LLM is unavailable or fails.
pub const ANSWER_FALLBACK: &str = "Error occurred while processing your request.";

/// Errors from the LLM provider.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The client is disabled or has no API key.
    #[error("LLM is not configured")]
    NotConfigured,

    /// Transport failure or rate limiting.
    #[error("request error: {0}")]
    Request(String),

    /// The provider rejected the API key.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The provider returned an error status.
    #[error("provider error: {0}")]
    Provider(String),

    /// The response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

/// A direct answer with supporting evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnswer {
    /// The direct answer.
    pub answer: String,
    /// Evidence quoted or paraphrased from the sources.
    pub evidence: String,
    /// URLs of the top results the answer was drawn from.
    pub sources: Vec<String>,
    /// Model-reported confidence in `0.0..=1.0`.
    pub confidence: f64,
    /// Short explanation of the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl AiAnswer {
    /// The answer returned when the LLM cannot produce one.
    pub fn fallback() -> Self {
        Self {
            answer: ANSWER_FALLBACK.to_owned(),
            evidence: String::new(),
            sources: Vec::new(),
            confidence: 0.0,
            reasoning: None,
        }
    }

    /// Parse the `ANSWER:` / `EVIDENCE:` / `CONFIDENCE:` / `REASONING:`
    /// line format requested by [`LlmClient::answer`].
    ///
    /// Missing lines leave their field empty; if there is no `ANSWER:` line
    /// the whole trimmed reply becomes the answer.
    pub fn parse(text: &str, results: &[SearchResult]) -> Self {
        let mut answer = None;
        let mut evidence = String::new();
        let mut confidence = 0.0;
        let mut reasoning = None;

        for line in text.lines().map(str::trim) {
            if let Some(rest) = line.strip_prefix("ANSWER:") {
                answer = Some(rest.trim().to_owned());
            } else if let Some(rest) = line.strip_prefix("EVIDENCE:") {
                evidence = rest.trim().to_owned();
            } else if let Some(rest) = line.strip_prefix("CONFIDENCE:") {
                confidence = rest
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|c| c.is_finite())
                    .map_or(UNPARSEABLE_CONFIDENCE, |c| c.clamp(0.0, 1.0));
            } else if let Some(rest) = line.strip_prefix("REASONING:") {
                reasoning = Some(rest.trim().to_owned()).filter(|r| !r.is_empty());
            }
        }

        Self {
            answer: answer.unwrap_or_else(|| text.trim().to_owned()),
            evidence,
            sources: results
                .iter()
                .take(ANSWER_SOURCES)
                .map(|r| r.url.clone())
                .collect(),
            confidence,
            reasoning,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completion API.
#[derive(Clone)]
pub struct LlmClient {
    config: LlmConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl LlmClient {
    /// Create a client. Never fails for a disabled config; requests then
    /// return [`LlmError::NotConfigured`].
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Request`] if the HTTP client cannot be built.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()
            .map_err(|e| LlmError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Whether the client is enabled and has an API key.
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    /// Whether search responses should include LLM suggestions.
    pub fn augments_suggestions(&self) -> bool {
        self.config.augment_suggestions && self.is_configured()
    }

    fn api_key(&self) -> Option<&str> {
        if !self.config.enabled {
            return None;
        }
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }

    /// Summarise the top results for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] if the client is not configured or the request
    /// fails.
    pub async fn summarize(&self, query: &str, results: &[SearchResult]) -> Result<String, LlmError> {
        let prompt = format!(
            "Based on the following search results for the query \"{query}\", write a clear, \
             factual summary that directly answers the question and draws on several sources.\n\n\
             Search results:\n{context}\nSummary:",
            context = prepare_context(results),
        );
        self.complete(
            "You are a helpful search assistant that writes accurate summaries of search results.",
            &prompt,
            self.config.max_tokens,
            SUMMARY_TEMPERATURE,
        )
        .await
    }

    /// Produce a direct answer for `query` grounded in `results`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] if the client is not configured or the request
    /// fails.
    pub async fn answer(&self, query: &str, results: &[SearchResult]) -> Result<AiAnswer, LlmError> {
        let prompt = format!(
            "Based on the search results below, answer the query \"{query}\".\n\n\
             Search results:\n{context}\n\
             Reply in exactly this format:\n\
             ANSWER: <direct answer>\n\
             EVIDENCE: <supporting evidence from the sources>\n\
             CONFIDENCE: <number between 0.0 and 1.0>\n\
             REASONING: <brief explanation>",
            context = prepare_context(results),
        );
        let text = self
            .complete(
                "You are an expert research assistant that gives accurate, evidence-based answers.",
                &prompt,
                self.config.max_tokens,
                ANSWER_TEMPERATURE,
            )
            .await?;
        Ok(AiAnswer::parse(&text, results))
    }

    /// Suggest up to five related queries, one per line of the reply.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] if the client is not configured or the request
    /// fails.
    pub async fn suggest(&self, query: &str) -> Result<Vec<String>, LlmError> {
        let prompt = format!(
            "Suggest {MAX_SUGGESTIONS} related search queries for \"{query}\". Make them specific \
             and different from the original query. Put one query per line with no other text."
        );
        let text = self
            .complete(
                "You are a search assistant that suggests helpful queries.",
                &prompt,
                SUGGESTION_MAX_TOKENS,
                SUGGESTION_TEMPERATURE,
            )
            .await?;
        Ok(parse_suggestions(&text))
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String, LlmError> {
        let api_key = self.api_key().ok_or(LlmError::NotConfigured)?;
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Request(format!("chat completion request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(format!("invalid chat completion response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| LlmError::Parse("chat completion had no content".into()))?;

        tracing::debug!(model = %self.config.model, chars = content.len(), "chat completion received");
        Ok(content)
    }
}

/// Numbered title/URL/snippet blocks for the top results.
fn prepare_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .take(CONTEXT_RESULTS)
        .enumerate()
        .map(|(i, r)| {
            format!(
                "Result {}:\nTitle: {}\nURL: {}\nContent: {}\n",
                i + 1,
                r.title,
                r.url,
                r.snippet
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Non-empty reply lines with list markers and quotes removed.
fn parse_suggestions(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .take(MAX_SUGGESTIONS)
        .map(str::to_owned)
        .collect()
}

/// Strip a leading `1.`, `2)`, `-`, `*` or `•` marker and surrounding quotes.
fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let after_digits = line.trim_start_matches(|c: char| c.is_ascii_digit());
    let line = match after_digits.strip_prefix(['.', ')']) {
        Some(rest) if after_digits.len() < line.len() => rest,
        _ => line,
    };
    line.trim_start_matches(['-', '*', '•'])
        .trim()
        .trim_matches('"')
        .trim()
}

/// Map an HTTP error status to the appropriate [`LlmError`].
fn map_http_error(status: reqwest::StatusCode, body: &str) -> LlmError {
    let message = extract_error_message(body);
    match status.as_u16() {
        401 | 403 => LlmError::Auth(message),
        429 => LlmError::Request(format!("rate limited: {message}")),
        code => LlmError::Provider(format!("HTTP {code}: {message}")),
    }
}

/// Extract an error message from an OpenAI error response body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use mawrid_search::SearchProvider;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn results(n: usize) -> Vec<SearchResult> {
        (0..n)
            .map(|i| {
                SearchResult::new(
                    SearchProvider::Serper,
                    i,
                    format!("Result {i}"),
                    format!("https://example.com/{i}"),
                    format!("snippet {i}"),
                )
            })
            .collect()
    }

    fn client_for(server: &MockServer) -> LlmClient {
        LlmClient::new(LlmConfig {
            base_url: server.uri(),
            api_key: Some("sk-test".into()),
            ..Default::default()
        })
        .unwrap()
    }

    fn completion(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        }))
    }

    #[test]
    fn parse_answer_reads_every_field() {
        let text = "ANSWER: Paris\nEVIDENCE: Result 1 says so\nCONFIDENCE: 0.9\nREASONING: Stated directly";
        let answer = AiAnswer::parse(text, &results(5));
        assert_eq!(answer.answer, "Paris");
        assert_eq!(answer.evidence, "Result 1 says so");
        assert!((answer.confidence - 0.9).abs() < f64::EPSILON);
        assert_eq!(answer.reasoning.as_deref(), Some("Stated directly"));
        assert_eq!(
            answer.sources,
            vec![
                "https://example.com/0",
                "https://example.com/1",
                "https://example.com/2"
            ]
        );
    }

    #[test]
    fn unparseable_confidence_becomes_half() {
        let answer = AiAnswer::parse("ANSWER: yes\nCONFIDENCE: high", &[]);
        assert!((answer.confidence - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn confidence_is_clamped() {
        let answer = AiAnswer::parse("ANSWER: yes\nCONFIDENCE: 7", &[]);
        assert!((answer.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_answer_line_uses_whole_reply() {
        let answer = AiAnswer::parse("  Just prose.  ", &results(1));
        assert_eq!(answer.answer, "Just prose.");
        assert!(answer.confidence.abs() < f64::EPSILON);
        assert!(answer.reasoning.is_none());
        assert_eq!(answer.sources.len(), 1);
    }

    #[test]
    fn fallback_answer_has_zero_confidence() {
        let answer = AiAnswer::fallback();
        assert_eq!(answer.answer, ANSWER_FALLBACK);
        assert!(answer.sources.is_empty());
        assert!(answer.confidence.abs() < f64::EPSILON);
    }

    #[test]
    fn suggestions_strip_list_markers() {
        let parsed = parse_suggestions("1. rust tutorial\n2) \"rust book\"\n\n- rust vs go\n* cargo\n• clippy\n6. extra");
        assert_eq!(
            parsed,
            vec!["rust tutorial", "rust book", "rust vs go", "cargo", "clippy"]
        );
        assert_eq!(strip_list_marker("2024 rust trends"), "2024 rust trends");
    }

    #[test]
    fn context_uses_top_five_results() {
        let context = prepare_context(&results(8));
        assert!(context.contains("Result 5:"));
        assert!(!context.contains("Result 6:"));
        assert!(context.contains("URL: https://example.com/4"));
    }

    #[test]
    fn extract_error_message_reads_openai_shape() {
        let body = r#"{"error":{"message":"Incorrect API key","type":"invalid_request_error"}}"#;
        assert_eq!(extract_error_message(body), "Incorrect API key");
        assert_eq!(extract_error_message("plain"), "plain");
    }

    #[tokio::test]
    async fn unconfigured_client_makes_no_request() {
        let client = LlmClient::new(LlmConfig::default()).unwrap();
        assert!(!client.is_configured());
        let err = client.summarize("q", &[]).await.unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured));
    }

    #[tokio::test]
    async fn disabled_client_ignores_key() {
        let client = LlmClient::new(LlmConfig {
            enabled: false,
            api_key: Some("sk-test".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(!client.is_configured());
        assert!(!client.augments_suggestions());
    }

    #[tokio::test]
    async fn summarize_posts_chat_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-3.5-turbo",
                "max_tokens": 1000,
                "temperature": 0.3
            })))
            .respond_with(completion("  Rust is a systems language.  "))
            .expect(1)
            .mount(&server)
            .await;

        let summary = client_for(&server)
            .summarize("what is rust", &results(3))
            .await
            .unwrap();
        assert_eq!(summary, "Rust is a systems language.");
    }

    #[tokio::test]
    async fn answer_parses_structured_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({"temperature": 0.2})))
            .respond_with(completion(
                "ANSWER: 42\nEVIDENCE: The guide\nCONFIDENCE: 0.75\nREASONING: Canon",
            ))
            .mount(&server)
            .await;

        let answer = client_for(&server)
            .answer("meaning of life", &results(4))
            .await
            .unwrap();
        assert_eq!(answer.answer, "42");
        assert_eq!(answer.sources.len(), 3);
        assert!((answer.confidence - 0.75).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn suggest_returns_at_most_five() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({"max_tokens": 200})))
            .respond_with(completion("a1\nb2\nc3\nd4\ne5\nf6\ng7"))
            .mount(&server)
            .await;

        let suggestions = client_for(&server).suggest("rust").await.unwrap();
        assert_eq!(suggestions, vec!["a1", "b2", "c3", "d4", "e5"]);
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).summarize("q", &[]).await.unwrap_err();
        assert!(matches!(err, LlmError::Auth(ref m) if m.contains("Incorrect API key")));
    }

    #[tokio::test]
    async fn server_error_maps_to_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client_for(&server).summarize("q", &[]).await.unwrap_err();
        assert!(matches!(err, LlmError::Provider(ref m) if m.contains("500")));
    }

    #[tokio::test]
    async fn empty_choices_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client_for(&server).summarize("q", &[]).await.unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }
}
