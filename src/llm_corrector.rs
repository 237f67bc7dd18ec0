//! Chat-completion client that suggests a corrected command.
//!
//! One request per invocation, no retries, no conversation state. Every
//! transport or parse failure collapses to "no suggestion" after being
//! reported once to standard error.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::http_client::{HttpClient, ReqwestHttpClient};

/// System instruction constraining the assistant to emit only the command.
const SYSTEM_PROMPT: &str = "You are a helpful assistant that fixes bash commands. \
    Provide only the fixed command without any additional explanation.";

/// Fixed margin added to the input length for the completion token budget.
const TOKEN_MARGIN: usize = 20;

/// One role/content pair in the conversation payload.
#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Request body for the chat-completion endpoint.
#[derive(Debug, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl CompletionRequest {
    /// Builds the single-shot correction request for `command`.
    ///
    /// The token budget tracks the input length plus a small margin, and
    /// the temperature is pinned to zero so repeated runs are
    /// deterministic.
    pub fn for_command(model: &str, command: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!("Fix this bash command: {command}"),
                },
            ],
            max_tokens: command.chars().count() + TOKEN_MARGIN,
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// A service that suggests a corrected form of a shell command.
#[async_trait]
pub trait Corrector: Send + Sync {
    /// Returns the corrected command, or `None` when no fix is available.
    async fn fix_command(&self, command: &str) -> Option<String>;
}

/// Production corrector backed by an OpenAI-style completion endpoint.
pub struct LlmCorrector {
    http: Box<dyn HttpClient>,
    api_key: String,
    api_base: String,
    model: String,
}

impl LlmCorrector {
    /// Builds a corrector from the loaded configuration.
    ///
    /// Fails when no API key is configured. This is the only fatal path in
    /// the client and it fires before any network attempt.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.get_api_key().ok_or_else(|| {
            anyhow!(
                "No OpenAI API key found. Please set it using one of these methods:\n\
                 \n\
                 1. Set environment variable:\n\
                    export FLEM_OPENAI_API_KEY=sk-your-key-here\n\
                 \n\
                 2. Set API key in config:\n\
                    flem --set-api-key sk-your-key-here\n\
                 \n\
                 3. Check current config:\n\
                    flem --config"
            )
        })?;

        Ok(Self::with_http_client(
            Box::new(ReqwestHttpClient::new()),
            api_key.clone(),
            config.get_api_base().to_string(),
            config.get_model().to_string(),
        ))
    }

    /// Corrector with an injected transport (used by tests).
    pub fn with_http_client(
        http: Box<dyn HttpClient>,
        api_key: String,
        api_base: String,
        model: String,
    ) -> Self {
        Self {
            http,
            api_key,
            api_base,
            model,
        }
    }

    async fn request_fix(&self, command: &str) -> Result<String> {
        let request = CompletionRequest::for_command(&self.model, command);
        let body = serde_json::to_value(&request)?;
        let url = format!("{}/chat/completions", self.api_base);
        let bearer = format!("Bearer {}", self.api_key);

        let response_text = self
            .http
            .post_json(
                &url,
                &[
                    ("Content-Type", "application/json"),
                    ("Authorization", &bearer),
                ],
                &body,
            )
            .await?;

        parse_suggestion(&response_text)
    }
}

#[async_trait]
impl Corrector for LlmCorrector {
    async fn fix_command(&self, command: &str) -> Option<String> {
        info!("Asking {} for a fix to: {}", self.model, command);

        match self.request_fix(command).await {
            Ok(fixed) => Some(fixed),
            Err(e) => {
                eprintln!("Error asking the completion service for a fix: {}", e);
                None
            }
        }
    }
}

/// Extracts the suggestion from the first completion choice, trimmed.
fn parse_suggestion(response_text: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(response_text).map_err(|e| {
        warn!("unparseable completion response: {}", response_text);
        anyhow!("failed to parse the completion response: {}", e)
    })?;

    let content = response
        .choices
        .first()
        .and_then(|choice| choice.message.content.as_deref())
        .ok_or_else(|| anyhow!("completion response carried no message content"))?;

    let suggestion = content.trim();
    if suggestion.is_empty() {
        return Err(anyhow!("completion service returned an empty suggestion"));
    }
    Ok(suggestion.to_string())
}

/// Deterministic corrector used when `FLEM_USE_MOCK=1`.
///
/// Repairs a small table of classic typos, returns anything else unchanged,
/// and offers no fix for comment lines, so integration tests can exercise
/// the full flow offline.
pub struct MockCorrector;

impl MockCorrector {
    pub fn new() -> Self {
        Self
    }

    fn mock_fix(&self, command: &str) -> Option<String> {
        let trimmed = command.trim();

        // A comment has nothing to fix.
        if trimmed.starts_with('#') {
            return None;
        }

        let (head, rest) = match trimmed.split_once(' ') {
            Some((head, rest)) => (head, Some(rest)),
            None => (trimmed, None),
        };

        let fixed_head = match head {
            "sl" => "ls",
            "gti" => "git",
            "grpe" => "grep",
            "pdw" => "pwd",
            "cd.." => "cd ..",
            _ => return Some(trimmed.to_string()),
        };

        Some(match rest {
            Some(rest) => format!("{fixed_head} {rest}"),
            None => fixed_head.to_string(),
        })
    }
}

impl Default for MockCorrector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Corrector for MockCorrector {
    async fn fix_command(&self, command: &str) -> Option<String> {
        info!("Using mock corrector for: {}", command);
        self.mock_fix(command)
    }
}
