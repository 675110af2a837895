use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{check_status, VendorError};
use crate::config::VendorConfig;

pub const SYSTEM_PROMPT: &str = "You are Durmah, an AI study assistant for university law students. \
You provide educational guidance, explain legal concepts, and help with understanding case law and statutes.

STRICT GUIDELINES:
1. NEVER complete assignments or provide ready-made answers
2. Always encourage critical thinking and provide guidance, not solutions
3. Cite relevant cases, statutes, and legal principles when appropriate
4. Maintain academic integrity: help students learn, not cheat
5. If asked to write essays or complete assignments, politely decline and offer to explain concepts instead
6. Always provide sources when discussing legal principles
7. Acknowledge when topics require further research or legal advice";

pub const INTEGRITY_REFUSAL: &str = "I can't help with that request as it may violate academic integrity policies. \
Instead, I can explain concepts, provide study guidance, or help you understand legal principles. How can I help you learn?";

const EMPTY_COMPLETION: &str = "I apologize, but I couldn't generate a response. Please try again.";

const FLAGGED_TERMS: &[&str] = &[
    "plagiarism",
    "cheat",
    "do my homework",
    "write my essay",
    "complete assignment for me",
    "solve this for me",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default = "default_role")]
    pub role: String,
    pub content: String,
}

fn default_role() -> String {
    "user".to_string()
}

/// Reference citation attached to a chat answer
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Source {
    pub title: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub citation: &'static str,
    pub url: &'static str,
}

/// Academic-integrity guard over a user message
pub fn is_flagged(text: &str) -> bool {
    let lower = text.to_lowercase();
    FLAGGED_TERMS.iter().any(|term| lower.contains(term))
}

pub fn sources_for(text: &str) -> Vec<Source> {
    let lower = text.to_lowercase();
    let mut sources = Vec::new();
    if lower.contains("contract") {
        sources.push(Source {
            title: "Carlill v Carbolic Smoke Ball Co",
            kind: "case",
            citation: "[1893] 1 QB 256",
            url: "https://www.bailii.org/ew/cases/EWCA/Civ/1892/1.html",
        });
    }
    if lower.contains("tort") {
        sources.push(Source {
            title: "Donoghue v Stevenson",
            kind: "case",
            citation: "[1932] UKHL 100",
            url: "https://www.bailii.org/uk/cases/UKHL/1932/100.html",
        });
    }
    if lower.contains("constitution") {
        sources.push(Source {
            title: "Constitutional Reform Act 2005",
            kind: "statute",
            citation: "2005 c. 4",
            url: "https://www.legislation.gov.uk/ukpga/2005/4",
        });
    }
    sources
}

/// Vendor request body: system prompt first, then the caller's turns
pub fn completion_request(config: &VendorConfig, messages: &[ChatMessage], stream: bool) -> Value {
    let mut turns = Vec::with_capacity(messages.len() + 1);
    turns.push(json!({ "role": "system", "content": SYSTEM_PROMPT }));
    turns.extend(messages.iter().map(|m| json!({ "role": m.role, "content": m.content })));

    json!({
        "model": config.chat_model,
        "messages": turns,
        "max_tokens": config.chat_max_tokens,
        "temperature": config.chat_temperature,
        "presence_penalty": 0.1,
        "frequency_penalty": 0.1,
        "stream": stream,
    })
}

async fn send(
    http: &reqwest::Client,
    config: &VendorConfig,
    messages: &[ChatMessage],
    stream: bool,
) -> Result<reqwest::Response, VendorError> {
    let api_key = config
        .openai_api_key
        .as_deref()
        .ok_or(VendorError::NotConfigured("OPENAI_API_KEY"))?;

    let resp = http
        .post(format!("{}/v1/chat/completions", config.openai_base_url))
        .bearer_auth(api_key)
        .json(&completion_request(config, messages, stream))
        .send()
        .await?;
    check_status(resp).await
}

/// Non-streaming completion; returns the assistant text
pub async fn complete(
    http: &reqwest::Client,
    config: &VendorConfig,
    messages: &[ChatMessage],
) -> Result<String, VendorError> {
    let resp = send(http, config, messages, false).await?;
    let body: Value = resp.json().await.map_err(|e| VendorError::Decode(e.to_string()))?;
    let answer = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(EMPTY_COMPLETION);
    Ok(answer.to_string())
}

/// Streaming completion; the caller relays the SSE body as-is
pub async fn complete_stream(
    http: &reqwest::Client,
    config: &VendorConfig,
    messages: &[ChatMessage],
) -> Result<reqwest::Response, VendorError> {
    send(http, config, messages, true).await
}
