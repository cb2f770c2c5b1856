//! Wire types for the model host daemon.
//!
//! Both dialects share the session/prompt bodies; they differ in how the
//! capability query is exposed (`capabilities` vs the older `availability`
//! convention) and in whether streaming and session deletion exist.

use nanochat_domain::{ChatMessage, Role, SessionParams};
use serde::{Deserialize, Serialize};

/// API surface names advertised in [`HostInfo::apis`].
pub const SURFACE_CAPABILITIES: &str = "capabilities";
pub const SURFACE_AVAILABILITY: &str = "availability";

/// Response of `GET /api/info`.
#[derive(Debug, Clone, Deserialize)]
pub struct HostInfo {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub apis: Vec<String>,
}

/// Response of the modern capability query (`GET /v2/model/capabilities`).
#[derive(Debug, Deserialize)]
pub struct CapabilitiesResponse {
    pub status: String,
}

/// Response of the legacy availability query (`GET /model/availability`).
#[derive(Debug, Deserialize)]
pub struct AvailabilityResponse {
    pub available: String,
}

#[derive(Debug, Serialize)]
pub struct WirePrompt {
    pub role: String,
    pub content: String,
}

impl From<&ChatMessage> for WirePrompt {
    fn from(message: &ChatMessage) -> Self {
        let role = match message.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        Self {
            role: role.to_string(),
            content: message.content.clone(),
        }
    }
}

/// Body of the session creation call, shared by both dialects.
#[derive(Debug, Serialize)]
pub struct CreateSessionBody {
    pub temperature: f32,
    pub top_k: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub initial_prompts: Vec<WirePrompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_language: Option<String>,
}

impl From<&SessionParams> for CreateSessionBody {
    fn from(params: &SessionParams) -> Self {
        Self {
            temperature: params.temperature,
            top_k: params.top_k,
            initial_prompts: params.initial_prompts.iter().map(WirePrompt::from).collect(),
            expected_language: params.expected_language.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SessionCreated {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct PromptBody {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct PromptResponse {
    pub text: String,
}

/// One NDJSON line of a streaming prompt response.
#[derive(Debug, Deserialize)]
pub struct StreamLine {
    #[serde(default)]
    pub delta: String,
    #[serde(default)]
    pub done: bool,
    pub error: Option<WireError>,
}

#[derive(Debug, Deserialize)]
pub struct WireError {
    pub code: String,
    pub message: String,
}

/// Structured error payload on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: WireError,
}

/// Drain complete newline-terminated lines from a byte buffer, leaving any
/// trailing partial line in place.
pub fn drain_lines(buf: &mut Vec<u8>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
        let line: Vec<u8> = buf.drain(..=pos).collect();
        let text = String::from_utf8_lossy(&line).trim().to_string();
        if !text.is_empty() {
            lines.push(text);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanochat_domain::ChatMessage;

    #[test]
    fn create_session_body_omits_empty_fields() {
        let params = SessionParams::new(0.5, 40);
        let body = CreateSessionBody::from(&params);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["top_k"], 40);
        assert!(json.get("initial_prompts").is_none());
        assert!(json.get("expected_language").is_none());
    }

    #[test]
    fn create_session_body_serializes_seeded_prompts() {
        let params = SessionParams::new(0.7, 40).with_initial_prompts(vec![
            ChatMessage::user("earlier question"),
            ChatMessage::assistant("earlier answer"),
        ]);
        let json = serde_json::to_value(CreateSessionBody::from(&params)).unwrap();
        let prompts = json["initial_prompts"].as_array().unwrap();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0]["role"], "user");
        assert_eq!(prompts[1]["role"], "assistant");
    }

    #[test]
    fn stream_line_parses_delta_and_done() {
        let line: StreamLine = serde_json::from_str(r#"{"delta":"Hel","done":false}"#).unwrap();
        assert_eq!(line.delta, "Hel");
        assert!(!line.done);

        let end: StreamLine = serde_json::from_str(r#"{"done":true}"#).unwrap();
        assert!(end.done);
        assert!(end.delta.is_empty());
    }

    #[test]
    fn drain_lines_keeps_partial_tail() {
        let mut buf = b"{\"delta\":\"a\"}\n{\"delta\":\"b\"}\n{\"del".to_vec();
        let lines = drain_lines(&mut buf);
        assert_eq!(lines, vec!["{\"delta\":\"a\"}", "{\"delta\":\"b\"}"]);
        assert_eq!(buf, b"{\"del".to_vec());

        buf.extend_from_slice(b"ta\":\"c\"}\n");
        let rest = drain_lines(&mut buf);
        assert_eq!(rest, vec!["{\"delta\":\"c\"}"]);
        assert!(buf.is_empty());
    }

    #[test]
    fn drain_lines_skips_blank_lines() {
        let mut buf = b"\n\n{\"done\":true}\n".to_vec();
        let lines = drain_lines(&mut buf);
        assert_eq!(lines, vec!["{\"done\":true}"]);
    }
}
