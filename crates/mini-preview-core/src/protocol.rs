//! Wire types for the `mini-to-html` WebSocket endpoint.
//!
//! Requests are `{"miniMessage": "..."}`; responses wrap a parse result:
//! `{"parseResult": {"success": true, "dom": "..."}}` or
//! `{"parseResult": {"success": false, "errorMessage": "..."}}`.

use serde::{Deserialize, Serialize};

/// A render request: the transformed, newline-joined input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub mini_message: String,
}

impl Call {
    pub fn new(mini_message: impl Into<String>) -> Self {
        Self {
            mini_message: mini_message.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A message from the rendering service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_result: Option<ParseResult>,
}

impl Response {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Raw parse result as sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ParseResult {
    pub fn success(dom: impl Into<String>) -> Self {
        Self {
            success: true,
            dom: Some(dom.into()),
            error_message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            dom: None,
            error_message: Some(message.into()),
        }
    }

    /// The typed result, or `None` if the flag and payload fields disagree.
    pub fn into_render_response(self) -> Option<RenderResponse> {
        match (self.success, self.dom, self.error_message) {
            (true, Some(dom), _) => Some(RenderResponse::Success(dom)),
            (false, _, Some(message)) => Some(RenderResponse::Failure(message)),
            _ => None,
        }
    }
}

/// A render result: exactly one of rendered markup or an error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderResponse {
    Success(String),
    Failure(String),
}
