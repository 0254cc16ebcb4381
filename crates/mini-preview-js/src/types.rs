//! Types exposed to JavaScript via wasm-bindgen.

use mini_preview_browser::{Firing, InteractionType, MountOptions, Payload, Url};
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

/// Element ids and endpoint for mounting. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsMountOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pane_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode_button_class: Option<String>,
    /// Renderer WebSocket URL; derived from the page location when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl JsMountOptions {
    pub fn into_mount_options(self) -> Result<MountOptions, JsError> {
        let defaults = MountOptions::default();
        let endpoint = self
            .endpoint
            .map(|endpoint| {
                Url::parse(&endpoint)
                    .map_err(|e| JsError::new(&format!("Invalid endpoint {endpoint}: {e}")))
            })
            .transpose()?;
        Ok(MountOptions {
            input_id: self.input_id.unwrap_or(defaults.input_id),
            output_id: self.output_id.unwrap_or(defaults.output_id),
            pane_id: self.pane_id.unwrap_or(defaults.pane_id),
            tooltip_id: self.tooltip_id.unwrap_or(defaults.tooltip_id),
            mode_button_class: self.mode_button_class.unwrap_or(defaults.mode_button_class),
            endpoint,
        })
    }
}

/// A fired interaction, ready for display.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsFiring {
    #[tsify(type = "\"click\" | \"hover\" | \"insertion\"")]
    pub kind: InteractionType,
    /// 0 is the span that was clicked.
    pub depth: usize,
    /// Heading, e.g. "Click Event".
    pub title: String,
    /// Body text, e.g. "Action: Open url, Content: https://…".
    pub message: String,
    #[tsify(type = "{ type: \"click\"; action: string; value: string } | { type: \"hover\" | \"insertion\"; text: string }")]
    pub payload: Payload,
}

impl From<&Firing> for JsFiring {
    fn from(firing: &Firing) -> Self {
        Self {
            kind: firing.kind(),
            depth: firing.depth,
            title: firing.payload.title().to_string(),
            message: firing.payload.to_string(),
            payload: firing.payload.clone(),
        }
    }
}
