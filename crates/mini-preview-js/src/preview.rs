//! The preview instance exposed to JavaScript.

use std::rc::Rc;

use mini_preview_browser::{Firing, InteractionCallback, Mode, PreviewApp};
use wasm_bindgen::prelude::*;

use crate::types::{JsFiring, JsMountOptions};

/// A mounted live preview.
///
/// Owns the page listeners and the render socket; `free()` detaches them.
#[wasm_bindgen]
pub struct JsPreview {
    app: PreviewApp,
}

#[wasm_bindgen]
impl JsPreview {
    /// Mount onto the current page.
    ///
    /// `options` may be omitted to use the default element ids. When given,
    /// `onInteraction` receives each click and insertion firing.
    #[wasm_bindgen(constructor)]
    pub fn new(
        options: JsValue,
        on_interaction: Option<js_sys::Function>,
    ) -> Result<JsPreview, JsError> {
        let options: JsMountOptions = if options.is_undefined() || options.is_null() {
            JsMountOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| JsError::new(&format!("Invalid mount options: {}", e)))?
        };
        let callback = on_interaction.map(js_callback);
        let app = PreviewApp::mount(options.into_mount_options()?, callback)?;
        Ok(Self { app })
    }

    /// Identifiers of every mode, in display order.
    #[wasm_bindgen(js_name = modes)]
    pub fn modes() -> Vec<String> {
        Mode::all().map(|mode| mode.identifier().to_string()).collect()
    }

    /// The active mode's identifier.
    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        self.app.mode().identifier().to_string()
    }

    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&self, mode: &str) -> Result<(), JsError> {
        let mode: Mode = mode.parse()?;
        self.app.switch_mode(mode);
        Ok(())
    }

    #[wasm_bindgen(js_name = getInput)]
    pub fn input(&self) -> String {
        self.app.context().borrow().input().to_string()
    }

    /// Replace the editor text and render it.
    #[wasm_bindgen(js_name = setInput)]
    pub fn set_input(&self, text: &str) {
        self.app.set_input(text);
    }

    /// `connecting`, `open`, `closed` or `errored`.
    #[wasm_bindgen(getter, js_name = connectionState)]
    pub fn connection_state(&self) -> String {
        self.app.connection_state().to_string()
    }
}

fn js_callback(function: js_sys::Function) -> InteractionCallback {
    Rc::new(move |firing: &Firing| {
        let value = match serde_wasm_bindgen::to_value(&JsFiring::from(firing)) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "failed to convert firing");
                return;
            }
        };
        if let Err(e) = function.call1(&JsValue::NULL, &value) {
            tracing::warn!(error = ?e, "interaction callback threw");
        }
    })
}
