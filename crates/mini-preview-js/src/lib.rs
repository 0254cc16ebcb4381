//! WASM bindings for the MiniMessage live preview.
//!
//! Mounts the preview onto a host page and exposes mode and input control
//! to JavaScript. Click and insertion firings are handed back to the page
//! through a callback so it can present them however it likes.

mod preview;
mod types;

pub use preview::*;
pub use types::*;

use tracing::Level;
use wasm_bindgen::prelude::*;

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    console_error_panic_hook::set_once();

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    // Already set if the host initialised twice.
    let _ = set_global_default(Registry::default().with(wasm_layer));
}
