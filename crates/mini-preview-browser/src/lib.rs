//! Browser DOM layer for the MiniMessage preview.
//!
//! This crate wires `mini-preview-core` to a page. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `attributes`: reading interaction attributes off DOM elements
//! - `output`: the output container; builds the interaction tree as lines land
//! - `socket`: `WebSocket` transport for the render channel
//! - `gestures`: click / mouseover / mouseout / mousemove handling
//! - `app`: mounting everything onto the page
//!
//! # Re-exports
//!
//! This crate re-exports `mini-preview-core` for convenience, so consumers
//! only need to depend on `mini-preview-browser`.

// Re-export core crate
pub use mini_preview_core;
pub use mini_preview_core::*;

pub mod app;
pub mod attributes;
pub mod gestures;
pub mod output;
pub mod socket;

use std::cell::RefCell;
use std::rc::Rc;

pub use app::{InteractionCallback, ModeView, MountOptions, PreviewApp};
pub use attributes::{
    DATA_NODE_ID, ElementAttributes, component_element, is_component, node_id_of,
};
pub use gestures::Tooltip;
pub use output::BrowserOutput;
pub use socket::{JsFailure, WebSocketTransport};

/// The preview context as used in the browser.
pub type BrowserContext = PreviewContext<WebSocketTransport, BrowserOutput>;

/// Shared handle given to every event closure. The browser runs one handler
/// at a time, so a `RefCell` is all the exclusion needed.
pub type SharedContext = Rc<RefCell<BrowserContext>>;
