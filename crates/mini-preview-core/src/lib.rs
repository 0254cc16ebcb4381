//! mini-preview-core: the live-render pipeline and interaction engine for the
//! MiniMessage web preview, without any browser or runtime dependencies.
//!
//! This crate provides:
//! - `Mode` - presentation modes and their static properties
//! - `input` - turning raw editor text into the lines sent to the renderer
//! - `protocol` - the JSON wire types exchanged with the rendering service
//! - `RenderChannel` - connection state, submission and response application,
//!   generic over a `Transport` and an `OutputSurface`
//! - `InteractionTree` + `dispatch` - click/hover/insertion resolution over
//!   the rendered output's ancestor chains
//! - `PreviewContext` - the single owner of all mutable preview state
//!
//! Platform layers (`mini-preview-browser`, `mini-preview-cli`) implement the
//! transport and output traits.

pub mod channel;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod input;
pub mod interaction;
pub mod mode;
pub mod params;
pub mod protocol;
pub mod tooltip;
pub mod tree;

pub use channel::{
    ApplyOutcome, ConnectionState, OutputSurface, RenderChannel, SubmitOutcome, Transport,
    TransportError, apply_parse_result,
};
pub use config::{PreviewConfig, endpoint_for_host};
pub use context::PreviewContext;
pub use dispatch::{Firing, Gesture, resolve_click, resolve_hover};
pub use error::{ChannelError, ConfigError, PreviewError, UnknownMode};
pub use input::{
    PLACEHOLDER, SERVER_LIST_HEADER, build_request, build_request_lines, join_request_lines,
    normalize_paste, split_lines,
};
pub use interaction::{
    AttributeSource, COMPONENT_CLASS, InteractionSet, InteractionType, NodeInteractions, Payload,
};
pub use mode::Mode;
pub use params::StartupParams;
pub use protocol::{Call, ParseResult, RenderResponse, Response};
pub use smol_str::SmolStr;
pub use url::Url;
pub use tooltip::{Size, TooltipPosition, place_tooltip};
pub use tree::{InteractionTree, NodeId};
