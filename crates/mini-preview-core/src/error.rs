//! Error types for the preview pipeline.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::channel::ConnectionState;

/// Top-level error type for preview operations
#[derive(Debug, Error, Diagnostic)]
pub enum PreviewError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// IO error
    #[error(transparent)]
    #[diagnostic(code(mini_preview::io))]
    Io(#[from] std::io::Error),
}

/// Render channel errors
#[derive(Debug, Error, Diagnostic)]
pub enum ChannelError {
    #[error("render channel is {state}, not open")]
    #[diagnostic(
        code(mini_preview::channel::not_open),
        help("wait for the connection to open before submitting input")
    )]
    NotOpen { state: ConnectionState },

    #[error("failed to encode render request")]
    #[diagnostic(code(mini_preview::channel::encode))]
    Encode(#[source] serde_json::Error),

    #[error("failed to send render request")]
    #[diagnostic(code(mini_preview::channel::send))]
    Send(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to connect to {endpoint}")]
    #[diagnostic(code(mini_preview::channel::connect))]
    Connect {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("render channel closed before a response arrived")]
    #[diagnostic(code(mini_preview::channel::closed))]
    Closed,
}

/// Configuration errors
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    #[diagnostic(code(mini_preview::config::io))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in config file {}", path.display())]
    #[diagnostic(code(mini_preview::config::json))]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid TOML in config file {}", path.display())]
    #[diagnostic(code(mini_preview::config::toml))]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported config format: {}", path.display())]
    #[diagnostic(
        code(mini_preview::config::format),
        help("use a .json or .toml file")
    )]
    UnsupportedFormat { path: PathBuf },

    #[error("invalid URL {url:?}: {message}")]
    #[diagnostic(code(mini_preview::config::url))]
    UrlParse { url: String, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Mode(#[from] UnknownMode),
}

/// Strict mode lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("unknown mode {0:?}")]
#[diagnostic(
    code(mini_preview::mode),
    help("expected one of: chat_open, chat_closed, lore, hologram, server_list")
)]
pub struct UnknownMode(pub String);
