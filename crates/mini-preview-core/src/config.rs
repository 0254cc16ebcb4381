//! Preview configuration.
//!
//! Settings are layered: a `.json` or `.toml` file (or the defaults), then
//! the `MINI_PREVIEW_*` environment variables, then explicit overrides such
//! as command-line flags. In the browser the endpoint is derived from the
//! page's host instead.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::mode::Mode;

pub const URL_API: &str = "/api";
pub const URL_MINI_TO_HTML: &str = "/mini-to-html";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// WebSocket endpoint of the rendering service.
    pub endpoint: Url,
    /// Mode to start in.
    pub mode: Mode,
}

impl PreviewConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "ws://localhost:8080/api/mini-to-html";

    /// Load the configuration from a `.json` or `.toml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let read = || {
            std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        };

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&read()?).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            }),
            Some("toml") => toml::from_str(&read()?).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            }),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Apply overrides from environment variables.
    ///
    /// Optional env vars:
    /// - `MINI_PREVIEW_ENDPOINT`: renderer WebSocket URL
    /// - `MINI_PREVIEW_MODE`: mode identifier (strict; unknown modes are an error)
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(
            std::env::var("MINI_PREVIEW_ENDPOINT").ok().as_deref(),
            std::env::var("MINI_PREVIEW_MODE").ok().as_deref(),
        )
    }

    /// Apply optional endpoint and mode overrides.
    pub fn with_overrides(
        mut self,
        endpoint: Option<&str>,
        mode: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(endpoint) = endpoint {
            self.endpoint = parse_url(endpoint)?;
        }
        if let Some(mode) = mode {
            self.mode = mode.parse()?;
        }
        Ok(self)
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(Self::DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            mode: Mode::DEFAULT,
        }
    }
}

fn parse_url(url: &str) -> Result<Url, ConfigError> {
    Url::parse(url).map_err(|e| ConfigError::UrlParse {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// The renderer endpoint for a page served from `host` (`hostname[:port]`).
///
/// Local development servers don't terminate TLS, so `localhost` and
/// `127.0.0.1` get plain `ws`; everything else uses `wss`.
pub fn endpoint_for_host(host: &str, hostname: &str) -> Result<Url, ConfigError> {
    let scheme = match hostname {
        "localhost" | "127.0.0.1" => "ws",
        _ => "wss",
    };
    parse_url(&format!("{scheme}://{host}{URL_API}{URL_MINI_TO_HTML}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = PreviewConfig::default();
        assert_eq!(config.endpoint.as_str(), PreviewConfig::DEFAULT_ENDPOINT);
        assert_eq!(config.mode, Mode::ChatOpen);
    }

    #[test]
    fn test_endpoint_for_host() {
        assert_eq!(
            endpoint_for_host("localhost:8080", "localhost").unwrap().as_str(),
            "ws://localhost:8080/api/mini-to-html"
        );
        assert_eq!(
            endpoint_for_host("127.0.0.1", "127.0.0.1").unwrap().as_str(),
            "ws://127.0.0.1/api/mini-to-html"
        );
        assert_eq!(
            endpoint_for_host("webui.example.net", "webui.example.net")
                .unwrap()
                .as_str(),
            "wss://webui.example.net/api/mini-to-html"
        );
    }

    #[test]
    fn test_overrides() {
        let config = PreviewConfig::default()
            .with_overrides(Some("wss://render.example/api/mini-to-html"), Some("lore"))
            .unwrap();
        assert_eq!(config.endpoint.host_str(), Some("render.example"));
        assert_eq!(config.mode, Mode::Lore);

        let err = PreviewConfig::default()
            .with_overrides(None, Some("book"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Mode(_)));

        let err = PreviewConfig::default()
            .with_overrides(Some("not a url"), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::UrlParse { .. }));
    }

    #[test]
    fn test_load_json_and_toml() {
        let dir = std::env::temp_dir().join(format!("mini-preview-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let json = dir.join("preview.json");
        std::fs::write(&json, r#"{"mode":"server_list"}"#).unwrap();
        let config = PreviewConfig::load(&json).unwrap();
        assert_eq!(config.mode, Mode::ServerList);
        assert_eq!(config.endpoint.as_str(), PreviewConfig::DEFAULT_ENDPOINT);

        let toml = dir.join("preview.toml");
        std::fs::write(
            &toml,
            "endpoint = \"wss://render.example/api/mini-to-html\"\nmode = \"hologram\"\n",
        )
        .unwrap();
        let config = PreviewConfig::load(&toml).unwrap();
        assert_eq!(config.mode, Mode::Hologram);
        assert_eq!(config.endpoint.scheme(), "wss");

        let yaml = dir.join("preview.yaml");
        assert!(matches!(
            PreviewConfig::load(&yaml),
            Err(ConfigError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            PreviewConfig::load(dir.join("missing.json")),
            Err(ConfigError::Read { .. })
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
