//! Startup parameters from the page URL.
//!
//! `?mode=<identifier>` picks the initial mode and `?input=<text>` carries
//! shared input text. Both are read once at startup.

use url::form_urlencoded;

use crate::mode::Mode;

pub const PARAM_MODE: &str = "mode";
pub const PARAM_INPUT: &str = "input";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StartupParams {
    pub mode: Mode,
    /// Shared input text, already decoded.
    pub input: Option<String>,
}

impl StartupParams {
    /// Parse a query string, with or without the leading `?`.
    ///
    /// Unknown modes fall back to the default mode; the first occurrence of
    /// each parameter wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut mode = None;
        let mut input = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                PARAM_MODE if mode.is_none() => mode = Some(value.into_owned()),
                PARAM_INPUT if input.is_none() => input = Some(value.into_owned()),
                _ => {}
            }
        }

        Self {
            mode: Mode::from_identifier(mode.as_deref()),
            input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query() {
        assert_eq!(StartupParams::from_query(""), StartupParams::default());
        assert_eq!(StartupParams::from_query("?"), StartupParams::default());
    }

    #[test]
    fn test_mode_and_input() {
        let params = StartupParams::from_query("?mode=server_list&input=%3Cred%3Ehi%0Athere");
        assert_eq!(params.mode, Mode::ServerList);
        assert_eq!(params.input.as_deref(), Some("<red>hi\nthere"));
    }

    #[test]
    fn test_unknown_mode_falls_back() {
        let params = StartupParams::from_query("mode=SERVER_LIST");
        assert_eq!(params.mode, Mode::DEFAULT);
        assert_eq!(params.input, None);
    }

    #[test]
    fn test_first_value_wins() {
        let params = StartupParams::from_query("input=a&input=b&mode=lore&mode=hologram");
        assert_eq!(params.input.as_deref(), Some("a"));
        assert_eq!(params.mode, Mode::Lore);
    }

    #[test]
    fn test_percent_sign_decoded_once() {
        let params = StartupParams::from_query("input=100%2525");
        assert_eq!(params.input.as_deref(), Some("100%25"));
    }
}
