//! Presentation modes.
//!
//! A mode decides how the preview looks (CSS class), how much of the input is
//! rendered, and which interactions the rendered output reacts to. The set of
//! modes is fixed; exactly one is active at a time and it is owned by
//! [`PreviewContext`](crate::PreviewContext).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownMode;
use crate::interaction::{InteractionSet, InteractionType};

/// A presentation mode for the preview pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Chat with the input box open: everything is interactive.
    #[default]
    ChatOpen,
    /// Chat with the input box closed: at most ten lines, no interaction.
    ChatClosed,
    /// Item lore tooltip.
    Lore,
    /// Floating hologram text.
    Hologram,
    /// Server list entry: a fixed header plus two lines of MOTD.
    ServerList,
}

impl Mode {
    /// Every mode, in display order.
    pub const ALL: [Mode; 5] = [
        Mode::ChatOpen,
        Mode::ChatClosed,
        Mode::Lore,
        Mode::Hologram,
        Mode::ServerList,
    ];

    /// Mode used when nothing (or nothing valid) was requested.
    pub const DEFAULT: Mode = Mode::ChatOpen;

    /// Iterate over every mode. Restartable; used to repaint mode CSS classes.
    pub fn all() -> impl Iterator<Item = Mode> + Clone {
        Self::ALL.into_iter()
    }

    /// Stable identifier used in URLs and `data-mode` attributes.
    pub const fn identifier(self) -> &'static str {
        match self {
            Mode::ChatOpen => "chat_open",
            Mode::ChatClosed => "chat_closed",
            Mode::Lore => "lore",
            Mode::Hologram => "hologram",
            Mode::ServerList => "server_list",
        }
    }

    /// CSS class applied to the output elements while this mode is active.
    pub const fn css_class(self) -> &'static str {
        match self {
            Mode::ChatOpen => "mode-chat-open",
            Mode::ChatClosed => "mode-chat-closed",
            Mode::Lore => "mode-lore",
            Mode::Hologram => "mode-hologram",
            Mode::ServerList => "mode-server-list",
        }
    }

    /// Maximum number of lines sent to the renderer. `None` means unlimited.
    pub const fn max_lines(self) -> Option<usize> {
        match self {
            Mode::ChatClosed => Some(10),
            Mode::ServerList => Some(3),
            Mode::ChatOpen | Mode::Lore | Mode::Hologram => None,
        }
    }

    /// Interactions the rendered output responds to in this mode.
    pub const fn enabled_interactions(self) -> InteractionSet {
        match self {
            Mode::ChatOpen => InteractionSet::ALL,
            Mode::ServerList => InteractionSet::only(InteractionType::Hover),
            Mode::ChatClosed | Mode::Lore | Mode::Hologram => InteractionSet::EMPTY,
        }
    }

    /// Chat-style modes keep the output scrolled to the newest line.
    pub const fn is_conversation(self) -> bool {
        matches!(self, Mode::ChatOpen | Mode::ChatClosed)
    }

    /// Whether an empty input is still rendered. The server list always has
    /// its header to show; every other mode just clears the output.
    pub const fn renders_empty_input(self) -> bool {
        matches!(self, Mode::ServerList)
    }

    /// Lenient lookup: unknown or missing identifiers fall back to [`Mode::DEFAULT`].
    pub fn from_identifier(id: Option<&str>) -> Mode {
        id.and_then(|id| id.parse().ok()).unwrap_or(Mode::DEFAULT)
    }
}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::all()
            .find(|mode| mode.identifier() == s)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Serialize)]
    struct ModeRow {
        identifier: &'static str,
        css_class: &'static str,
        max_lines: Option<usize>,
        interactions: Vec<InteractionType>,
    }

    #[test]
    fn test_mode_table() {
        let rows: Vec<_> = Mode::all()
            .map(|mode| ModeRow {
                identifier: mode.identifier(),
                css_class: mode.css_class(),
                max_lines: mode.max_lines(),
                interactions: mode.enabled_interactions().iter().collect(),
            })
            .collect();

        insta::assert_yaml_snapshot!(rows, @r"
        - identifier: chat_open
          css_class: mode-chat-open
          max_lines: ~
          interactions:
            - click
            - hover
            - insertion
        - identifier: chat_closed
          css_class: mode-chat-closed
          max_lines: 10
          interactions: []
        - identifier: lore
          css_class: mode-lore
          max_lines: ~
          interactions: []
        - identifier: hologram
          css_class: mode-hologram
          max_lines: ~
          interactions: []
        - identifier: server_list
          css_class: mode-server-list
          max_lines: 3
          interactions:
            - hover
        ");
    }

    #[test]
    fn test_from_identifier_known() {
        for mode in Mode::all() {
            assert_eq!(Mode::from_identifier(Some(mode.identifier())), mode);
        }
    }

    #[test]
    fn test_from_identifier_falls_back() {
        assert_eq!(Mode::from_identifier(None), Mode::DEFAULT);
        assert_eq!(Mode::from_identifier(Some("")), Mode::DEFAULT);
        assert_eq!(Mode::from_identifier(Some("CHAT_CLOSED")), Mode::DEFAULT);
        assert_eq!(Mode::from_identifier(Some("nonsense")), Mode::DEFAULT);
    }

    #[test]
    fn test_strict_parse() {
        assert_eq!("lore".parse::<Mode>().unwrap(), Mode::Lore);
        let err = "book".parse::<Mode>().unwrap_err();
        assert_eq!(err.0, "book");
    }

    #[test]
    fn test_all_is_restartable() {
        let modes = Mode::all();
        assert_eq!(modes.clone().count(), 5);
        assert_eq!(modes.count(), 5);
    }

    #[test]
    fn test_serde_uses_identifier() {
        let json = serde_json::to_string(&Mode::ServerList).unwrap();
        assert_eq!(json, "\"server_list\"");
        let mode: Mode = serde_json::from_str("\"chat_closed\"").unwrap();
        assert_eq!(mode, Mode::ChatClosed);
    }

    #[test]
    fn test_conversation_modes() {
        assert!(Mode::ChatOpen.is_conversation());
        assert!(Mode::ChatClosed.is_conversation());
        assert!(!Mode::ServerList.is_conversation());
        assert!(!Mode::Lore.is_conversation());
    }
}
