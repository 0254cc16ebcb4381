//! Interaction classification.
//!
//! The renderer marks interactive spans with [`COMPONENT_CLASS`] and encodes
//! each interaction's payload in a fixed `data-*` attribute. This module reads
//! those attributes once, through [`AttributeSource`], into a small ordered
//! [`NodeInteractions`] mapping so gestures never touch raw strings again.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::mode::Mode;

/// Class carried by every span that takes part in interaction resolution.
pub const COMPONENT_CLASS: &str = "mm-component";

pub const DATA_CLICK_EVENT_ACTION: &str = "data-click-event-action";
pub const DATA_CLICK_EVENT_VALUE: &str = "data-click-event-value";
pub const DATA_HOVER_EVENT_SHOW_TEXT: &str = "data-hover-event-show-text";
pub const DATA_INSERTION: &str = "data-insertion";

/// A category of user-triggerable behaviour embedded in rendered markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Click,
    Hover,
    Insertion,
}

impl InteractionType {
    pub const ALL: [InteractionType; 3] = [
        InteractionType::Click,
        InteractionType::Hover,
        InteractionType::Insertion,
    ];

    /// Whether this interaction is active in `mode`.
    pub fn is_usable(self, mode: Mode) -> bool {
        mode.enabled_interactions().contains(self)
    }

    /// The attribute whose presence means the node carries this interaction.
    pub const fn attribute(self) -> &'static str {
        match self {
            InteractionType::Click => DATA_CLICK_EVENT_ACTION,
            InteractionType::Hover => DATA_HOVER_EVENT_SHOW_TEXT,
            InteractionType::Insertion => DATA_INSERTION,
        }
    }

    const fn bit(self) -> u8 {
        match self {
            InteractionType::Click => 1 << 0,
            InteractionType::Hover => 1 << 1,
            InteractionType::Insertion => 1 << 2,
        }
    }
}

/// A set of interaction types.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InteractionSet(u8);

impl InteractionSet {
    pub const EMPTY: InteractionSet = InteractionSet(0);
    pub const ALL: InteractionSet = InteractionSet(0b111);

    pub const fn only(kind: InteractionType) -> Self {
        InteractionSet(kind.bit())
    }

    pub const fn with(self, kind: InteractionType) -> Self {
        InteractionSet(self.0 | kind.bit())
    }

    pub const fn contains(self, kind: InteractionType) -> bool {
        self.0 & kind.bit() != 0
    }

    pub const fn intersection(self, other: InteractionSet) -> Self {
        InteractionSet(self.0 & other.0)
    }

    pub fn remove(&mut self, kind: InteractionType) {
        self.0 &= !kind.bit();
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in declaration order.
    pub fn iter(self) -> impl Iterator<Item = InteractionType> {
        InteractionType::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl FromIterator<InteractionType> for InteractionSet {
    fn from_iter<I: IntoIterator<Item = InteractionType>>(iter: I) -> Self {
        iter.into_iter()
            .fold(InteractionSet::EMPTY, |set, kind| set.with(kind))
    }
}

impl fmt::Debug for InteractionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Read access to a rendered node's attributes.
///
/// Implemented by the browser layer for DOM elements, and here for plain maps
/// and attribute slices.
pub trait AttributeSource {
    fn attribute(&self, name: &str) -> Option<String>;
}

impl AttributeSource for HashMap<String, String> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl AttributeSource for BTreeMap<String, String> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl AttributeSource for [(&str, &str)] {
    fn attribute(&self, name: &str) -> Option<String> {
        self.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    }
}

impl<const N: usize> AttributeSource for [(&str, &str); N] {
    fn attribute(&self, name: &str) -> Option<String> {
        self.as_slice().attribute(name)
    }
}

impl<T: AttributeSource + ?Sized> AttributeSource for &T {
    fn attribute(&self, name: &str) -> Option<String> {
        (*self).attribute(name)
    }
}

/// What an interaction presents when it fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    /// Click event: the action name (e.g. `open_url`) and its value.
    Click { action: SmolStr, value: String },
    /// Hover event: the rendered tooltip body.
    Hover { text: String },
    /// Shift-click insertion: the text inserted into the chat box.
    Insertion { text: String },
}

impl Payload {
    pub fn kind(&self) -> InteractionType {
        match self {
            Payload::Click { .. } => InteractionType::Click,
            Payload::Hover { .. } => InteractionType::Hover,
            Payload::Insertion { .. } => InteractionType::Insertion,
        }
    }

    /// Short heading for notifications.
    pub fn title(&self) -> &'static str {
        match self {
            Payload::Click { .. } => "Click Event",
            Payload::Hover { .. } => "Hover Event",
            Payload::Insertion { .. } => "Insertion",
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Click { action, value } => {
                write!(f, "Action: {}, Content: {}", humanize_action(action), value)
            }
            Payload::Hover { text } | Payload::Insertion { text } => {
                write!(f, "Content: {}", text)
            }
        }
    }
}

/// `open_url` -> `Open url`.
pub fn humanize_action(action: &str) -> String {
    let spaced = action.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Read one interaction's payload from a node, if it carries one.
pub fn extract_payload<A: AttributeSource + ?Sized>(
    attrs: &A,
    kind: InteractionType,
) -> Option<Payload> {
    match kind {
        InteractionType::Click => {
            let action = attrs.attribute(DATA_CLICK_EVENT_ACTION)?;
            let value = attrs.attribute(DATA_CLICK_EVENT_VALUE).unwrap_or_default();
            Some(Payload::Click {
                action: action.into(),
                value,
            })
        }
        InteractionType::Hover => attrs
            .attribute(DATA_HOVER_EVENT_SHOW_TEXT)
            .map(|text| Payload::Hover { text }),
        InteractionType::Insertion => attrs
            .attribute(DATA_INSERTION)
            .map(|text| Payload::Insertion { text }),
    }
}

/// The interactions one rendered node carries, keyed by type.
///
/// At most one payload per type, kept in [`InteractionType`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeInteractions {
    payloads: Vec<Payload>,
}

impl NodeInteractions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every interaction type from a node's attributes.
    pub fn resolve<A: AttributeSource + ?Sized>(attrs: &A) -> Self {
        Self {
            payloads: InteractionType::ALL
                .into_iter()
                .filter_map(|kind| extract_payload(attrs, kind))
                .collect(),
        }
    }

    /// Builder-style insert, replacing any payload of the same type.
    pub fn with(mut self, payload: Payload) -> Self {
        self.insert(payload);
        self
    }

    pub fn insert(&mut self, payload: Payload) {
        let kind = payload.kind();
        match self.payloads.binary_search_by_key(&kind, Payload::kind) {
            Ok(index) => self.payloads[index] = payload,
            Err(index) => self.payloads.insert(index, payload),
        }
    }

    pub fn get(&self, kind: InteractionType) -> Option<&Payload> {
        self.payloads.iter().find(|payload| payload.kind() == kind)
    }

    pub fn kinds(&self) -> InteractionSet {
        self.payloads.iter().map(Payload::kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Payload> {
        self.payloads.iter()
    }
}
