//! Ancestor dispatch: which interactions a gesture triggers.
//!
//! A gesture starts at its target and bubbles up the ancestor chain. Each
//! interaction type fires at most once per gesture, from the nearest node that
//! carries a payload for it; once fired the type is consumed and ancestors are
//! not consulted for it again. Nodes with no payload for a live type are
//! transparent.

use serde::Serialize;

use crate::interaction::{InteractionSet, InteractionType, NodeInteractions, Payload};
use crate::mode::Mode;

/// A user gesture over the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Click,
    Hover,
}

impl Gesture {
    /// Interaction types this gesture can trigger, before mode gating.
    pub const fn initial_types(self) -> InteractionSet {
        match self {
            Gesture::Click => {
                InteractionSet::only(InteractionType::Click).with(InteractionType::Insertion)
            }
            Gesture::Hover => InteractionSet::only(InteractionType::Hover),
        }
    }
}

/// One triggered interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Firing {
    /// Distance from the gesture target; 0 is the target itself.
    pub depth: usize,
    pub payload: Payload,
}

impl Firing {
    pub fn kind(&self) -> InteractionType {
        self.payload.kind()
    }
}

/// Resolve a gesture over a chain ordered target-first.
///
/// Returns firings in target-to-root order, at most one per interaction type.
/// Types that are not usable in `mode` are dropped before the walk starts.
pub fn dispatch<'a, I>(chain: I, gesture: Gesture, mode: Mode) -> Vec<Firing>
where
    I: IntoIterator<Item = &'a NodeInteractions>,
{
    let mut live = gesture
        .initial_types()
        .intersection(mode.enabled_interactions());
    let mut firings = Vec::new();

    for (depth, node) in chain.into_iter().enumerate() {
        if live.is_empty() {
            break;
        }
        for kind in live.iter() {
            if let Some(payload) = node.get(kind) {
                firings.push(Firing {
                    depth,
                    payload: payload.clone(),
                });
                live.remove(kind);
            }
        }
    }

    if !firings.is_empty() {
        tracing::trace!(?gesture, %mode, count = firings.len(), "gesture resolved");
    }
    firings
}

/// Click gesture: click action and insertion, each from its nearest carrier.
pub fn resolve_click<'a, I>(chain: I, mode: Mode) -> Vec<Firing>
where
    I: IntoIterator<Item = &'a NodeInteractions>,
{
    dispatch(chain, Gesture::Click, mode)
}

/// Hover gesture: the innermost hover text, if any. Ascent stops at the first match.
pub fn resolve_hover<'a, I>(chain: I, mode: Mode) -> Option<Firing>
where
    I: IntoIterator<Item = &'a NodeInteractions>,
{
    dispatch(chain, Gesture::Hover, mode).into_iter().next()
}
