//! The output container.
//!
//! Each rendered line becomes a `<div>` in the container. While a line is
//! built, every component span in it is resolved into the interaction tree
//! and stamped with its node id, so gestures look payloads up by id instead
//! of re-reading attributes.

use mini_preview_core::{COMPONENT_CLASS, InteractionTree, NodeInteractions, OutputSurface};
use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget, HtmlElement};

use crate::attributes::{
    DATA_NODE_ID, ElementAttributes, component_element, is_component, node_id_of,
};

pub struct BrowserOutput {
    container: HtmlElement,
    tree: InteractionTree,
}

impl BrowserOutput {
    pub fn new(container: HtmlElement) -> Self {
        Self {
            container,
            tree: InteractionTree::new(),
        }
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    pub fn tree(&self) -> &InteractionTree {
        &self.tree
    }

    /// Target-first ancestor chain for an event target.
    ///
    /// Empty if the target is not a component span of the current render.
    pub fn chain_for(&self, target: &EventTarget) -> Vec<&NodeInteractions> {
        component_element(target)
            .and_then(|element| node_id_of(&element))
            .map(|id| self.tree.ancestor_chain(id))
            .unwrap_or_default()
    }

    fn index_line(&mut self, line: &Element) {
        let selector = format!("span.{COMPONENT_CLASS}");
        let nodes = match line.query_selector_all(&selector) {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::warn!(error = ?e, "failed to query component spans");
                return;
            }
        };

        // querySelectorAll is in document order, so parents are indexed
        // before their children.
        for i in 0..nodes.length() {
            let Some(element) = nodes.item(i).and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };
            let parent = element
                .parent_element()
                .filter(is_component)
                .and_then(|parent| node_id_of(&parent));
            let id = self
                .tree
                .push(parent, NodeInteractions::resolve(&ElementAttributes(&element)));
            if let Err(e) = element.set_attribute(DATA_NODE_ID, &id.to_string()) {
                tracing::warn!(error = ?e, "failed to stamp component node id");
            }
        }
    }
}

impl OutputSurface for BrowserOutput {
    fn clear(&mut self) {
        self.container.set_text_content(None);
        self.tree.clear();
    }

    fn append_line(&mut self, markup: &str) {
        let line = match gloo_utils::document().create_element("div") {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = ?e, "failed to create output line");
                return;
            }
        };
        line.set_inner_html(markup);
        self.index_line(&line);
        if let Err(e) = self.container.append_child(&line) {
            tracing::warn!(error = ?e, "failed to append output line");
        }
    }

    fn scroll_to_bottom(&mut self) {
        self.container.set_scroll_top(self.container.scroll_height());
    }
}
