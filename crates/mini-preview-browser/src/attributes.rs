//! Interaction attributes on DOM elements.

use mini_preview_core::{AttributeSource, COMPONENT_CLASS, NodeId};
use wasm_bindgen::JsCast;

/// Attribute holding a component span's id in the current interaction tree.
pub const DATA_NODE_ID: &str = "data-mm-node";

/// [`AttributeSource`] over a DOM element.
pub struct ElementAttributes<'a>(pub &'a web_sys::Element);

impl AttributeSource for ElementAttributes<'_> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }
}

/// Whether an element takes part in interaction resolution: a `span`
/// carrying the component class.
pub fn is_component(element: &web_sys::Element) -> bool {
    element.tag_name().eq_ignore_ascii_case("span")
        && element.class_list().contains(COMPONENT_CLASS)
}

/// The event target as a component element, if it is one.
pub fn component_element(target: &web_sys::EventTarget) -> Option<web_sys::Element> {
    let element = target.dyn_ref::<web_sys::Element>()?;
    is_component(element).then(|| element.clone())
}

/// The tree id stamped on a component element.
pub fn node_id_of(element: &web_sys::Element) -> Option<NodeId> {
    element.get_attribute(DATA_NODE_ID)?.parse().ok()
}
