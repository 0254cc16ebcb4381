//! Gesture handling over the rendered output.
//!
//! The page installs one listener per gesture on the document. Bubbling is
//! stopped on component spans since resolution walks the ancestor chain
//! itself.

use mini_preview_core::{Firing, Payload, PreviewContext, Size, Transport, place_tooltip};
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement, MouseEvent};

use crate::attributes::component_element;
use crate::output::BrowserOutput;

/// The floating element that shows hover text.
#[derive(Clone)]
pub struct Tooltip {
    element: HtmlElement,
}

impl Tooltip {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    pub fn is_shown(&self) -> bool {
        !self.element.hidden()
    }

    /// Show rendered hover markup.
    pub fn show(&self, markup: &str) {
        self.element.set_inner_html(markup);
        self.element.set_hidden(false);
    }

    pub fn hide(&self) {
        if self.is_shown() {
            self.element.set_hidden(true);
            self.element.set_inner_html("");
        }
    }

    /// Position next to a cursor at client coordinates `(x, y)`.
    pub fn follow(&self, x: f64, y: f64) {
        let size = Size::new(
            self.element.client_width() as f64,
            self.element.client_height() as f64,
        );
        let position = place_tooltip(x, y, size, viewport_size());
        let style = self.element.style();
        if let Err(e) = style
            .set_property("top", &format!("{}px", position.top))
            .and_then(|_| style.set_property("left", &format!("{}px", position.left)))
        {
            tracing::warn!(error = ?e, "failed to move tooltip");
        }
    }
}

fn viewport_size() -> Size {
    let window = gloo_utils::window();
    let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Size::new(
        dimension(window.inner_width()),
        dimension(window.inner_height()),
    )
}

/// Click on the output: resolve click and insertion payloads up the chain.
///
/// Returns nothing when the target isn't a component span.
pub fn on_click<T: Transport>(
    ctx: &PreviewContext<T, BrowserOutput>,
    event: &Event,
) -> Vec<Firing> {
    let Some(target) = event.target() else {
        return Vec::new();
    };
    if component_element(&target).is_none() {
        return Vec::new();
    }
    event.stop_propagation();
    let firings = ctx.click(ctx.output().chain_for(&target));
    for firing in &firings {
        tracing::debug!(depth = firing.depth, kind = ?firing.kind(), "click fired");
    }
    firings
}

/// Mouse entered something: show the innermost hover text, if any.
pub fn on_mouseover<T: Transport>(
    ctx: &PreviewContext<T, BrowserOutput>,
    event: &Event,
    tooltip: &Tooltip,
) -> Option<Firing> {
    event.stop_propagation();
    let target = event.target()?;
    let firing = ctx.hover(ctx.output().chain_for(&target))?;
    if let Payload::Hover { text } = &firing.payload {
        tooltip.show(text);
    }
    Some(firing)
}

/// Mouse left a component span: hide the tooltip.
pub fn on_mouseout(event: &Event, tooltip: &Tooltip) {
    let Some(target) = event.target() else {
        return;
    };
    if component_element(&target).is_some() {
        tooltip.hide();
        event.stop_propagation();
    }
}

pub fn on_mousemove(event: &Event, tooltip: &Tooltip) {
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        tooltip.follow(mouse.client_x() as f64, mouse.client_y() as f64);
    }
}

