//! Mounting the preview onto a page.
//!
//! [`PreviewApp::mount`] finds the page's elements by id, opens the render
//! socket and installs every listener. The returned app owns the listeners;
//! dropping it detaches them.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use mini_preview_core::{
    ConnectionState, Firing, Mode, PreviewContext, StartupParams, SubmitOutcome, Url,
    endpoint_for_host, normalize_paste,
};
use wasm_bindgen::JsCast;
use web_sys::{
    ClipboardEvent, Element, HtmlDocument, HtmlElement, HtmlTextAreaElement, MessageEvent,
};

use crate::gestures::{self, Tooltip};
use crate::output::BrowserOutput;
use crate::SharedContext;
use crate::socket::{JsFailure, WebSocketTransport};

/// Receives click and insertion firings. Presenting them (toasts, dialogs)
/// is up to the host page.
pub type InteractionCallback = Rc<dyn Fn(&Firing)>;

/// Attribute on a mode button naming the mode it selects.
pub const DATA_MODE: &str = "data-mode";

/// Class toggled on the button of the active mode.
pub const ACTIVE_CLASS: &str = "is-active";

/// Where the preview finds its elements.
#[derive(Debug, Clone)]
pub struct MountOptions {
    /// The editor `<textarea>`.
    pub input_id: String,
    /// Container the rendered lines go into.
    pub output_id: String,
    /// Pane around the output; carries the active mode's CSS class along
    /// with the output container.
    pub pane_id: String,
    /// Floating hover element.
    pub tooltip_id: String,
    /// Class shared by mode buttons; each names its mode in `data-mode`.
    pub mode_button_class: String,
    /// Renderer endpoint. Derived from the page location when unset.
    pub endpoint: Option<Url>,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            input_id: "input".into(),
            output_id: "output-pre".into(),
            pane_id: "output-pane".into(),
            tooltip_id: "hover-tooltip".into(),
            mode_button_class: "mc-mode".into(),
            endpoint: None,
        }
    }
}

/// Mode styling: the active mode's class on the output elements, and the
/// active button.
#[derive(Clone)]
pub struct ModeView {
    targets: Vec<Element>,
    buttons: Vec<Element>,
}

impl ModeView {
    /// `targets` carry the `mode-*` class; `buttons` name their mode in `data-mode`.
    pub fn new(targets: Vec<Element>, buttons: Vec<Element>) -> Self {
        Self { targets, buttons }
    }

    pub fn paint(&self, mode: Mode) {
        for target in &self.targets {
            let classes = target.class_list();
            for other in Mode::all().filter(|other| *other != mode) {
                if let Err(e) = classes.remove_1(other.css_class()) {
                    tracing::warn!(error = ?e, "failed to remove mode class");
                }
            }
            if let Err(e) = classes.add_1(mode.css_class()) {
                tracing::warn!(error = ?e, "failed to apply mode class");
            }
        }

        for button in &self.buttons {
            let active = button.get_attribute(DATA_MODE).as_deref() == Some(mode.identifier());
            if let Err(e) = button.class_list().toggle_with_force(ACTIVE_CLASS, active) {
                tracing::warn!(error = ?e, "failed to mark mode button");
            }
        }
    }
}

pub struct PreviewApp {
    ctx: SharedContext,
    input: HtmlTextAreaElement,
    modes: ModeView,
    tooltip: Tooltip,
    _listeners: Vec<EventListener>,
}

impl PreviewApp {
    pub fn mount(
        options: MountOptions,
        on_interaction: Option<InteractionCallback>,
    ) -> Result<Self, JsFailure> {
        let document = gloo_utils::document();
        let location = gloo_utils::window().location();
        let params = StartupParams::from_query(&location.search()?);

        let endpoint = match options.endpoint.clone() {
            Some(endpoint) => endpoint,
            None => endpoint_for_host(&location.host()?, &location.hostname()?)
                .map_err(|e| JsFailure(e.to_string()))?,
        };

        let input: HtmlTextAreaElement = element_by_id(&options.input_id)?;
        let container: HtmlElement = element_by_id(&options.output_id)?;
        let pane: Element = element_by_id(&options.pane_id)?;
        let tooltip = Tooltip::new(element_by_id(&options.tooltip_id)?);

        let buttons = document.get_elements_by_class_name(&options.mode_button_class);
        let buttons: Vec<Element> = (0..buttons.length())
            .filter_map(|i| buttons.item(i))
            .collect();
        let modes = ModeView::new(vec![container.clone().into(), pane], buttons);

        if let Some(shared) = &params.input {
            input.set_value(shared);
        }

        let transport = WebSocketTransport::open(&endpoint)?;
        let socket = transport.socket().clone();
        let context = PreviewContext::new(transport, BrowserOutput::new(container), params.mode)
            .with_input(input.value());
        let ctx: SharedContext = Rc::new(RefCell::new(context));

        modes.paint(params.mode);
        tracing::info!(mode = %params.mode, %endpoint, "mounted preview");

        let mut listeners = Vec::new();

        // Socket lifecycle
        {
            let ctx = ctx.clone();
            listeners.push(EventListener::new(&socket, "open", move |_| {
                tracing::info!("render socket open");
                log_submit(ctx.borrow_mut().on_open());
            }));
        }
        {
            let ctx = ctx.clone();
            listeners.push(EventListener::new(&socket, "message", move |event| {
                let Some(text) = event
                    .dyn_ref::<MessageEvent>()
                    .and_then(|message| message.data().as_string())
                else {
                    tracing::debug!("ignoring non-text socket message");
                    return;
                };
                ctx.borrow_mut().handle_message(&text);
            }));
        }
        {
            let ctx = ctx.clone();
            listeners.push(EventListener::new(&socket, "close", move |_| {
                tracing::info!("render socket closed");
                ctx.borrow_mut().on_close();
            }));
        }
        {
            let ctx = ctx.clone();
            listeners.push(EventListener::new(&socket, "error", move |_| {
                tracing::warn!("render socket error");
                ctx.borrow_mut().on_error();
            }));
        }

        // Editor input
        for event_type in ["keyup", "change", "input"] {
            let ctx = ctx.clone();
            let editor = input.clone();
            listeners.push(EventListener::new(&input, event_type, move |_| {
                log_submit(ctx.borrow_mut().set_input(editor.value()));
            }));
        }
        listeners.push(EventListener::new_with_options(
            &input,
            "paste",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(text) = event
                    .dyn_ref::<ClipboardEvent>()
                    .and_then(ClipboardEvent::clipboard_data)
                    .and_then(|data| data.get_data("text/plain").ok())
                else {
                    return;
                };
                event.prevent_default();
                if let Err(e) = insert_text(&normalize_paste(&text)) {
                    tracing::warn!(error = %e, "failed to insert pasted text");
                }
            },
        ));

        // Mode buttons
        for button in &modes.buttons {
            let ctx = ctx.clone();
            let modes = modes.clone();
            let tooltip = tooltip.clone();
            let target = button.clone();
            listeners.push(EventListener::new(button, "click", move |_| {
                let mode = Mode::from_identifier(target.get_attribute(DATA_MODE).as_deref());
                apply_mode(&ctx, &modes, &tooltip, mode);
            }));
        }

        // Gestures over the output
        {
            let ctx = ctx.clone();
            listeners.push(EventListener::new(&document, "click", move |event| {
                // Released before the callback runs; it may call back into the app.
                let firings = gestures::on_click(&ctx.borrow(), event);
                if let Some(callback) = &on_interaction {
                    firings.iter().for_each(|firing| callback(firing));
                }
            }));
        }
        {
            let ctx = ctx.clone();
            let tooltip = tooltip.clone();
            listeners.push(EventListener::new(&document, "mouseover", move |event| {
                gestures::on_mouseover(&ctx.borrow(), event, &tooltip);
            }));
        }
        {
            let tooltip = tooltip.clone();
            listeners.push(EventListener::new(&document, "mouseout", move |event| {
                gestures::on_mouseout(event, &tooltip);
            }));
        }
        {
            let tooltip = tooltip.clone();
            listeners.push(EventListener::new(&document, "mousemove", move |event| {
                gestures::on_mousemove(event, &tooltip);
            }));
        }

        Ok(Self {
            ctx,
            input,
            modes,
            tooltip,
            _listeners: listeners,
        })
    }

    pub fn context(&self) -> &SharedContext {
        &self.ctx
    }

    pub fn mode(&self) -> Mode {
        self.ctx.borrow().mode()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.ctx.borrow().channel().state()
    }

    pub fn switch_mode(&self, mode: Mode) {
        apply_mode(&self.ctx, &self.modes, &self.tooltip, mode);
    }

    /// Replace the editor text and render it.
    pub fn set_input(&self, text: &str) {
        self.input.set_value(text);
        log_submit(self.ctx.borrow_mut().set_input(text));
    }
}

fn apply_mode(ctx: &SharedContext, modes: &ModeView, tooltip: &Tooltip, mode: Mode) {
    tooltip.hide();
    modes.paint(mode);
    let result = ctx.borrow_mut().switch_mode(mode);
    if let Err(e) = result {
        tracing::warn!(error = %e, %mode, "mode switch could not re-render");
    }
}

fn log_submit(result: Result<SubmitOutcome, mini_preview_core::ChannelError>) {
    match result {
        Ok(outcome) => tracing::trace!(?outcome, "submitted"),
        Err(e) => tracing::debug!(error = %e, "input not submitted"),
    }
}

/// Insert text at the editor's caret, keeping the browser's undo history.
fn insert_text(text: &str) -> Result<(), JsFailure> {
    let document: HtmlDocument = gloo_utils::document()
        .dyn_into()
        .map_err(|_| JsFailure("document is not an HTML document".into()))?;
    document.exec_command_with_show_ui_and_value("insertText", false, text)?;
    Ok(())
}

fn element_by_id<E: JsCast>(id: &str) -> Result<E, JsFailure> {
    gloo_utils::document()
        .get_element_by_id(id)
        .ok_or_else(|| JsFailure(format!("no element with id `{id}`")))?
        .dyn_into::<E>()
        .map_err(|_| JsFailure(format!("element `{id}` has an unexpected type")))
}

