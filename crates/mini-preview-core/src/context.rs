//! The preview context: the single owner of all mutable preview state.
//!
//! Holds the active [`Mode`], the current input text, the [`RenderChannel`]
//! and the [`OutputSurface`] it writes to. Every mutation goes through one of
//! the setters here, so a platform layer only needs to guarantee that one
//! handler runs at a time (the browser's event loop, or a single task).

use crate::channel::{ApplyOutcome, OutputSurface, RenderChannel, SubmitOutcome, Transport};
use crate::dispatch::{Firing, resolve_click, resolve_hover};
use crate::error::ChannelError;
use crate::interaction::NodeInteractions;
use crate::mode::Mode;

pub struct PreviewContext<T, O> {
    mode: Mode,
    input: String,
    channel: RenderChannel<T>,
    output: O,
}

impl<T: Transport, O: OutputSurface> PreviewContext<T, O> {
    /// Start a context over a connecting transport.
    pub fn new(transport: T, output: O, mode: Mode) -> Self {
        Self {
            mode,
            input: String::new(),
            channel: RenderChannel::connect(transport),
            output,
        }
    }

    /// Seed the input text without rendering it (e.g. shared input from the URL).
    pub fn with_input(mut self, text: impl Into<String>) -> Self {
        self.input = text.into();
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn channel(&self) -> &RenderChannel<T> {
        &self.channel
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Mutable output access for the platform layer (e.g. to read layout).
    /// Rendering itself only happens through the channel.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Replace the input text and render it.
    ///
    /// Before the channel opens the text is stored and `NotOpen` is returned;
    /// it's rendered when the connection comes up.
    pub fn set_input(&mut self, text: impl Into<String>) -> Result<SubmitOutcome, ChannelError> {
        self.input = text.into();
        self.render_current()
    }

    /// Switch the active mode and re-render the current input in it.
    ///
    /// Returns `None` when the channel isn't open yet.
    pub fn switch_mode(&mut self, mode: Mode) -> Result<Option<SubmitOutcome>, ChannelError> {
        if mode != self.mode {
            tracing::debug!(from = %self.mode, to = %mode, "switching mode");
        }
        self.mode = mode;
        self.channel.forget_last_sent();
        if !self.channel.is_open() {
            return Ok(None);
        }
        self.render_current().map(Some)
    }

    /// The connection opened: render whatever input is already there.
    pub fn on_open(&mut self) -> Result<SubmitOutcome, ChannelError> {
        self.channel.on_open();
        self.render_current()
    }

    pub fn on_close(&mut self) {
        self.channel.on_close();
    }

    pub fn on_error(&mut self) {
        self.channel.on_error();
    }

    /// Apply one message from the renderer.
    pub fn handle_message(&mut self, message: &str) -> ApplyOutcome {
        self.channel.receive(message, self.mode, &mut self.output)
    }

    /// Resolve a click over a target-first ancestor chain.
    pub fn click<'a, I>(&self, chain: I) -> Vec<Firing>
    where
        I: IntoIterator<Item = &'a NodeInteractions>,
    {
        resolve_click(chain, self.mode)
    }

    /// Resolve a hover over a target-first ancestor chain.
    pub fn hover<'a, I>(&self, chain: I) -> Option<Firing>
    where
        I: IntoIterator<Item = &'a NodeInteractions>,
    {
        resolve_hover(chain, self.mode)
    }

    fn render_current(&mut self) -> Result<SubmitOutcome, ChannelError> {
        self.channel.submit(&self.input, self.mode, &mut self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ConnectionState;
    use crate::channel::test_support::RecordingTransport;
    use crate::input::{PLACEHOLDER, SERVER_LIST_HEADER};
    use crate::interaction::{InteractionType, Payload};
    use crate::tree::InteractionTree;

    type TestContext = PreviewContext<RecordingTransport, Vec<String>>;

    fn context(mode: Mode) -> TestContext {
        PreviewContext::new(RecordingTransport::default(), Vec::new(), mode)
    }

    #[test]
    fn test_input_before_open_renders_on_open() {
        let mut ctx = context(Mode::ChatOpen);
        assert!(matches!(
            ctx.set_input("<red>shared"),
            Err(ChannelError::NotOpen { .. })
        ));
        assert!(ctx.channel().transport().sent.borrow().is_empty());

        assert_eq!(ctx.on_open().unwrap(), SubmitOutcome::Sent);
        assert_eq!(ctx.channel().transport().sent_calls(), vec!["<red>shared"]);
    }

    #[test]
    fn test_seeded_input_renders_on_open() {
        let mut ctx = context(Mode::ChatClosed).with_input("a\\nb");
        assert_eq!(ctx.input(), "a\\nb");
        ctx.on_open().unwrap();
        assert_eq!(ctx.channel().transport().sent_calls(), vec!["a\nb"]);
    }

    #[test]
    fn test_switch_mode_rerenders() {
        let mut ctx = context(Mode::ChatOpen);
        ctx.on_open().unwrap();
        ctx.set_input("motd").unwrap();

        assert_eq!(
            ctx.switch_mode(Mode::ServerList).unwrap(),
            Some(SubmitOutcome::Sent)
        );
        // Same payload in a different chat mode is still re-sent.
        assert_eq!(
            ctx.switch_mode(Mode::ChatOpen).unwrap(),
            Some(SubmitOutcome::Sent)
        );
        assert_eq!(
            ctx.channel().transport().sent_calls(),
            vec![
                "motd".to_string(),
                format!("{SERVER_LIST_HEADER}\nmotd\n{PLACEHOLDER}"),
                "motd".to_string(),
            ]
        );
    }

    #[test]
    fn test_switch_mode_before_open() {
        let mut ctx = context(Mode::ChatOpen);
        assert_eq!(ctx.switch_mode(Mode::Lore).unwrap(), None);
        assert_eq!(ctx.mode(), Mode::Lore);
        assert_eq!(ctx.channel().state(), ConnectionState::Connecting);
    }

    #[test]
    fn test_open_with_empty_input_in_server_list() {
        let mut ctx = context(Mode::ServerList);
        assert_eq!(ctx.on_open().unwrap(), SubmitOutcome::Sent);
        assert_eq!(ctx.channel().transport().sent.borrow().len(), 1);
    }

    #[test]
    fn test_open_with_empty_input_clears() {
        let mut ctx = context(Mode::ChatOpen);
        assert_eq!(ctx.on_open().unwrap(), SubmitOutcome::Cleared);
        assert!(ctx.channel().transport().sent.borrow().is_empty());
    }

    #[test]
    fn test_message_applies_to_output() {
        let mut ctx = context(Mode::ChatOpen);
        ctx.on_open().unwrap();
        let outcome =
            ctx.handle_message(r#"{"parseResult":{"success":true,"dom":"one\n\ntwo\n"}}"#);
        assert_eq!(outcome, ApplyOutcome::Rendered { lines: 2 });
        assert_eq!(ctx.output(), &vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_closed_context_stays_closed() {
        let mut ctx = context(Mode::ChatOpen);
        ctx.on_open().unwrap();
        ctx.on_error();
        assert!(ctx.set_input("x").is_err());
        assert_eq!(ctx.channel().state(), ConnectionState::Error);
    }

    #[test]
    fn test_gestures_follow_active_mode() {
        let mut tree = InteractionTree::new();
        let outer = tree.push(
            None,
            NodeInteractions::new().with(Payload::Insertion {
                text: "inserted".into(),
            }),
        );
        let inner = tree.push(Some(outer), NodeInteractions::new());

        let mut ctx = context(Mode::ChatOpen);
        let firings = ctx.click(tree.ancestor_chain(inner));
        assert_eq!(firings.len(), 1);
        assert_eq!(firings[0].kind(), InteractionType::Insertion);

        ctx.switch_mode(Mode::ChatClosed).unwrap();
        assert!(ctx.click(tree.ancestor_chain(inner)).is_empty());
        assert!(ctx.hover(tree.ancestor_chain(inner)).is_none());
    }
}
