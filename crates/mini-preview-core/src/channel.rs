//! The render channel: one duplex connection to the rendering service.
//!
//! The channel owns the connection lifecycle (`Connecting -> Open -> Closed |
//! Error`), turns input into requests via the input pipeline, and applies
//! responses to an [`OutputSurface`]. Requests are fire-and-forget: there is
//! no correlation between a request and its response, and whichever response
//! arrives last is what the output shows.
//!
//! Platform layers supply the [`Transport`] (a browser `WebSocket`, a
//! tokio-tungstenite sink) and the [`OutputSurface`] (a DOM container, a
//! terminal).

use std::fmt;

use crate::error::ChannelError;
use crate::input::build_request;
use crate::mode::Mode;
use crate::protocol::{ParseResult, RenderResponse, Response};

/// Error type returned by transports.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Sends serialized requests over an open connection.
pub trait Transport {
    fn send_text(&self, text: &str) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send_text(&self, text: &str) -> Result<(), TransportError> {
        (**self).send_text(text)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send_text(&self, text: &str) -> Result<(), TransportError> {
        (**self).send_text(text)
    }
}

/// Where rendered lines go. Exclusively written by the render channel.
pub trait OutputSurface {
    /// Remove all rendered lines.
    fn clear(&mut self);

    /// Append one rendered line (renderer markup).
    fn append_line(&mut self, markup: &str);

    /// Scroll so the newest line is visible. No-op by default.
    fn scroll_to_bottom(&mut self) {}
}

/// Plain line buffer. Useful for tests and headless rendering.
impl OutputSurface for Vec<String> {
    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn append_line(&mut self, markup: &str) {
        self.push(markup.to_string());
    }
}

impl<O: OutputSurface + ?Sized> OutputSurface for &mut O {
    fn clear(&mut self) {
        (**self).clear()
    }

    fn append_line(&mut self, markup: &str) {
        (**self).append_line(markup)
    }

    fn scroll_to_bottom(&mut self) {
        (**self).scroll_to_bottom()
    }
}

/// Lifecycle of the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
    Error,
}

impl ConnectionState {
    /// Closed and errored connections never come back.
    pub const fn is_terminal(self) -> bool {
        matches!(self, ConnectionState::Closed | ConnectionState::Error)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
            ConnectionState::Error => "errored",
        })
    }
}

/// What a submission did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A request went out.
    Sent,
    /// Input was empty in a mode that doesn't render empty input; output cleared.
    Cleared,
    /// Identical to the last request on this connection; nothing sent.
    Unchanged,
}

/// What an incoming message did to the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Output replaced with this many lines.
    Rendered { lines: usize },
    /// The renderer reported a parse error; output untouched.
    Failed(String),
    /// A parse result with neither payload; output untouched.
    Unknown,
    /// Not a render response, or the channel isn't open; output untouched.
    Ignored,
}

/// The live connection to the renderer plus its submission memo.
#[derive(Debug)]
pub struct RenderChannel<T> {
    transport: T,
    state: ConnectionState,
    last_sent: Option<String>,
}

impl<T: Transport> RenderChannel<T> {
    /// Wrap a transport whose connection is being established.
    pub fn connect(transport: T) -> Self {
        Self {
            transport,
            state: ConnectionState::Connecting,
            last_sent: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `Connecting -> Open`. Returns false (and changes nothing) from any other state.
    pub fn on_open(&mut self) -> bool {
        if self.state != ConnectionState::Connecting {
            tracing::warn!(state = %self.state, "ignoring open on a channel that is not connecting");
            return false;
        }
        tracing::info!("render channel open");
        self.state = ConnectionState::Open;
        self.last_sent = None;
        true
    }

    pub fn on_close(&mut self) {
        if !self.state.is_terminal() {
            tracing::info!(from = %self.state, "render channel closed");
            self.state = ConnectionState::Closed;
        }
    }

    pub fn on_error(&mut self) {
        if !self.state.is_terminal() {
            tracing::warn!(from = %self.state, "render channel errored");
            self.state = ConnectionState::Error;
        }
    }

    /// Forget the last request so the next submission is sent even if unchanged.
    pub fn forget_last_sent(&mut self) {
        self.last_sent = None;
    }

    /// Render `raw` in `mode`.
    ///
    /// Empty input in a mode that doesn't render it clears the output without
    /// touching the connection. Anything else requires the channel to be open.
    pub fn submit<O: OutputSurface + ?Sized>(
        &mut self,
        raw: &str,
        mode: Mode,
        output: &mut O,
    ) -> Result<SubmitOutcome, ChannelError> {
        if raw.is_empty() && !mode.renders_empty_input() {
            output.clear();
            self.last_sent = None;
            return Ok(SubmitOutcome::Cleared);
        }

        if !self.is_open() {
            tracing::warn!(state = %self.state, "submit on a channel that is not open");
            return Err(ChannelError::NotOpen { state: self.state });
        }

        let text = build_request(raw, mode)
            .to_json()
            .map_err(ChannelError::Encode)?;

        if self.last_sent.as_deref() == Some(text.as_str()) {
            tracing::debug!("input unchanged, skipping render request");
            return Ok(SubmitOutcome::Unchanged);
        }

        self.transport
            .send_text(&text)
            .map_err(ChannelError::Send)?;
        tracing::trace!(len = text.len(), %mode, "render request sent");
        self.last_sent = Some(text);
        Ok(SubmitOutcome::Sent)
    }

    /// Handle one message from the renderer.
    pub fn receive<O: OutputSurface + ?Sized>(
        &mut self,
        message: &str,
        mode: Mode,
        output: &mut O,
    ) -> ApplyOutcome {
        if !self.is_open() {
            tracing::debug!(state = %self.state, "dropping message on a channel that is not open");
            return ApplyOutcome::Ignored;
        }

        match Response::from_json(message) {
            Ok(Response {
                parse_result: Some(result),
            }) => apply_parse_result(result, mode, output),
            Ok(Response { parse_result: None }) => ApplyOutcome::Ignored,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring undecodable render response");
                ApplyOutcome::Ignored
            }
        }
    }
}

/// Apply a parse result to the output.
///
/// On success the output is replaced with one line per non-empty line of the
/// rendered markup. Failures leave the last good render in place.
pub fn apply_parse_result<O: OutputSurface + ?Sized>(
    result: ParseResult,
    mode: Mode,
    output: &mut O,
) -> ApplyOutcome {
    match result.into_render_response() {
        Some(RenderResponse::Success(dom)) => {
            output.clear();
            let mut lines = 0;
            for line in dom.split('\n').filter(|line| !line.is_empty()) {
                output.append_line(line);
                lines += 1;
            }
            if mode.is_conversation() {
                output.scroll_to_bottom();
            }
            ApplyOutcome::Rendered { lines }
        }
        Some(RenderResponse::Failure(message)) => {
            tracing::error!("A parse error occurred: {message}");
            ApplyOutcome::Failed(message)
        }
        None => {
            tracing::error!("An unknown error occurred!");
            ApplyOutcome::Unknown
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;

    use super::*;

    /// Records everything sent; can be told to fail.
    #[derive(Debug, Default)]
    pub struct RecordingTransport {
        pub sent: RefCell<Vec<String>>,
        pub fail: bool,
    }

    impl RecordingTransport {
        pub fn sent_calls(&self) -> Vec<String> {
            self.sent
                .borrow()
                .iter()
                .map(|json| {
                    serde_json::from_str::<crate::protocol::Call>(json)
                        .unwrap()
                        .mini_message
                })
                .collect()
        }
    }

    impl Transport for RecordingTransport {
        fn send_text(&self, text: &str) -> Result<(), TransportError> {
            if self.fail {
                return Err("socket gone".into());
            }
            self.sent.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    /// Output that also records scroll requests.
    #[derive(Debug, Default)]
    pub struct ScrollingOutput {
        pub lines: Vec<String>,
        pub scrolls: usize,
    }

    impl OutputSurface for ScrollingOutput {
        fn clear(&mut self) {
            self.lines.clear();
        }

        fn append_line(&mut self, markup: &str) {
            self.lines.push(markup.to_string());
        }

        fn scroll_to_bottom(&mut self) {
            self.scrolls += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::input::{PLACEHOLDER, SERVER_LIST_HEADER};

    fn open_channel() -> RenderChannel<RecordingTransport> {
        let mut channel = RenderChannel::connect(RecordingTransport::default());
        assert!(channel.on_open());
        channel
    }

    fn success(dom: &str) -> String {
        serde_json::to_string(&Response {
            parse_result: Some(ParseResult::success(dom)),
        })
        .unwrap()
    }

    #[test]
    fn test_submit_before_open_is_rejected() {
        let mut channel = RenderChannel::connect(RecordingTransport::default());
        let mut output: Vec<String> = Vec::new();
        let err = channel.submit("hi", Mode::ChatOpen, &mut output).unwrap_err();
        assert!(matches!(
            err,
            ChannelError::NotOpen {
                state: ConnectionState::Connecting
            }
        ));
        assert!(channel.transport().sent.borrow().is_empty());
    }

    #[test]
    fn test_submit_sends_transformed_text() {
        let mut channel = open_channel();
        let mut output: Vec<String> = Vec::new();
        let outcome = channel
            .submit("line1\nline2", Mode::ChatOpen, &mut output)
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Sent);
        assert_eq!(channel.transport().sent_calls(), vec!["line1\nline2"]);
    }

    #[test]
    fn test_server_list_submits_empty_input() {
        let mut channel = open_channel();
        let mut output: Vec<String> = Vec::new();
        channel.submit("", Mode::ServerList, &mut output).unwrap();
        assert_eq!(
            channel.transport().sent_calls(),
            vec![format!("{SERVER_LIST_HEADER}\n{PLACEHOLDER}\n{PLACEHOLDER}")]
        );
    }

    #[test]
    fn test_empty_input_clears_without_sending() {
        let mut channel = RenderChannel::connect(RecordingTransport::default());
        let mut output = vec!["old".to_string()];
        let outcome = channel.submit("", Mode::ChatOpen, &mut output).unwrap();
        assert_eq!(outcome, SubmitOutcome::Cleared);
        assert!(output.is_empty());
        assert!(channel.transport().sent.borrow().is_empty());
    }

    #[test]
    fn test_unchanged_input_is_coalesced() {
        let mut channel = open_channel();
        let mut output: Vec<String> = Vec::new();
        assert_eq!(
            channel.submit("a", Mode::ChatOpen, &mut output).unwrap(),
            SubmitOutcome::Sent
        );
        assert_eq!(
            channel.submit("a", Mode::ChatOpen, &mut output).unwrap(),
            SubmitOutcome::Unchanged
        );
        assert_eq!(
            channel.submit("ab", Mode::ChatOpen, &mut output).unwrap(),
            SubmitOutcome::Sent
        );
        assert_eq!(channel.transport().sent_calls(), vec!["a", "ab"]);
    }

    #[test]
    fn test_clear_resets_memo() {
        let mut channel = open_channel();
        let mut output: Vec<String> = Vec::new();
        channel.submit("a", Mode::ChatOpen, &mut output).unwrap();
        channel.submit("", Mode::ChatOpen, &mut output).unwrap();
        assert_eq!(
            channel.submit("a", Mode::ChatOpen, &mut output).unwrap(),
            SubmitOutcome::Sent
        );
    }

    #[test]
    fn test_send_failure_surfaces() {
        let mut channel = RenderChannel::connect(RecordingTransport {
            fail: true,
            ..Default::default()
        });
        channel.on_open();
        let mut output: Vec<String> = Vec::new();
        let err = channel.submit("a", Mode::ChatOpen, &mut output).unwrap_err();
        assert!(matches!(err, ChannelError::Send(_)));
    }

    #[test]
    fn test_success_drops_empty_lines() {
        let mut channel = open_channel();
        let mut output: Vec<String> = Vec::new();
        let outcome = channel.receive(&success("a\n\nb"), Mode::Lore, &mut output);
        assert_eq!(outcome, ApplyOutcome::Rendered { lines: 2 });
        assert_eq!(output, vec!["a", "b"]);
    }

    #[test]
    fn test_success_replaces_previous_render() {
        let mut channel = open_channel();
        let mut output = vec!["stale".to_string(), "lines".to_string()];
        channel.receive(&success("fresh"), Mode::Lore, &mut output);
        assert_eq!(output, vec!["fresh"]);
    }

    #[test]
    fn test_conversation_modes_scroll() {
        let mut channel = open_channel();
        let mut output = ScrollingOutput::default();
        channel.receive(&success("a"), Mode::ChatClosed, &mut output);
        channel.receive(&success("a"), Mode::Hologram, &mut output);
        assert_eq!(output.scrolls, 1);
    }

    #[test]
    fn test_failure_keeps_last_render() {
        let mut channel = open_channel();
        let mut output = vec!["good".to_string()];
        let message = r#"{"parseResult":{"success":false,"errorMessage":"bad tag"}}"#;
        let outcome = channel.receive(message, Mode::ChatOpen, &mut output);
        assert_eq!(outcome, ApplyOutcome::Failed("bad tag".into()));
        assert_eq!(output, vec!["good"]);
    }

    #[test]
    fn test_garbage_is_ignored() {
        let mut channel = open_channel();
        let mut output = vec!["good".to_string()];
        for message in ["", "nope", "{}", r#"{"parseResult":null}"#] {
            assert_eq!(
                channel.receive(message, Mode::ChatOpen, &mut output),
                ApplyOutcome::Ignored,
                "{message:?}"
            );
        }
        assert_eq!(output, vec!["good"]);
    }

    #[test]
    fn test_success_without_dom_is_unknown() {
        let mut channel = open_channel();
        let mut output = vec!["good".to_string()];
        assert_eq!(
            channel.receive(
                r#"{"parseResult":{"success":true}}"#,
                Mode::ChatOpen,
                &mut output
            ),
            ApplyOutcome::Unknown
        );
        assert_eq!(output, vec!["good"]);
    }

    #[test]
    fn test_terminal_states() {
        let mut channel = open_channel();
        channel.on_close();
        assert_eq!(channel.state(), ConnectionState::Closed);
        channel.on_error();
        assert_eq!(channel.state(), ConnectionState::Closed);
        assert!(!channel.on_open());

        let mut output = vec!["kept".to_string()];
        assert_eq!(
            channel.receive(&success("new"), Mode::ChatOpen, &mut output),
            ApplyOutcome::Ignored
        );
        assert_eq!(output, vec!["kept"]);
        assert!(matches!(
            channel.submit("x", Mode::ChatOpen, &mut output),
            Err(ChannelError::NotOpen {
                state: ConnectionState::Closed
            })
        ));
    }
}
