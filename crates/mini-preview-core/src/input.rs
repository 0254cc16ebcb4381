//! Input transform pipeline.
//!
//! Turns the raw editor text into the line sequence sent to the renderer,
//! shaped by the active mode. Everything here is pure and total.

use std::borrow::Cow;

use crate::mode::Mode;
use crate::protocol::Call;

/// Zero-width space. Stands in for empty lines so they survive transport and
/// are distinguishable from lines that don't exist.
pub const PLACEHOLDER: &str = "\u{200B}";

/// Fixed first line of the server list entry: server name and player count.
pub const SERVER_LIST_HEADER: &str =
    "KyoriCraft                                                 <gray>0<dark_gray>/</dark_gray>20";

/// Split raw text on newlines and on the literal two-character `\n` escape.
///
/// Empty text has no lines at all.
pub fn split_lines(raw: &str) -> Vec<&str> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split('\n').flat_map(|line| line.split("\\n")).collect()
}

/// Build the lines sent to the renderer for `raw` in `mode`.
pub fn build_request_lines(raw: &str, mode: Mode) -> Vec<Cow<'_, str>> {
    let lines = split_lines(raw);

    match mode {
        Mode::ServerList => {
            let mut shaped = Vec::with_capacity(3);
            shaped.push(Cow::Borrowed(SERVER_LIST_HEADER));
            for slot in 0..2 {
                let line = lines.get(slot).copied().unwrap_or(PLACEHOLDER);
                shaped.push(Cow::Borrowed(line));
            }
            shaped
        }
        _ => {
            let cap = mode.max_lines().unwrap_or(usize::MAX);
            lines.into_iter().take(cap).map(Cow::Borrowed).collect()
        }
    }
}

/// Join request lines with `\n`, replacing empty lines with [`PLACEHOLDER`].
pub fn join_request_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut joined = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            joined.push('\n');
        }
        let line = line.as_ref();
        joined.push_str(if line.is_empty() { PLACEHOLDER } else { line });
    }
    joined
}

/// The full request for `raw` in `mode`.
pub fn build_request(raw: &str, mode: Mode) -> Call {
    Call::new(join_request_lines(&build_request_lines(raw, mode)))
}

/// Pasted text often carries literal `\n` escapes (copied from a command);
/// turn them into real newlines before they reach the editor.
pub fn normalize_paste(text: &str) -> String {
    text.replace("\\n", "\n")
}
