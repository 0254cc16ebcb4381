//! Rendered lines on a terminal.

use std::io::Write;

use mini_preview_core::OutputSurface;

/// Writes each rendered line as-is. Consecutive renders are separated by a
/// blank line.
pub struct TerminalOutput<W> {
    writer: W,
    lines: usize,
}

impl<W: Write> TerminalOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Lines written since the last clear.
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = writeln!(self.writer, "{text}") {
            tracing::warn!(error = %e, "failed to write output");
        }
    }
}

impl<W: Write> OutputSurface for TerminalOutput<W> {
    fn clear(&mut self) {
        if self.lines > 0 {
            self.write("");
        }
        self.lines = 0;
    }

    fn append_line(&mut self, markup: &str) {
        self.write(markup);
        self.lines += 1;
    }

    fn scroll_to_bottom(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!(error = %e, "failed to flush output");
        }
    }
}
