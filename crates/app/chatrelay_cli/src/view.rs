//! Terminal rendering for a chat session.

use std::fmt;
use std::io::Write;

use chatrelay_core::session::{ChatView, Entry};

const PROMPT: &str = "> ";
const TYPING: &str = "bot is typing...";
// Carriage return + erase line, to remove the typing indicator.
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Writes the conversation to `out`, one entry per line.
pub struct TerminalView<W: Write> {
    out: W,
    interactive: bool,
    input_enabled: bool,
}

impl<W: Write> TerminalView<W> {
    /// REPL mode: user lines are already on screen, so only bot entries are
    /// printed and a prompt marks when input is accepted again.
    pub fn interactive(out: W) -> Self {
        Self {
            out,
            interactive: true,
            input_enabled: true,
        }
    }

    /// One-shot mode: prints both sides, no prompt or typing indicator.
    pub fn plain(out: W) -> Self {
        Self {
            out,
            interactive: false,
            input_enabled: true,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(args).and_then(|_| self.out.flush()) {
            log::warn!("failed to write to terminal: {e}");
        }
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn render(&mut self, entry: &Entry) {
        match entry {
            Entry::Turn(_) if !entry.is_bot() && self.interactive => {}
            Entry::Turn(_) if !entry.is_bot() => self.write(format_args!("you: {}\n", entry.text())),
            _ => self.write(format_args!("bot: {}\n", entry.text())),
        }
    }

    fn clear_input(&mut self) {}

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn set_typing(&mut self, visible: bool) {
        if !self.interactive {
            return;
        }
        if visible {
            self.write(format_args!("{TYPING}"));
        } else {
            self.write(format_args!("{CLEAR_LINE}"));
        }
    }

    fn focus_input(&mut self) {
        if self.interactive && self.input_enabled {
            self.write(format_args!("{PROMPT}"));
        }
    }
}
