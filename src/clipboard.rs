//! Clipboard targets for the copy actions.
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use base64::Engine;

pub trait Clipboard {
    fn write_text(&mut self, text: &str);
}

/// Copies through the terminal with an OSC 52 escape sequence.
///
/// Supported by most modern terminal emulators, including over SSH. The
/// sequence goes to stderr; stdout carries command output only.
#[derive(Debug, Default)]
pub struct TerminalClipboard;

impl Clipboard for TerminalClipboard {
    fn write_text(&mut self, text: &str) {
        let _ = write_osc52(&mut std::io::stderr().lock(), text);
    }
}

/// Write `text` as an OSC 52 "set clipboard" sequence.
pub fn write_osc52(out: &mut impl Write, text: &str) -> std::io::Result<()> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    out.write_all(format!("\x1b]52;c;{encoded}\x07").as_bytes())?;
    out.flush()
}

/// In-memory clipboard; clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) {
        *self.contents.borrow_mut() = Some(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn osc52_sequence_wraps_base64_text() {
        let mut out = Vec::new();
        write_osc52(&mut out, "Résumé").unwrap();
        assert_eq!(out, b"\x1b]52;c;UsOpc3Vtw6k=\x07");
    }

    #[test]
    fn memory_clipboard_clones_share_contents() {
        let board = MemoryClipboard::new();
        let mut writer = board.clone();
        writer.write_text("Résumé");
        assert_eq!(board.contents().as_deref(), Some("Résumé"));
    }
}
