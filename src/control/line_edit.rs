/// LineEdit - single-line text field
///
/// Commits on Return and on focus loss. Shows an edit cursor while focused.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use unicode_width::UnicodeWidthStr;

use super::{edit_text, CommitEvent, Control, Interactive, KeyOutcome, CURSOR};

#[derive(Debug, Clone)]
pub struct LineEdit {
    text: String,
    style: Style,
    editable: bool,
}

impl LineEdit {
    pub fn new() -> Self {
        LineEdit {
            text: String::new(),
            style: Style::default(),
            editable: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Display width of the text without cursor
    pub fn width(&self) -> u16 {
        self.text.width() as u16
    }

    /// Replace the text as if the user typed it
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Default for LineEdit {
    fn default() -> Self {
        Self::new()
    }
}

impl Control for LineEdit {
    type Display = String;

    fn read_display(&self) -> String {
        self.text.clone()
    }

    fn write_display(&mut self, value: String) {
        self.text = value;
    }

    fn style(&self) -> Style {
        self.style
    }

    fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    fn is_editable(&self) -> bool {
        self.editable
    }

    fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    fn commits_on(&self, event: CommitEvent) -> bool {
        matches!(event, CommitEvent::Submit | CommitEvent::FocusLost)
    }
}

impl Interactive for LineEdit {
    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if !self.editable {
            return KeyOutcome::Ignored;
        }
        if key.code == KeyCode::Enter {
            return KeyOutcome::Commit(CommitEvent::Submit);
        }
        // a newline can never enter a single-line field
        if edit_text(&mut self.text, key, false) {
            KeyOutcome::Consumed
        } else {
            KeyOutcome::Ignored
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer, focused: bool) -> u16 {
        if area.height == 0 {
            return 0;
        }
        let shown = if self.text.is_empty() { " " } else { self.text.as_str() };
        let (x, _) = buf.set_stringn(area.x, area.y, shown, area.width as usize, self.style);
        if focused && self.editable && x < area.right() {
            buf.set_string(x, area.y, CURSOR, Style::default());
        }
        1
    }
}
