/// MultiLineEdit - plain multi-line text
///
/// Return inserts a newline, so the only commit event is focus loss. Lines
/// are clipped, never wrapped, and the text is stored exactly as typed.

use crossterm::event::KeyEvent;
use ratatui::{buffer::Buffer, layout::Rect, style::Style};

use super::{edit_text, CommitEvent, Control, Interactive, KeyOutcome, CURSOR};

#[derive(Debug, Clone)]
pub struct MultiLineEdit {
    text: String,
    style: Style,
    read_only: bool,
}

impl MultiLineEdit {
    pub fn new() -> Self {
        MultiLineEdit {
            text: String::new(),
            style: Style::default(),
            read_only: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text as if the user typed it
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Number of display lines; a trailing newline opens an empty line
    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }
}

impl Default for MultiLineEdit {
    fn default() -> Self {
        Self::new()
    }
}

impl Control for MultiLineEdit {
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
        !self.read_only
    }

    fn set_editable(&mut self, editable: bool) {
        self.read_only = !editable;
    }

    fn commits_on(&self, event: CommitEvent) -> bool {
        event == CommitEvent::FocusLost
    }
}

impl Interactive for MultiLineEdit {
    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if self.read_only {
            return KeyOutcome::Ignored;
        }
        if edit_text(&mut self.text, key, true) {
            KeyOutcome::Consumed
        } else {
            KeyOutcome::Ignored
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer, focused: bool) -> u16 {
        let mut rows = 0;
        let mut cursor_at = None;
        for (i, line) in self.text.split('\n').enumerate() {
            if rows >= area.height {
                break;
            }
            let y = area.y + i as u16;
            let shown = if line.is_empty() { " " } else { line };
            let (x, _) = buf.set_stringn(area.x, y, shown, area.width as usize, self.style);
            cursor_at = Some((if line.is_empty() { area.x } else { x }, y));
            rows += 1;
        }
        if focused && !self.read_only && rows as usize == self.line_count() {
            if let Some((x, y)) = cursor_at {
                if x < area.right() {
                    buf.set_string(x, y, CURSOR, Style::default());
                }
            }
        }
        rows
    }

    fn height(&self) -> u16 {
        self.line_count().min(u16::MAX as usize) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{key, line_to_string};
    use crossterm::event::KeyCode;

    #[test]
    fn test_enter_inserts_newline() {
        let mut edit = MultiLineEdit::new();
        edit.handle_key(key(KeyCode::Char('a')));
        assert_eq!(edit.handle_key(key(KeyCode::Enter)), KeyOutcome::Consumed);
        edit.handle_key(key(KeyCode::Char('b')));
        assert_eq!(edit.read_display(), "a\nb");
        assert_eq!(edit.height(), 2);
    }

    #[test]
    fn test_commits_only_on_focus_lost() {
        let edit = MultiLineEdit::new();
        assert!(edit.commits_on(CommitEvent::FocusLost));
        assert!(!edit.commits_on(CommitEvent::Submit));
        assert!(!edit.commits_on(CommitEvent::Activated));
    }

    #[test]
    fn test_text_kept_exactly() {
        let mut edit = MultiLineEdit::new();
        let text = "  indented\n\ttab\n\ntrailing  \n".to_string();
        edit.write_display(text.clone());
        assert_eq!(edit.read_display(), text);
        assert_eq!(edit.line_count(), 5);
    }

    #[test]
    fn test_read_only_ignores_keys() {
        let mut edit = MultiLineEdit::new();
        edit.set_editable(false);
        assert_eq!(edit.handle_key(key(KeyCode::Char('a'))), KeyOutcome::Ignored);
        assert!(!edit.is_editable());
        assert_eq!(edit.text(), "");
    }

    #[test]
    fn test_render_lines_without_wrapping() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 3));
        let mut edit = MultiLineEdit::new();
        edit.set_text("first line\nsecond");

        let height = edit.render(buf.area, &mut buf, false);

        assert_eq!(height, 2);
        assert_eq!(line_to_string(&buf, 0), "first");
        assert_eq!(line_to_string(&buf, 1), "second");
        assert_eq!(line_to_string(&buf, 2), "");
    }

    #[test]
    fn test_render_cursor_on_last_line() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 3));
        let mut edit = MultiLineEdit::new();
        edit.set_text("ab\ncd");

        edit.render(buf.area, &mut buf, true);

        assert_eq!(line_to_string(&buf, 0), "ab");
        assert_eq!(line_to_string(&buf, 1), "cd█");
    }

    #[test]
    fn test_render_clips_to_area_height() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 2));
        let mut edit = MultiLineEdit::new();
        edit.set_text("1\n2\n3");

        let height = edit.render(buf.area, &mut buf, true);

        assert_eq!(height, 2);
        assert_eq!(line_to_string(&buf, 1), "2");
    }
}
