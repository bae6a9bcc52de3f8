/// CheckBox - boolean control
///
/// Displays checked ([✔]) or unchecked ([ ]). Space or Return toggles and
/// commits immediately.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
};

use super::{CommitEvent, Control, Interactive, KeyOutcome};

#[derive(Debug, Clone)]
pub struct CheckBox {
    checked: bool,
    style: Style,
    enabled: bool,
    use_unicode: bool,
    mark_fg: Color,
}

impl CheckBox {
    pub fn new(use_unicode: bool) -> Self {
        CheckBox {
            checked: false,
            style: Style::default(),
            enabled: true,
            use_unicode,
            mark_fg: Color::Reset,
        }
    }

    pub fn with_mark_color(mut self, color: Color) -> Self {
        self.mark_fg = color;
        self
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Flip the state as a user click would
    pub fn toggle(&mut self) {
        self.checked = !self.checked;
    }
}

impl Control for CheckBox {
    type Display = bool;

    fn read_display(&self) -> bool {
        self.checked
    }

    fn write_display(&mut self, value: bool) {
        self.checked = value;
    }

    fn style(&self) -> Style {
        self.style
    }

    fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    fn is_editable(&self) -> bool {
        self.enabled
    }

    fn set_editable(&mut self, editable: bool) {
        self.enabled = editable;
    }

    fn commits_on(&self, event: CommitEvent) -> bool {
        event == CommitEvent::Toggled
    }
}

impl Interactive for CheckBox {
    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if !self.enabled {
            return KeyOutcome::Ignored;
        }
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.toggle();
                KeyOutcome::Commit(CommitEvent::Toggled)
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer, _focused: bool) -> u16 {
        if area.height == 0 || area.width < 3 {
            return 0;
        }
        let (x, y) = (area.x, area.y);
        if self.checked {
            // Checked: brackets in control style, mark in mark colour
            let check_char = if self.use_unicode { "✔" } else { "X" };
            let mark_style = if self.enabled {
                self.style.fg(self.mark_fg)
            } else {
                self.style
            };
            buf.set_string(x, y, "[", self.style);
            buf.set_string(x + 1, y, check_char, mark_style);
            buf.set_string(x + 2, y, "]", self.style);
        } else {
            buf.set_string(x, y, "[ ]", self.style);
        }
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{key, line_to_string};

    #[test]
    fn test_space_toggles_and_commits() {
        let mut check = CheckBox::new(true);
        assert_eq!(
            check.handle_key(key(KeyCode::Char(' '))),
            KeyOutcome::Commit(CommitEvent::Toggled)
        );
        assert!(check.read_display());
        assert_eq!(
            check.handle_key(key(KeyCode::Enter)),
            KeyOutcome::Commit(CommitEvent::Toggled)
        );
        assert!(!check.read_display());
        assert_eq!(check.handle_key(key(KeyCode::Char('x'))), KeyOutcome::Ignored);
    }

    #[test]
    fn test_disabled_does_not_toggle() {
        let mut check = CheckBox::new(true);
        check.set_editable(false);
        assert_eq!(check.handle_key(key(KeyCode::Char(' '))), KeyOutcome::Ignored);
        assert!(!check.is_checked());
    }

    #[test]
    fn test_only_toggle_commits() {
        let check = CheckBox::new(true);
        assert!(check.commits_on(CommitEvent::Toggled));
        assert!(!check.commits_on(CommitEvent::FocusLost));
        assert!(!check.commits_on(CommitEvent::Submit));
    }

    #[test]
    fn test_render_checked_unicode() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 1));
        let mut check = CheckBox::new(true).with_mark_color(Color::Green);
        check.write_display(true);

        let height = check.render(buf.area, &mut buf, false);

        assert_eq!(height, 1);
        assert_eq!(line_to_string(&buf, 0), "[✔]");
        assert_eq!(buf[(1, 0)].fg, Color::Green);
    }

    #[test]
    fn test_render_checked_ascii() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 1));
        let mut check = CheckBox::new(false);
        check.write_display(true);

        check.render(buf.area, &mut buf, false);

        assert_eq!(line_to_string(&buf, 0), "[X]");
    }

    #[test]
    fn test_render_unchecked() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 1));
        let check = CheckBox::new(true);

        check.render(buf.area, &mut buf, true);

        assert_eq!(line_to_string(&buf, 0), "[ ]");
    }
}
