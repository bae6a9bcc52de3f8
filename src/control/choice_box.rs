/// ChoiceBox - option list with optional free text
///
/// Displays "▼ current_option". Left/Right step through the options and
/// activate the new one; in editable mode the text can also be typed and
/// activated with Return. Focus loss commits whatever is shown.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{buffer::Buffer, layout::Rect, style::Style};

use super::{edit_text, CommitEvent, Control, Interactive, KeyOutcome, CURSOR};

#[derive(Debug, Clone)]
pub struct ChoiceBox {
    options: Vec<String>,
    text: String,
    free_text: bool,
    enabled: bool,
    use_unicode: bool,
    style: Style,
}

impl ChoiceBox {
    /// `free_text` allows values outside `options` to be typed
    pub fn new<I, S>(options: I, free_text: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ChoiceBox {
            options: options.into_iter().map(Into::into).collect(),
            text: String::new(),
            free_text,
            enabled: true,
            use_unicode: true,
            style: Style::default(),
        }
    }

    pub fn with_unicode(mut self, use_unicode: bool) -> Self {
        self.use_unicode = use_unicode;
        self
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn allows_free_text(&self) -> bool {
        self.free_text
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Index of the shown text in the option list
    pub fn current_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.text)
    }

    /// Show option `index` as if the user picked it; false if out of range
    pub fn select(&mut self, index: usize) -> bool {
        match self.options.get(index) {
            Some(option) => {
                self.text = option.clone();
                true
            }
            None => false,
        }
    }

    /// Replace the text as if the user typed it
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    fn step(&mut self, forward: bool) -> bool {
        let len = self.options.len();
        if len == 0 {
            return false;
        }
        let next = match (self.current_index(), forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        self.select(next)
    }
}

impl Control for ChoiceBox {
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
        self.enabled
    }

    fn set_editable(&mut self, editable: bool) {
        self.enabled = editable;
    }

    fn commits_on(&self, event: CommitEvent) -> bool {
        matches!(event, CommitEvent::Activated | CommitEvent::FocusLost)
    }
}

impl Interactive for ChoiceBox {
    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if !self.enabled {
            return KeyOutcome::Ignored;
        }
        match key.code {
            KeyCode::Left => {
                if self.step(false) {
                    KeyOutcome::Commit(CommitEvent::Activated)
                } else {
                    KeyOutcome::Consumed
                }
            }
            KeyCode::Right => {
                if self.step(true) {
                    KeyOutcome::Commit(CommitEvent::Activated)
                } else {
                    KeyOutcome::Consumed
                }
            }
            KeyCode::Enter => KeyOutcome::Commit(CommitEvent::Activated),
            _ => {
                if self.free_text && edit_text(&mut self.text, key, false) {
                    KeyOutcome::Consumed
                } else {
                    KeyOutcome::Ignored
                }
            }
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer, focused: bool) -> u16 {
        if area.height == 0 || area.width < 2 {
            return 0;
        }
        let arrow = if self.use_unicode { "▼ " } else { "v " };
        buf.set_string(area.x, area.y, arrow, Style::default());
        let shown = if self.text.is_empty() { " " } else { self.text.as_str() };
        let (x, _) = buf.set_stringn(
            area.x + 2,
            area.y,
            shown,
            area.width.saturating_sub(2) as usize,
            self.style,
        );
        if focused && self.enabled && self.free_text && x < area.right() {
            buf.set_string(x, area.y, CURSOR, Style::default());
        }
        1
    }
}
