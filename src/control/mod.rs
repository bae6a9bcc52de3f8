/// Editable controls
///
/// Four control variants share one capability set (`Control`) that the
/// binding algorithm works against:
/// - `LineEdit`: single-line text
/// - `CheckBox`: boolean state
/// - `ChoiceBox`: option list, optionally accepting free text
/// - `MultiLineEdit`: plain multi-line text
///
/// Each variant also implements `Interactive` so a form can route key
/// events to it and draw it into a ratatui buffer.
pub mod check_box;
pub mod choice_box;
pub mod line_edit;
pub mod multi_line_edit;

pub use check_box::CheckBox;
pub use choice_box::ChoiceBox;
pub use line_edit::LineEdit;
pub use multi_line_edit::MultiLineEdit;

use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};

use crate::config::ThemeConfig;
use crate::error::InvalidType;
use crate::setting::{Bool, SettingKind};

/// Events that may start the control -> setting path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitEvent {
    /// Return pressed in a single-line field
    Submit,
    /// The control lost keyboard focus
    FocusLost,
    /// An option was chosen in a choice box
    Activated,
    /// A checkbox changed state
    Toggled,
}

/// Result of feeding a key to a control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Consumed,
    Commit(CommitEvent),
}

pub trait Control {
    type Display: Clone + PartialEq + fmt::Debug;

    fn read_display(&self) -> Self::Display;

    /// Replace what the control shows; never fires a commit event
    fn write_display(&mut self, value: Self::Display);

    fn style(&self) -> Style;
    fn set_style(&mut self, style: Style);

    fn is_editable(&self) -> bool;
    fn set_editable(&mut self, editable: bool);

    /// Whether this control commits its value on `event`
    fn commits_on(&self, event: CommitEvent) -> bool;
}

/// Key handling and drawing for controls hosted in a form
pub trait Interactive {
    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome;

    /// Draw into `area`, returning the number of rows used
    fn render(&self, area: Rect, buf: &mut Buffer, focused: bool) -> u16;

    fn height(&self) -> u16 {
        1
    }
}

/// Maps a control's display type to a setting value
pub trait DisplayValue<K: SettingKind>: Sized {
    fn parse(kind: &K, raw: &Self) -> Result<K::Value, InvalidType>;
    fn render(kind: &K, value: &K::Value) -> Self;
}

impl<K: SettingKind> DisplayValue<K> for String {
    fn parse(kind: &K, raw: &String) -> Result<K::Value, InvalidType> {
        kind.from_text(raw)
    }

    fn render(kind: &K, value: &K::Value) -> String {
        kind.to_text(value)
    }
}

impl DisplayValue<Bool> for bool {
    fn parse(_kind: &Bool, raw: &bool) -> Result<bool, InvalidType> {
        Ok(*raw)
    }

    fn render(_kind: &Bool, value: &bool) -> bool {
        *value
    }
}

/// Styles a parent container hands to its controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub normal: Style,
    pub error: Style,
    pub disabled: Style,
    pub selection_fg: Color,
    pub use_unicode: bool,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            normal: Style::default(),
            error: Style::default().bg(Color::Red),
            disabled: Style::default().add_modifier(Modifier::DIM),
            selection_fg: Color::Rgb(255, 165, 0), // Orange
            use_unicode: true,
        }
    }
}

impl Palette {
    pub fn from_theme(theme: &ThemeConfig, use_unicode: bool) -> Self {
        Palette {
            normal: Style::default().fg(theme.text_fg),
            error: Style::default().fg(theme.text_fg).bg(theme.error_bg),
            disabled: Style::default().fg(theme.disabled_fg()),
            selection_fg: theme.selection_fg,
            use_unicode,
        }
    }
}

/// The parent a binding's control is created in
pub trait Container {
    fn palette(&self) -> &Palette;
}

impl Container for Palette {
    fn palette(&self) -> &Palette {
        self
    }
}

/// Apply a text-editing key to `text`; the cursor is always at the end
///
/// Returns true if the key changed or belongs to the text.
pub(crate) fn edit_text(text: &mut String, key: KeyEvent, allow_newline: bool) -> bool {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return false;
    }
    match key.code {
        KeyCode::Char(c) => {
            text.push(c);
            true
        }
        KeyCode::Backspace => {
            text.pop();
            true
        }
        KeyCode::Enter if allow_newline => {
            text.push('\n');
            true
        }
        _ => false,
    }
}

/// Cursor glyph appended to focused, editable text
pub(crate) const CURSOR: &str = "█";
