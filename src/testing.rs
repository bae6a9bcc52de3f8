/// Testing utilities shared by the unit tests
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;

/// A key press without modifiers
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Key presses for every character of `text`
pub fn typed(text: &str) -> Vec<KeyEvent> {
    text.chars().map(|c| key(KeyCode::Char(c))).collect()
}

/// One buffer row as text, trailing blanks removed
pub fn line_to_string(buf: &Buffer, y: u16) -> String {
    let mut result = String::new();
    for x in 0..buf.area.width {
        if let Some(cell) = buf.cell((buf.area.x + x, y)) {
            result.push_str(cell.symbol());
        }
    }
    result.trim_end().to_string()
}

/// Convert a buffer to a string representation, one line per row
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    (area.y..area.bottom())
        .map(|y| line_to_string(buf, y))
        .collect::<Vec<_>>()
        .join("\n")
}
