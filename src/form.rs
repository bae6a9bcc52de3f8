/// SettingsForm - parent container for bound controls
///
/// Holds labelled bindings in display order with one focused row. Moving
/// focus away from a row delivers `FocusLost` to its binding, which is how
/// text fields and multi-line fields commit.
///
/// Each row renders as: margin + selection indicator + padded label + control.
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use std::rc::Rc;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::binding::{BoundControl, CheckBinding, ChoiceBinding, LineBinding, MultiLineBinding};
use crate::control::{Container, KeyOutcome, Palette};
use crate::setting::{Bool, Setting, SettingKind};

/// Margin between label and control (in spaces)
pub const KEY_VALUE_MARGIN: usize = 3;

/// Left margin before the selection indicator
pub const ROW_MARGIN: u16 = 2;

struct FormRow {
    label: String,
    binding: Box<dyn BoundControl>,
}

pub struct SettingsForm {
    palette: Palette,
    rows: Vec<FormRow>,
    focused: usize,
}

impl Container for SettingsForm {
    fn palette(&self) -> &Palette {
        &self.palette
    }
}

impl SettingsForm {
    pub fn new(palette: Palette) -> Self {
        SettingsForm {
            palette,
            rows: Vec::new(),
            focused: 0,
        }
    }

    pub fn push(&mut self, label: impl Into<String>, binding: impl BoundControl + 'static) {
        let label = label.into();
        debug!("FORM: added row {} for {}", label, binding.name());
        self.rows.push(FormRow {
            label,
            binding: Box::new(binding),
        });
    }

    pub fn add_line_edit<K: SettingKind>(&mut self, label: &str, setting: &Rc<Setting<K>>) {
        let binding = LineBinding::line_edit(setting, &*self);
        self.push(label, binding);
    }

    pub fn add_check_box(&mut self, label: &str, setting: &Rc<Setting<Bool>>) {
        let binding = CheckBinding::check_box(setting, &*self);
        self.push(label, binding);
    }

    pub fn add_choice<K, I, S>(
        &mut self,
        label: &str,
        setting: &Rc<Setting<K>>,
        options: I,
        free_text: bool,
    ) where
        K: SettingKind,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let binding = ChoiceBinding::choice(setting, options, free_text, &*self);
        self.push(label, binding);
    }

    pub fn add_multi_line<K: SettingKind>(&mut self, label: &str, setting: &Rc<Setting<K>>) {
        let binding = MultiLineBinding::multi_line(setting, &*self);
        self.push(label, binding);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    /// Setting name of the focused row
    pub fn focused_name(&self) -> Option<&str> {
        self.rows.get(self.focused).map(|row| row.binding.name())
    }

    /// Labels of rows whose control shows an invalid edit
    pub fn rows_in_error(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|row| row.binding.has_error())
            .map(|row| row.label.as_str())
            .collect()
    }

    /// Move focus to `index`, committing the row that loses it
    pub fn set_focus(&mut self, index: usize) {
        if index >= self.rows.len() || index == self.focused {
            return;
        }
        self.blur();
        self.focused = index;
    }

    pub fn focus_next(&mut self) {
        if self.focused + 1 < self.rows.len() {
            self.set_focus(self.focused + 1);
        }
    }

    pub fn focus_previous(&mut self) {
        if self.focused > 0 {
            self.set_focus(self.focused - 1);
        }
    }

    /// Deliver focus loss to the focused row without moving focus
    pub fn blur(&mut self) {
        if let Some(row) = self.rows.get_mut(self.focused) {
            row.binding.focus_lost();
        }
    }

    /// Route a key: Tab/BackTab always move focus, Up/Down move focus
    /// unless the focused control uses them
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Tab => {
                self.focus_next();
                return KeyOutcome::Consumed;
            }
            KeyCode::BackTab => {
                self.focus_previous();
                return KeyOutcome::Consumed;
            }
            _ => {}
        }

        let outcome = match self.rows.get_mut(self.focused) {
            Some(row) => row.binding.handle_key(key),
            None => return KeyOutcome::Ignored,
        };
        if outcome != KeyOutcome::Ignored {
            return outcome;
        }

        match key.code {
            KeyCode::Down => {
                self.focus_next();
                KeyOutcome::Consumed
            }
            KeyCode::Up => {
                self.focus_previous();
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Detach every binding from its setting
    pub fn done(&mut self) {
        for row in &mut self.rows {
            row.binding.done();
        }
        debug!("FORM: {} rows detached", self.rows.len());
    }

    fn label_width(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.label.width())
            .max()
            .unwrap_or(0)
    }

    /// Render all rows into `area`, returning the height used
    pub fn render(&self, area: Rect, buf: &mut Buffer) -> u16 {
        let label_width = self.label_width() + KEY_VALUE_MARGIN;
        let indicator = if self.palette.use_unicode { "► " } else { "> " };
        let mut y = area.y;

        for (index, row) in self.rows.iter().enumerate() {
            if y >= area.bottom() {
                break;
            }
            let is_focused = index == self.focused;
            let mut x = area.x + ROW_MARGIN;

            if is_focused {
                buf.set_string(x, y, indicator, Style::default().fg(self.palette.selection_fg));
            }
            x += 2;

            let padded_label = format!("{:<width$}", row.label, width = label_width);
            buf.set_stringn(
                x,
                y,
                &padded_label,
                area.right().saturating_sub(x) as usize,
                Style::default(),
            );
            x = x.saturating_add(padded_label.width() as u16);

            if x >= area.right() {
                y += 1;
                continue;
            }
            let control_area = Rect::new(x, y, area.right() - x, area.bottom() - y);
            let height = row.binding.render(control_area, buf, is_focused).max(1);
            y += height;
        }

        y - area.y
    }
}

impl Drop for SettingsForm {
    fn drop(&mut self) {
        self.done();
    }
}
