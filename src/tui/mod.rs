// Interactive editor: one form of bound preferences in the terminal
use std::io;
use std::time::Duration;

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    Terminal,
};

use crate::config::Config;
use crate::control::{Container, Palette};
use crate::form::SettingsForm;
use crate::preferences::Preferences;

/// Poll interval for keyboard events
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

const HELP_TEXT: &str = "Tab/↑↓ move · Enter commit · Space toggle · ←→ choose · Esc quit";

/// Rows reserved above and below the form
const HEADER_HEIGHT: u16 = 2;
const FOOTER_HEIGHT: u16 = 1;

/// Main entry point for the editor
///
/// Returns once the user quits. The focused row is committed and every
/// binding detached before the terminal is restored.
pub fn run(prefs: &Preferences, config: &Config) -> Result<(), io::Error> {
    // Setup terminal
    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let palette = Palette::from_theme(&config.theme, config.use_unicode);
    let mut form = SettingsForm::new(palette);
    prefs.build_form(&mut form);
    tracing::info!("TUI: editing {} settings", form.len());

    let result = event_loop(&mut terminal, &mut form);

    form.blur();
    form.done();

    result
}

/// Raw mode and alternate screen, restored when dropped
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self, io::Error> {
        enable_raw_mode()?;
        // from here on an early return still drops the guard
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            tracing::warn!("TUI: failed to leave raw mode: {}", e);
        }
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    form: &mut SettingsForm,
) -> Result<(), io::Error> {
    loop {
        terminal.draw(|f| {
            let area = f.area();
            render_screen(form, area, f.buffer_mut());
        })?;

        if !event::poll(EVENT_POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if is_quit_key(key) {
                tracing::debug!("ACTION: Quitting editor");
                return Ok(());
            }
            let outcome = form.handle_key(key);
            tracing::trace!("KEY: {:?} -> {:?}", key.code, outcome);
        }
    }
}

fn is_quit_key(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => true,
        KeyCode::Char('c') | KeyCode::Char('q') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Draw header, form and status line
pub fn render_screen(form: &SettingsForm, area: Rect, buf: &mut Buffer) {
    if area.height <= HEADER_HEIGHT + FOOTER_HEIGHT {
        return;
    }
    let palette = form.palette();

    buf.set_stringn(
        area.x,
        area.y,
        " Settings",
        area.width as usize,
        Style::default().fg(palette.selection_fg).add_modifier(Modifier::BOLD),
    );

    let form_area = Rect::new(
        area.x,
        area.y + HEADER_HEIGHT,
        area.width,
        area.height - HEADER_HEIGHT - FOOTER_HEIGHT,
    );
    form.render(form_area, buf);

    let footer_y = area.bottom() - FOOTER_HEIGHT;
    let invalid = form.rows_in_error();
    let (text, style) = if invalid.is_empty() {
        (format!(" {}", HELP_TEXT), palette.disabled)
    } else {
        (format!(" Invalid value: {}", invalid.join(", ")), palette.error)
    };
    buf.set_stringn(area.x, footer_y, &text, area.width as usize, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{key, line_to_string, typed};

    #[test]
    fn test_quit_keys() {
        assert!(is_quit_key(key(KeyCode::Esc)));
        assert!(is_quit_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit_key(key(KeyCode::Char('q'))));
        assert!(!is_quit_key(key(KeyCode::Enter)));
    }

    #[test]
    fn test_dropping_guard_leaves_raw_mode() {
        drop(TerminalGuard);
        assert!(!crossterm::terminal::is_raw_mode_enabled().unwrap_or(false));
    }

    #[test]
    fn test_render_screen_layout() {
        let prefs = Preferences::new();
        let mut form = SettingsForm::new(Palette::default());
        prefs.build_form(&mut form);
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 16));

        render_screen(&form, buf.area, &mut buf);

        assert_eq!(line_to_string(&buf, 0), " Settings");
        assert!(line_to_string(&buf, 2).contains("Title"));
        assert!(line_to_string(&buf, 2).contains("Untitled█"));
        assert!(line_to_string(&buf, 15).starts_with(" Tab/↑↓ move"));
    }

    #[test]
    fn test_render_screen_reports_invalid_rows() {
        let prefs = Preferences::new();
        let mut form = SettingsForm::new(Palette::default());
        prefs.build_form(&mut form);
        form.set_focus(1);
        for k in typed("x") {
            form.handle_key(k);
        }
        form.handle_key(key(KeyCode::Enter));
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 16));

        render_screen(&form, buf.area, &mut buf);

        assert_eq!(
            line_to_string(&buf, 15),
            " Invalid value: Refresh Interval (s)"
        );
        assert_eq!(prefs.refresh_interval.get(), 60);
    }

    #[test]
    fn test_render_screen_too_small() {
        let form = SettingsForm::new(Palette::default());
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 3));
        render_screen(&form, buf.area, &mut buf);
        assert_eq!(line_to_string(&buf, 0), "");
    }
}
