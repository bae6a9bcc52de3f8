/// Preferences edited by the application
///
/// Every preference is a shared `Setting`; the editor binds controls to
/// them and persistence goes through the config file's `[settings]` table.
use std::collections::BTreeMap;
use std::rc::Rc;

use ratatui::style::Color;
use tracing::{debug, warn};

use crate::form::SettingsForm;
use crate::setting::{AnySetting, Bool, Choice, ColorKind, Float, Int, Setting, Str};

pub const MARKERS: &[&str] = &["none", "circle", "square", "diamond", "cross"];

/// Offered in the font box; any other family name can be typed
pub const FONT_SUGGESTIONS: &[&str] = &["Sans", "Serif", "Monospace"];

pub struct Preferences {
    pub title: Rc<Setting<Str>>,
    pub refresh_interval: Rc<Setting<Int>>,
    pub line_width: Rc<Setting<Float>>,
    pub show_grid: Rc<Setting<Bool>>,
    pub marker: Rc<Setting<Choice>>,
    pub font: Rc<Setting<Str>>,
    pub accent: Rc<Setting<ColorKind>>,
    pub notes: Rc<Setting<Str>>,
    pub version: Rc<Setting<Str>>,
}

impl Preferences {
    pub fn new() -> Self {
        Preferences {
            title: Setting::new("title", Str, "Untitled".to_string())
                .with_description("Title shown above the plot")
                .shared(),
            refresh_interval: Setting::new("refresh_interval", Int::range(1, 3600), 60)
                .with_description("Seconds between data reloads")
                .shared(),
            line_width: Setting::new("line_width", Float::range(0.0, 100.0), 0.5)
                .with_description("Line width in points")
                .shared(),
            show_grid: Setting::new("show_grid", Bool, true)
                .with_description("Draw grid lines")
                .shared(),
            marker: Setting::new("marker", Choice::new(MARKERS.iter().copied()), "circle".to_string())
                .with_description("Point marker shape")
                .shared(),
            font: Setting::new("font", Str, "Sans".to_string())
                .with_description("Font family")
                .shared(),
            accent: Setting::new("accent", ColorKind, Color::Rgb(255, 165, 0))
                .with_description("Accent colour")
                .shared(),
            notes: Setting::new("notes", Str, String::new())
                .with_description("Free-form notes")
                .shared(),
            version: Setting::new("version", Str, env!("CARGO_PKG_VERSION").to_string())
                .with_description("Program version")
                .with_readonly(true)
                .shared(),
        }
    }

    /// All preferences in display order
    pub fn all(&self) -> Vec<Rc<dyn AnySetting>> {
        vec![
            self.title.clone() as Rc<dyn AnySetting>,
            self.refresh_interval.clone() as Rc<dyn AnySetting>,
            self.line_width.clone() as Rc<dyn AnySetting>,
            self.show_grid.clone() as Rc<dyn AnySetting>,
            self.marker.clone() as Rc<dyn AnySetting>,
            self.font.clone() as Rc<dyn AnySetting>,
            self.accent.clone() as Rc<dyn AnySetting>,
            self.notes.clone() as Rc<dyn AnySetting>,
            self.version.clone() as Rc<dyn AnySetting>,
        ]
    }

    pub fn find(&self, name: &str) -> Option<Rc<dyn AnySetting>> {
        self.all().into_iter().find(|s| s.name() == name)
    }

    /// Apply stored texts; returns how many values changed
    ///
    /// Unknown names, readonly settings and unparsable texts are skipped.
    pub fn load(&self, stored: &BTreeMap<String, String>) -> usize {
        let mut changed = 0;
        for (name, text) in stored {
            let Some(setting) = self.find(name) else {
                warn!("CONFIG: ignoring unknown setting {}", name);
                continue;
            };
            if setting.readonly() {
                warn!("CONFIG: ignoring readonly setting {}", name);
                continue;
            }
            match setting.set_text(text) {
                Ok(true) => changed += 1,
                Ok(false) => {}
                Err(e) => warn!("CONFIG: ignoring stored {}: {}", name, e),
            }
        }
        debug!("CONFIG: loaded {} stored settings", changed);
        changed
    }

    /// Write non-default values into `stored`, dropping defaults
    pub fn store(&self, stored: &mut BTreeMap<String, String>) {
        for setting in self.all() {
            if setting.readonly() {
                continue;
            }
            if setting.is_default() {
                stored.remove(setting.name());
            } else {
                stored.insert(setting.name().to_string(), setting.to_text());
            }
        }
    }

    /// Add one row per preference to `form`
    pub fn build_form(&self, form: &mut SettingsForm) {
        form.add_line_edit("Title", &self.title);
        form.add_line_edit("Refresh Interval (s)", &self.refresh_interval);
        form.add_line_edit("Line Width", &self.line_width);
        form.add_check_box("Show Grid", &self.show_grid);
        form.add_choice("Marker", &self.marker, MARKERS.iter().copied(), false);
        form.add_choice("Font", &self.font, FONT_SUGGESTIONS.iter().copied(), true);
        form.add_line_edit("Accent Color", &self.accent);
        form.add_multi_line("Notes", &self.notes);
        form.add_line_edit("Version", &self.version);
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new()
    }
}
