/// Setting kinds
///
/// A kind decides the value type of a setting and how that value converts
/// to and from its canonical text.
use std::fmt;

use ratatui::style::Color;

use crate::config::{format_color, parse_color};
use crate::error::InvalidType;

pub trait SettingKind: 'static {
    type Value: Clone + PartialEq + fmt::Debug + 'static;

    /// Short name used in error messages
    fn type_name(&self) -> &'static str;

    fn to_text(&self, value: &Self::Value) -> String;

    fn from_text(&self, text: &str) -> Result<Self::Value, InvalidType>;
}

/// Free text, every string is valid
#[derive(Debug, Clone, Copy, Default)]
pub struct Str;

impl SettingKind for Str {
    type Value = String;

    fn type_name(&self) -> &'static str {
        "string"
    }

    fn to_text(&self, value: &String) -> String {
        value.clone()
    }

    fn from_text(&self, text: &str) -> Result<String, InvalidType> {
        Ok(text.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Bool;

impl SettingKind for Bool {
    type Value = bool;

    fn type_name(&self) -> &'static str {
        "bool"
    }

    fn to_text(&self, value: &bool) -> String {
        value.to_string()
    }

    fn from_text(&self, text: &str) -> Result<bool, InvalidType> {
        match text.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(InvalidType::new(self.type_name(), text)),
        }
    }
}

/// Signed integer with optional inclusive bounds
#[derive(Debug, Clone, Copy, Default)]
pub struct Int {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl Int {
    pub fn range(min: i64, max: i64) -> Self {
        Int {
            min: Some(min),
            max: Some(max),
        }
    }
}

impl SettingKind for Int {
    type Value = i64;

    fn type_name(&self) -> &'static str {
        "int"
    }

    fn to_text(&self, value: &i64) -> String {
        value.to_string()
    }

    fn from_text(&self, text: &str) -> Result<i64, InvalidType> {
        let value = text
            .trim()
            .parse::<i64>()
            .map_err(|e| InvalidType::new(self.type_name(), text).with_reason(e.to_string()))?;
        check_bounds(self.type_name(), text, value, self.min, self.max)
    }
}

/// Finite floating point number with optional inclusive bounds
#[derive(Debug, Clone, Copy, Default)]
pub struct Float {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Float {
    pub fn range(min: f64, max: f64) -> Self {
        Float {
            min: Some(min),
            max: Some(max),
        }
    }
}

impl SettingKind for Float {
    type Value = f64;

    fn type_name(&self) -> &'static str {
        "float"
    }

    fn to_text(&self, value: &f64) -> String {
        value.to_string()
    }

    fn from_text(&self, text: &str) -> Result<f64, InvalidType> {
        let value = text
            .trim()
            .parse::<f64>()
            .map_err(|e| InvalidType::new(self.type_name(), text).with_reason(e.to_string()))?;
        if !value.is_finite() {
            return Err(InvalidType::new(self.type_name(), text).with_reason("not a finite number"));
        }
        check_bounds(self.type_name(), text, value, self.min, self.max)
    }
}

fn check_bounds<T: PartialOrd + fmt::Display>(
    type_name: &'static str,
    text: &str,
    value: T,
    min: Option<T>,
    max: Option<T>,
) -> Result<T, InvalidType> {
    if let Some(min) = min {
        if value < min {
            return Err(InvalidType::new(type_name, text).with_reason(format!("below minimum {}", min)));
        }
    }
    if let Some(max) = max {
        if value > max {
            return Err(InvalidType::new(type_name, text).with_reason(format!("above maximum {}", max)));
        }
    }
    Ok(value)
}

/// One of a fixed, ordered list of options
#[derive(Debug, Clone, Default)]
pub struct Choice {
    options: Vec<String>,
}

impl Choice {
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Choice {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }
}

impl SettingKind for Choice {
    type Value = String;

    fn type_name(&self) -> &'static str {
        "choice"
    }

    fn to_text(&self, value: &String) -> String {
        value.clone()
    }

    fn from_text(&self, text: &str) -> Result<String, InvalidType> {
        if self.options.iter().any(|o| o == text) {
            Ok(text.to_string())
        } else {
            Err(InvalidType::new(self.type_name(), text)
                .with_reason(format!("expected one of: {}", self.options.join(", "))))
        }
    }
}

/// Terminal colour: named, `#rgb`, `#rrggbb` or `r,g,b`
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorKind;

impl SettingKind for ColorKind {
    type Value = Color;

    fn type_name(&self) -> &'static str {
        "color"
    }

    fn to_text(&self, value: &Color) -> String {
        format_color(*value)
    }

    fn from_text(&self, text: &str) -> Result<Color, InvalidType> {
        parse_color(text).ok_or_else(|| InvalidType::new(self.type_name(), text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_accepts_anything() {
        assert_eq!(Str.from_text("").unwrap(), "");
        assert_eq!(Str.from_text("  spaced  ").unwrap(), "  spaced  ");
        assert_eq!(Str.from_text("two\nlines").unwrap(), "two\nlines");
    }

    #[test]
    fn test_bool_spellings() {
        assert_eq!(Bool.from_text("true"), Ok(true));
        assert_eq!(Bool.from_text("Yes"), Ok(true));
        assert_eq!(Bool.from_text(" 1 "), Ok(true));
        assert_eq!(Bool.from_text("OFF"), Ok(false));
        assert_eq!(Bool.from_text("0"), Ok(false));
        assert!(Bool.from_text("maybe").is_err());
        assert_eq!(Bool.to_text(&true), "true");
    }

    #[test]
    fn test_int_bounds() {
        let kind = Int::range(1, 10);
        assert_eq!(kind.from_text("5"), Ok(5));
        assert_eq!(kind.from_text(" 10 "), Ok(10));
        let err = kind.from_text("11").unwrap_err();
        assert_eq!(err.reason.as_deref(), Some("above maximum 10"));
        assert!(kind.from_text("0").is_err());
        assert!(kind.from_text("five").is_err());
        assert!(kind.from_text("").is_err());
    }

    #[test]
    fn test_int_unbounded() {
        assert_eq!(Int::default().from_text("-42"), Ok(-42));
    }

    #[test]
    fn test_float_parse_and_text() {
        let kind = Float::range(0.0, 100.0);
        assert_eq!(kind.from_text("0.5"), Ok(0.5));
        assert_eq!(kind.to_text(&2.0), "2");
        assert_eq!(kind.to_text(&0.25), "0.25");
        assert!(kind.from_text("-0.1").is_err());
        assert!(kind.from_text("NaN").is_err());
        assert!(Float::default().from_text("inf").is_err());
    }

    #[test]
    fn test_choice_requires_listed_option() {
        let kind = Choice::new(["a", "b", "c"]);
        assert_eq!(kind.from_text("c"), Ok("c".to_string()));
        assert!(kind.from_text("z").is_err());
        assert!(kind.from_text("C").is_err());
        assert_eq!(kind.options(), &["a", "b", "c"]);
    }

    #[test]
    fn test_color_kind() {
        assert_eq!(ColorKind.from_text("cyan"), Ok(Color::Cyan));
        assert_eq!(ColorKind.from_text("#f60"), Ok(Color::Rgb(255, 102, 0)));
        assert_eq!(ColorKind.to_text(&Color::Rgb(255, 102, 0)), "#ff6600");
        assert_eq!(ColorKind.to_text(&Color::Cyan), "cyan");
        assert!(ColorKind.from_text("not-a-colour").is_err());
    }
}
