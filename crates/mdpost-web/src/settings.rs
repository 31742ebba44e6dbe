#![forbid(unsafe_code)]

//! Persisted poster settings document.
//!
//! The page stores the editor document together with the poster's fixed
//! elements under [`STORAGE_KEY`] in `localStorage`. The editor never reads
//! these fields; the session only takes `md_string` as its default value.
//! The type is kept here so hosts round-trip the document without losing
//! fields.
//!
//! Loading is forgiving: every field is optional and read on its own. A
//! missing, `null`, or mistyped field takes its default without affecting
//! its siblings, so a bad `padding` never costs the stored `mdString`. Only
//! malformed JSON or a non-object document is an error, and
//! [`PosterSettings::load_or_default`] never fails.
//!
//! `padding` accepts numbers and numeric strings, clamped to
//! `0..=`[`MAX_PADDING`]. A stored `0` stays `0`; older hosts treated it as
//! unset and showed [`DEFAULT_PADDING`] instead.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// `localStorage` key for the persisted document.
pub const STORAGE_KEY: &str = "markdown-to-image-config";

/// Default poster theme.
pub const DEFAULT_THEME: &str = "SpringGradientWave";

/// Default typography theme.
pub const DEFAULT_TYPOGRAPHY_THEME: &str = "base";

/// Default font size token.
pub const DEFAULT_FONT_SIZE: &str = "base";

/// Default padding step.
pub const DEFAULT_PADDING: u8 = 6;

/// Largest padding step.
pub const MAX_PADDING: u8 = 8;

/// Document shown when nothing has been saved yet.
pub const DEFAULT_DOCUMENT: &str = "# Weekly Notes

A plain Markdown document. Type on, then export it as a poster.

1. **Lists continue**: press Enter at the end of this line.
2. **Indentation**: Tab indents, Shift+Tab outdents.
- Bullets work with `-`, `*` and `+`.
  - Nested items keep their indent.
";

/// Errors from parsing a settings document.
#[derive(Debug)]
pub enum SettingsError {
    /// Malformed JSON or a field of the wrong type.
    Json(serde_json::Error),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
        }
    }
}

/// Poster settings and the editor document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PosterSettings {
    /// Poster title.
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    /// Author line.
    #[serde(deserialize_with = "lenient_string")]
    pub author: String,
    /// Print today's date on the poster.
    #[serde(deserialize_with = "lenient_bool")]
    pub show_date: bool,
    /// Brand line.
    #[serde(deserialize_with = "lenient_string")]
    pub brand_info: String,
    /// Copyright notice.
    #[serde(deserialize_with = "lenient_string")]
    pub copyright: String,
    /// Poster theme name.
    #[serde(deserialize_with = "lenient_string")]
    pub theme: String,
    /// Typography theme (`base`, `classic`, `vibrant`).
    #[serde(deserialize_with = "lenient_string")]
    pub typography_theme: String,
    /// Font size token (`sm`, `base`, `lg`, `xl`).
    #[serde(deserialize_with = "lenient_string")]
    pub font_size: String,
    /// Padding step, 0 to [`MAX_PADDING`].
    #[serde(deserialize_with = "lenient_padding")]
    pub padding: u8,
    /// The Markdown document.
    #[serde(deserialize_with = "lenient_string")]
    pub md_string: String,
}

impl Default for PosterSettings {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            show_date: false,
            brand_info: String::new(),
            copyright: String::new(),
            theme: DEFAULT_THEME.to_string(),
            typography_theme: DEFAULT_TYPOGRAPHY_THEME.to_string(),
            font_size: DEFAULT_FONT_SIZE.to_string(),
            padding: DEFAULT_PADDING,
            md_string: DEFAULT_DOCUMENT.to_string(),
        }
    }
}

impl PosterSettings {
    /// Parse a stored document.
    pub fn from_json_str(s: &str) -> Result<Self, SettingsError> {
        let value: Value = serde_json::from_str(s).map_err(SettingsError::Json)?;
        if !value.is_object() {
            return Err(SettingsError::Json(serde::de::Error::custom(
                "settings document is not a JSON object",
            )));
        }
        let settings: Self = serde_json::from_value(value).map_err(SettingsError::Json)?;
        Ok(settings.normalized())
    }

    /// Parse a stored document, falling back to defaults on any error.
    #[must_use]
    pub fn load_or_default(stored: Option<&str>) -> Self {
        let Some(stored) = stored else {
            return Self::default();
        };
        match Self::from_json_str(stored) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(error = %err, key = STORAGE_KEY, "discarding unreadable settings");
                Self::default()
            }
        }
    }

    /// Serialize for storage.
    pub fn to_json_string(&self) -> Result<String, SettingsError> {
        serde_json::to_string(self).map_err(SettingsError::Json)
    }

    /// Replace the document, keeping everything else.
    #[must_use]
    pub fn with_md_string(mut self, md: impl Into<String>) -> Self {
        self.md_string = md.into();
        self
    }

    /// Empty tokens fall back to defaults; padding is clamped.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.theme.is_empty() {
            self.theme = DEFAULT_THEME.to_string();
        }
        if self.typography_theme.is_empty() {
            self.typography_theme = DEFAULT_TYPOGRAPHY_THEME.to_string();
        }
        if self.font_size.is_empty() {
            self.font_size = DEFAULT_FONT_SIZE.to_string();
        }
        if self.md_string.is_empty() {
            self.md_string = DEFAULT_DOCUMENT.to_string();
        }
        self.padding = self.padding.min(MAX_PADDING);
        self
    }
}

// Mistyped strings become empty and are then normalized to their defaults.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

fn lenient_padding<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let step = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(match step {
        Some(step) if step.is_finite() => step.clamp(0.0, f64::from(MAX_PADDING)) as u8,
        _ => DEFAULT_PADDING,
    })
}
