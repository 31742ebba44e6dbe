#![forbid(unsafe_code)]

//! Editor configuration.
//!
//! [`EditorConfig`] gathers the tunables of an editing session: the commit
//! debounce window, the indent width, and the history depth. It can be built
//! in code, read from environment variables, or (with the `config-file`
//! feature) loaded from TOML or JSON.
//!
//! # Defaults
//!
//! | Field | Default | Range | Env var |
//! |-------|---------|-------|---------|
//! | `commit_debounce_ms` | 1000 | 50-10000 | `MDPOST_COMMIT_DEBOUNCE_MS` |
//! | `indent_width` | 2 | 1-8 | `MDPOST_INDENT_WIDTH` |
//! | `history_max_depth` | 1000 | 2-100000 | `MDPOST_HISTORY_MAX_DEPTH` |
//! | `seed_history` | false | | `MDPOST_SEED_HISTORY` |
//!
//! # Loading
//!
//! ```toml
//! # mdpost.toml
//! commit_debounce_ms = 750
//! indent_width = 4
//! ```
//!
//! ```rust,ignore
//! let config = EditorConfig::from_toml_file("mdpost.toml")?;
//! ```

#[cfg(feature = "config-file")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

use crate::rules::{DEFAULT_INDENT_WIDTH, indent_unit};

/// Default quiescence window before a burst of typing becomes an undo step.
pub const DEFAULT_COMMIT_DEBOUNCE_MS: u64 = 1000;

/// Minimum allowed commit debounce.
pub const MIN_COMMIT_DEBOUNCE_MS: u64 = 50;

/// Maximum allowed commit debounce.
pub const MAX_COMMIT_DEBOUNCE_MS: u64 = 10_000;

/// Minimum allowed indent width.
pub const MIN_INDENT_WIDTH: usize = 1;

/// Maximum allowed indent width.
pub const MAX_INDENT_WIDTH: usize = 8;

/// Default history depth.
pub const DEFAULT_HISTORY_MAX_DEPTH: usize = 1000;

/// Minimum history depth; one entry to stand on and one to go back to.
pub const MIN_HISTORY_MAX_DEPTH: usize = 2;

/// Maximum history depth.
pub const MAX_HISTORY_MAX_DEPTH: usize = 100_000;

/// Configuration for one editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct EditorConfig {
    /// Quiescence window, in milliseconds, before a pending commit is
    /// written to history.
    pub commit_debounce_ms: u64,

    /// Spaces inserted by Tab and removed by Shift+Tab.
    pub indent_width: usize,

    /// Maximum number of history entries kept; oldest are evicted first.
    pub history_max_depth: usize,

    /// Record the mounted default value as the first history entry.
    ///
    /// Off by default: the first entry is the first committed burst.
    pub seed_history: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            commit_debounce_ms: DEFAULT_COMMIT_DEBOUNCE_MS,
            indent_width: DEFAULT_INDENT_WIDTH,
            history_max_depth: DEFAULT_HISTORY_MAX_DEPTH,
            seed_history: false,
        }
    }
}

impl EditorConfig {
    /// Set the commit debounce window.
    #[must_use]
    pub fn with_commit_debounce(mut self, window: Duration) -> Self {
        self.commit_debounce_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the indent width.
    #[must_use]
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set the history depth.
    #[must_use]
    pub fn with_history_max_depth(mut self, depth: usize) -> Self {
        self.history_max_depth = depth;
        self
    }

    /// Record the default value as the first history entry.
    #[must_use]
    pub fn with_seed_history(mut self, seed: bool) -> Self {
        self.seed_history = seed;
        self
    }

    /// The commit debounce window.
    #[must_use]
    pub fn commit_debounce(&self) -> Duration {
        Duration::from_millis(self.commit_debounce_ms)
    }

    /// The indent unit (`indent_width` spaces).
    #[must_use]
    pub fn indent_unit(&self) -> String {
        indent_unit(self.indent_width)
    }

    /// Load config from environment variables.
    ///
    /// Reads:
    /// - `MDPOST_COMMIT_DEBOUNCE_MS`: commit debounce in milliseconds
    /// - `MDPOST_INDENT_WIDTH`: indent width in spaces
    /// - `MDPOST_HISTORY_MAX_DEPTH`: history depth
    /// - `MDPOST_SEED_HISTORY`: "1" or "true" to seed history at mount
    ///
    /// Unparseable values are ignored; the result is [`validated`](Self::validated).
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load config through an arbitrary key lookup (environment stand-in).
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("MDPOST_COMMIT_DEBOUNCE_MS")
            && let Ok(ms) = val.trim().parse::<u64>()
        {
            config.commit_debounce_ms = ms;
        }

        if let Some(val) = lookup("MDPOST_INDENT_WIDTH")
            && let Ok(width) = val.trim().parse::<usize>()
        {
            config.indent_width = width;
        }

        if let Some(val) = lookup("MDPOST_HISTORY_MAX_DEPTH")
            && let Ok(depth) = val.trim().parse::<usize>()
        {
            config.history_max_depth = depth;
        }

        if let Some(val) = lookup("MDPOST_SEED_HISTORY") {
            let val = val.trim();
            config.seed_history = val == "1" || val.eq_ignore_ascii_case("true");
        }

        config.validated()
    }

    /// Clamp every field into its allowed range.
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.commit_debounce_ms = self
            .commit_debounce_ms
            .clamp(MIN_COMMIT_DEBOUNCE_MS, MAX_COMMIT_DEBOUNCE_MS);
        self.indent_width = self.indent_width.clamp(MIN_INDENT_WIDTH, MAX_INDENT_WIDTH);
        self.history_max_depth = self
            .history_max_depth
            .clamp(MIN_HISTORY_MAX_DEPTH, MAX_HISTORY_MAX_DEPTH);
        self
    }

    /// Check if every field is within its allowed range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// List out-of-range fields. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(MIN_COMMIT_DEBOUNCE_MS..=MAX_COMMIT_DEBOUNCE_MS).contains(&self.commit_debounce_ms) {
            errors.push(format!(
                "commit_debounce_ms must be in {MIN_COMMIT_DEBOUNCE_MS}..={MAX_COMMIT_DEBOUNCE_MS}, got {}",
                self.commit_debounce_ms
            ));
        }
        if !(MIN_INDENT_WIDTH..=MAX_INDENT_WIDTH).contains(&self.indent_width) {
            errors.push(format!(
                "indent_width must be in {MIN_INDENT_WIDTH}..={MAX_INDENT_WIDTH}, got {}",
                self.indent_width
            ));
        }
        if !(MIN_HISTORY_MAX_DEPTH..=MAX_HISTORY_MAX_DEPTH).contains(&self.history_max_depth) {
            errors.push(format!(
                "history_max_depth must be in {MIN_HISTORY_MAX_DEPTH}..={MAX_HISTORY_MAX_DEPTH}, got {}",
                self.history_max_depth
            ));
        }

        errors
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.checked()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.checked()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    #[cfg(feature = "config-file")]
    fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading an editor configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-file")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-file")]
    Json(serde_json::Error),
    /// Out-of-range values.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
