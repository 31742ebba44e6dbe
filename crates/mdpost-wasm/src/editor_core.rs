#![forbid(unsafe_code)]

//! Platform-independent editor core behind the `wasm-bindgen` exports.
//!
//! Owns the [`EditorSession`], the resolved [`EditorConfig`], and the stored
//! [`PosterSettings`]. Problems the page should see (bad config, unreadable
//! settings) go to a log buffer the host drains with `takeLogs`.

use mdpost_core::config::EditorConfig;
use mdpost_web::{EditorSession, PosterSettings, SettingsError, SurfaceUpdate};

pub(crate) struct EditorCore {
    session: EditorSession,
    config: EditorConfig,
    settings: PosterSettings,
    logs: Vec<String>,
}

impl EditorCore {
    /// Mount an editor. Without a default value the stored-settings default
    /// document is shown; a config that fails to parse or validate falls
    /// back to defaults and is logged.
    pub(crate) fn new(default_value: Option<&str>, config_json: Option<&str>) -> Self {
        let mut logs = Vec::new();
        let config = match config_json {
            None => EditorConfig::default(),
            Some(json) => EditorConfig::from_json_str(json).unwrap_or_else(|err| {
                logs.push(format!("config: {err}"));
                EditorConfig::default()
            }),
        };
        let settings = PosterSettings::default();
        let session =
            EditorSession::new(default_value.unwrap_or(settings.md_string.as_str()), &config);
        Self {
            session,
            config,
            settings,
            logs,
        }
    }

    // ========================================================================
    // Host events
    // ========================================================================

    pub(crate) fn push_encoded_input(&mut self, json: &str, now_ms: f64) -> bool {
        self.session.push_encoded(json, now_ms)
    }

    pub(crate) fn input(&mut self, value: &str, start: u32, end: u32, now_ms: f64) {
        self.session.input(value, start, end, now_ms);
    }

    pub(crate) fn set_selection(&mut self, start: u32, end: u32) {
        self.session.select(start, end);
    }

    pub(crate) fn tick(&mut self, now_ms: f64) -> bool {
        self.session.tick(now_ms)
    }

    pub(crate) fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub(crate) fn redo(&mut self) -> bool {
        self.session.redo()
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Replace the settings and remount on their document.
    ///
    /// History starts over. Returns `false` (and logs) when `json` is
    /// unreadable; the current session is kept.
    pub(crate) fn load_settings(&mut self, json: &str) -> bool {
        match PosterSettings::from_json_str(json) {
            Ok(settings) => {
                self.session = EditorSession::from_settings(&settings, &self.config);
                self.settings = settings;
                true
            }
            Err(err) => {
                self.logs.push(format!("settings: {err}"));
                false
            }
        }
    }

    /// Settings with the current document, ready for `localStorage`.
    pub(crate) fn settings_json(&self) -> Result<String, SettingsError> {
        self.settings
            .clone()
            .with_md_string(self.session.value())
            .to_json_string()
    }

    // ========================================================================
    // Outboxes and queries
    // ========================================================================

    pub(crate) fn drain_updates(&mut self) -> Vec<SurfaceUpdate> {
        self.session.drain_updates()
    }

    pub(crate) fn drain_changes(&mut self) -> Vec<String> {
        self.session.drain_changes()
    }

    pub(crate) fn take_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs)
    }

    pub(crate) fn value(&self) -> &str {
        self.session.value()
    }

    pub(crate) fn next_deadline(&self) -> Option<f64> {
        self.session.next_deadline_ms()
    }

    pub(crate) fn can_undo(&self) -> bool {
        self.session.controller().history().can_undo()
    }

    pub(crate) fn can_redo(&self) -> bool {
        self.session.controller().history().can_redo()
    }
}
