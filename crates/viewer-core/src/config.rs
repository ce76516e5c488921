//! Viewer configuration.
//!
//! Every field has a default, so a partial JSON document deserializes into a
//! complete configuration.

use doc_model::{ViewportSize, WHITE};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Accept pointer input and tool changes. Read-only viewers still replay.
    pub editable: bool,
    /// Surface size used for the loading and error placeholders.
    pub placeholder_size: ViewportSize,
    pub loading_message: String,
    pub placeholder_font_px: f64,
    pub background: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            editable: true,
            placeholder_size: ViewportSize::new(800, 600),
            loading_message: "Loading PDF...".to_owned(),
            placeholder_font_px: 24.0,
            background: WHITE.to_owned(),
        }
    }
}

impl ViewerConfig {
    pub fn read_only() -> Self {
        Self { editable: false, ..Self::default() }
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_placeholder_size(mut self, size: ViewportSize) -> Self {
        self.placeholder_size = size;
        self
    }

    pub fn with_loading_message(mut self, message: impl Into<String>) -> Self {
        self.loading_message = message.into();
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = color.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{ "editable": false }"#).expect("config should parse");

        assert!(!config.editable);
        assert_eq!(config.placeholder_size, ViewportSize::new(800, 600));
        assert_eq!(config.loading_message, "Loading PDF...");
    }

    #[test]
    fn builders_override_fields() {
        let config = ViewerConfig::default()
            .with_editable(false)
            .with_placeholder_size(ViewportSize::new(320, 200))
            .with_loading_message("Fetching...");

        assert_eq!(config, ViewerConfig {
            editable: false,
            placeholder_size: ViewportSize::new(320, 200),
            loading_message: "Fetching...".to_owned(),
            ..ViewerConfig::default()
        });
    }
}
