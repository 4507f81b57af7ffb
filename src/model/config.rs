use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Application configuration from config.toml in the data directory.
/// Every field has a default; a missing file means all defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Named color overrides (e.g. accent = "#ffb300")
    #[serde(default)]
    pub colors: HashMap<String, String>,
    #[serde(default)]
    pub show_key_hints: bool,
}

/// Swipe and edge-navigation tuning. Values are gesture units (the TUI
/// driver scales terminal cells up to these).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    #[serde(default = "default_open_threshold")]
    pub open_threshold: f32,
    #[serde(default = "default_close_threshold")]
    pub close_threshold: f32,
    /// Width of the left-edge zone eligible for back-swipes (24–40)
    #[serde(default = "default_edge_zone")]
    pub edge_zone: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Quiet period before a draft is written, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Rows kept between the caret and the viewport edge
    #[serde(default = "default_caret_margin")]
    pub caret_margin: u16,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            open_threshold: default_open_threshold(),
            close_threshold: default_close_threshold(),
            edge_zone: default_edge_zone(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            debounce_ms: default_debounce_ms(),
            caret_margin: default_caret_margin(),
        }
    }
}

fn default_open_threshold() -> f32 {
    60.0
}

fn default_close_threshold() -> f32 {
    40.0
}

fn default_edge_zone() -> f32 {
    40.0
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_caret_margin() -> u16 {
    2
}
