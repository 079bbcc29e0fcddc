//! User preferences.

use serde::{Deserialize, Serialize};

/// Language codes offered by the settings screen.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "es", "fr", "de"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub notifications: bool,
    pub dark_mode: bool,
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications: true,
            dark_mode: false,
            language: "en".to_string(),
        }
    }
}

pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&code)
}
