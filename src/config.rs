// src/config.rs

//! Font configuration shared between the viewport and its embedding
//! application.
//!
//! The configuration is deliberately small: the two font properties that
//! affect terminal layout. Values are kept as the strings the host platform
//! applies verbatim (e.g. `"14px"`, `"monospace"`), so a round trip through
//! the platform's style system is lossless.
//!
//! There is no global configuration instance. Callers own a
//! `SharedFontConfig` handle and pass it to the components that need it;
//! the propagation operations on `ViewportManager` write through it.

use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Font settings for the terminal surface and surrounding chrome.
///
/// Deserializable from a JSON configuration file; missing fields fall back
/// to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Font size in the platform's notation, e.g. `"14px"`.
    pub size: String,
    /// Font family in the platform's notation, e.g. `"monospace"`.
    pub family: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        FontConfig {
            size: "14px".to_string(),
            family: "monospace".to_string(),
        }
    }
}

impl FontConfig {
    /// Loads the configuration from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<FontConfig> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading font config from {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing font config from {}", path.display()))?;
        Ok(config)
    }

    /// Loads the configuration from a JSON file, falling back to the
    /// defaults (with a warning) if the file is missing or malformed.
    pub fn load_or_default(path: &Path) -> FontConfig {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Config: {:#}, using defaults", e);
                FontConfig::default()
            }
        }
    }

    /// Wraps the configuration in the shared handle the viewport works with.
    pub fn into_shared(self) -> SharedFontConfig {
        Rc::new(RefCell::new(self))
    }
}

/// Shared handle to the font configuration.
///
/// Single-threaded by design: the viewport assumes the event-loop model of
/// its host and provides no locking.
pub type SharedFontConfig = Rc<RefCell<FontConfig>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = FontConfig::default();
        assert_eq!(config.size, "14px");
        assert_eq!(config.family, "monospace");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: FontConfig = serde_json::from_str(r#"{ "size": "18px" }"#).unwrap();
        assert_eq!(config.size, "18px");
        assert_eq!(config.family, "monospace");
    }

    #[test]
    fn round_trips_through_json() {
        let config = FontConfig {
            size: "12px".to_string(),
            family: "Fira Code".to_string(),
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: FontConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn load_or_default_survives_a_missing_file() {
        let config = FontConfig::load_or_default(Path::new("/nonexistent/font.json"));
        assert_eq!(config, FontConfig::default());
    }

    #[test]
    fn shared_handle_sees_writes() {
        let shared = FontConfig::default().into_shared();
        shared.borrow_mut().size = "20px".to_string();
        assert_eq!(shared.borrow().size, "20px");
    }
}
