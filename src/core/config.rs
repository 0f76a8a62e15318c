//! Server configuration from environment variables.
//!
//! Load configuration using `Config::from_env()` after calling `dotenvy::dotenv()`.

use super::error::{EffectError, EffectResult};
use super::settings::EffectSettings;

/// Server-side configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of a JSON file overriding effect settings
    /// Example: ./config/effects.json
    pub effects_path: Option<String>,

    /// DOM event that makes the client re-bind after the host swaps content
    pub rebind_event: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` before this to load from `.env` file.
    pub fn from_env() -> Self {
        Self {
            effects_path: std::env::var("FEVA_EFFECTS_PATH").ok(),
            rebind_event: std::env::var("FEVA_REBIND_EVENT")
                .ok()
                .filter(|event| !event.trim().is_empty()),
        }
    }

    /// Check if a settings file is configured
    pub fn has_effects_file(&self) -> bool {
        self.effects_path.is_some()
    }

    /// Effect settings for rendered pages: defaults, then the settings
    /// file, then individual environment overrides.
    pub fn effect_settings(&self) -> EffectResult<EffectSettings> {
        let mut settings = match &self.effects_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| EffectError::SettingsFile {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                EffectSettings::from_json(&raw)?
            }
            None => EffectSettings::default(),
        };

        if let Some(event) = &self.rebind_event {
            settings.rebind_event = event.clone();
        }
        Ok(settings)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    // ========================================================================
    // Config Struct Tests (no env var dependencies - thread safe)
    // ========================================================================

    fn temp_settings_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("feva-{}-{name}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_no_file_gives_defaults() {
        let config = Config {
            effects_path: None,
            rebind_event: None,
        };

        assert!(!config.has_effects_file());
        assert_eq!(config.effect_settings().unwrap(), EffectSettings::default());
    }

    #[test]
    fn test_rebind_event_override() {
        let config = Config {
            effects_path: None,
            rebind_event: Some("cms:swapped".to_string()),
        };

        let settings = config.effect_settings().unwrap();
        assert_eq!(settings.rebind_event, "cms:swapped");
        assert_eq!(settings.rebind_delay_ms, 100);
    }

    #[test]
    fn test_settings_file_is_merged_over_defaults() {
        let path = temp_settings_file(
            "merge",
            &json!({ "carousel": { "interval_ms": 8000 } }).to_string(),
        );
        let config = Config {
            effects_path: Some(path.to_string_lossy().into_owned()),
            rebind_event: None,
        };

        let settings = config.effect_settings().unwrap();
        assert_eq!(settings.carousel.interval_ms, 8000);
        assert_eq!(settings.counter.steps, 50);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let config = Config {
            effects_path: Some("/nonexistent/feva/effects.json".to_string()),
            rebind_event: None,
        };

        assert!(matches!(
            config.effect_settings(),
            Err(EffectError::SettingsFile { .. })
        ));
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let path = temp_settings_file("broken", "{ roadmap: ");
        let config = Config {
            effects_path: Some(path.to_string_lossy().into_owned()),
            rebind_event: None,
        };

        assert!(matches!(
            config.effect_settings(),
            Err(EffectError::InvalidSettings(_))
        ));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_out_of_range_file_is_reported() {
        let path = temp_settings_file("range", r#"{ "matrix": { "highlight_chance": 1.5 } }"#);
        let config = Config {
            effects_path: Some(path.to_string_lossy().into_owned()),
            rebind_event: None,
        };

        assert!(matches!(
            config.effect_settings(),
            Err(EffectError::SettingOutOfRange {
                field: "matrix.highlight_chance",
                ..
            })
        ));
        let _ = std::fs::remove_file(path);
    }
}
