// TOML config adapter - Layered configuration from defaults, file and environment

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::model::{Composition, DividePolicy, ExportConfiguration, Preset};
use crate::error::{SplitClipError, SplitClipResult};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "SPLITCLIP_";

/// Effective application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub preset: String,
    pub container: String,
    pub composition: String,
    pub divide_policy: String,
    pub divide_delay_ms: u64,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        let export = ExportConfiguration::default();
        Self {
            preset: export.preset.as_str().to_string(),
            container: export.container,
            composition: export.composition.as_str().to_string(),
            divide_policy: "sequential".to_string(),
            divide_delay_ms: DividePolicy::LEGACY_DELAY.as_millis() as u64,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn export_configuration(&self) -> SplitClipResult<ExportConfiguration> {
        let preset = Preset::parse(&self.preset).ok_or_else(|| SplitClipError::ConfigError {
            message: format!(
                "Unknown preset '{}'. Valid presets: highest-quality, medium, low-quality",
                self.preset
            ),
        })?;
        let container = self.container.trim().trim_start_matches('.').to_lowercase();
        if container.is_empty() {
            return Err(SplitClipError::ConfigError {
                message: "Container cannot be empty".to_string(),
            });
        }
        let composition =
            Composition::parse(&self.composition).ok_or_else(|| SplitClipError::ConfigError {
                message: format!(
                    "Unknown composition '{}'. Valid compositions: identity, reencode",
                    self.composition
                ),
            })?;
        Ok(ExportConfiguration {
            preset,
            container,
            composition,
        })
    }

    pub fn divide_policy(&self) -> SplitClipResult<DividePolicy> {
        DividePolicy::parse(
            &self.divide_policy,
            Some(Duration::from_millis(self.divide_delay_ms)),
        )
        .ok_or_else(|| SplitClipError::ConfigError {
            message: format!(
                "Unknown divide policy '{}'. Valid policies: sequential, fixed-delay",
                self.divide_policy
            ),
        })
    }

    /// Validate every setting
    pub fn validate(&self) -> SplitClipResult<()> {
        self.export_configuration()?;
        self.divide_policy()?;
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(SplitClipError::ConfigError {
                message: format!(
                    "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                    self.log_level
                ),
            }),
        }
    }
}

/// `[splitclip]` table as it appears in a config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsOverrides {
    preset: Option<String>,
    container: Option<String>,
    composition: Option<String>,
    divide_policy: Option<String>,
    divide_delay_ms: Option<u64>,
    ffmpeg_path: Option<String>,
    ffprobe_path: Option<String>,
    log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    splitclip: SettingsOverrides,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    settings: Settings,
}

impl TomlConfigAdapter {
    /// Create new TOML config adapter holding the defaults
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load configuration from file
    pub fn load_file(&mut self, path: &Path) -> SplitClipResult<()> {
        let content = std::fs::read_to_string(path).map_err(|e| SplitClipError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        self.load_str(&content)?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(())
    }

    /// Merge a TOML document over the current settings
    pub fn load_str(&mut self, content: &str) -> SplitClipResult<()> {
        let parsed: ConfigFile = toml::from_str(content)?;
        let overrides = parsed.splitclip;

        let s = &mut self.settings;
        if let Some(v) = overrides.preset {
            s.preset = v;
        }
        if let Some(v) = overrides.container {
            s.container = v;
        }
        if let Some(v) = overrides.composition {
            s.composition = v;
        }
        if let Some(v) = overrides.divide_policy {
            s.divide_policy = v;
        }
        if let Some(v) = overrides.divide_delay_ms {
            s.divide_delay_ms = v;
        }
        if let Some(v) = overrides.ffmpeg_path {
            s.ffmpeg_path = v;
        }
        if let Some(v) = overrides.ffprobe_path {
            s.ffprobe_path = v;
        }
        if let Some(v) = overrides.log_level {
            s.log_level = v;
        }
        Ok(())
    }

    /// Apply `SPLITCLIP_*` environment overrides; returns how many were applied
    pub fn apply_env(&mut self) -> SplitClipResult<usize> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F) -> SplitClipResult<usize>
    where
        F: Fn(&str) -> Option<String>,
    {
        let keys = [
            "preset",
            "container",
            "composition",
            "divide_policy",
            "divide_delay_ms",
            "ffmpeg_path",
            "ffprobe_path",
            "log_level",
        ];

        let mut applied = 0;
        for key in keys {
            let var = format!("{}{}", ENV_PREFIX, key.to_uppercase());
            if let Some(value) = lookup(&var) {
                tracing::debug!("Environment override: {} = {}", var, value);
                self.set(key, &value)?;
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Set a single configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> SplitClipResult<()> {
        let s = &mut self.settings;
        match key {
            "preset" => s.preset = value.to_string(),
            "container" => s.container = value.to_string(),
            "composition" => s.composition = value.to_string(),
            "divide_policy" => s.divide_policy = value.to_string(),
            "divide_delay_ms" => {
                s.divide_delay_ms = value.parse().map_err(|e| SplitClipError::ConfigError {
                    message: format!("Invalid divide_delay_ms value '{}': {}", value, e),
                })?
            }
            "ffmpeg_path" => s.ffmpeg_path = value.to_string(),
            "ffprobe_path" => s.ffprobe_path = value.to_string(),
            "log_level" => s.log_level = value.to_string(),
            other => {
                return Err(SplitClipError::ConfigError {
                    message: format!("Unknown configuration key: {}", other),
                })
            }
        }
        Ok(())
    }
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_fixed_configuration() {
        let adapter = TomlConfigAdapter::new();
        let export = adapter.settings().export_configuration().unwrap();
        assert_eq!(export, ExportConfiguration::default());
        assert_eq!(
            adapter.settings().divide_policy().unwrap(),
            DividePolicy::Sequential
        );
        adapter.settings().validate().unwrap();
    }

    #[test]
    fn test_load_str_overrides_defaults() {
        let mut adapter = TomlConfigAdapter::new();
        adapter
            .load_str(
                r#"
                [splitclip]
                preset = "medium"
                divide_policy = "fixed-delay"
                divide_delay_ms = 250
                "#,
            )
            .unwrap();

        let settings = adapter.settings();
        assert_eq!(settings.export_configuration().unwrap().preset, Preset::Medium);
        assert_eq!(settings.container, "mp4");
        assert_eq!(
            settings.divide_policy().unwrap(),
            DividePolicy::FixedDelay(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_unknown_key_in_file_is_rejected() {
        let mut adapter = TomlConfigAdapter::new();
        let err = adapter.load_str("[splitclip]\nquality = 3\n").unwrap_err();
        assert!(matches!(err, SplitClipError::TomlError(_)));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SPLITCLIP_CONTAINER", "mov"),
            ("SPLITCLIP_FFMPEG_PATH", "/opt/ffmpeg/bin/ffmpeg"),
        ]
        .into_iter()
        .collect();

        let mut adapter = TomlConfigAdapter::new();
        let applied = adapter
            .apply_env_with(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(applied, 2);
        assert_eq!(adapter.settings().container, "mov");
        assert_eq!(adapter.settings().ffmpeg_path, "/opt/ffmpeg/bin/ffmpeg");
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let mut adapter = TomlConfigAdapter::new();
        adapter.set("preset", "ultra").unwrap();
        assert!(adapter.settings().validate().is_err());

        let mut adapter = TomlConfigAdapter::new();
        adapter.set("log_level", "loud").unwrap();
        assert!(adapter.settings().validate().is_err());

        let mut adapter = TomlConfigAdapter::new();
        adapter.set("composition", "transcode").unwrap();
        assert!(adapter.settings().validate().is_err());

        let mut adapter = TomlConfigAdapter::new();
        assert!(adapter.set("divide_delay_ms", "soon").is_err());
        assert!(adapter.set("threads", "4").is_err());
    }

    #[test]
    fn test_composition_from_file() {
        let mut adapter = TomlConfigAdapter::new();
        adapter
            .load_str("[splitclip]\ncomposition = \"reencode\"\npreset = \"low-quality\"\n")
            .unwrap();

        let export = adapter.settings().export_configuration().unwrap();
        assert_eq!(export.composition, Composition::Reencode);
        assert_eq!(export.preset, Preset::LowQuality);
    }

    #[test]
    fn test_container_is_normalized() {
        let mut adapter = TomlConfigAdapter::new();
        adapter.set("container", ".MKV").unwrap();
        assert_eq!(
            adapter.settings().export_configuration().unwrap().container,
            "mkv"
        );
    }
}
