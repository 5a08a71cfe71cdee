//! FFprobe adapter for media file probing
//!
//! Reads the container duration with `ffprobe -of json`.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::domain::model::MediaTime;
use crate::error::{SplitClipError, SplitClipResult};
use crate::ports::*;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: ProbeFormat,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// FFprobe-based probe adapter
#[derive(Debug, Clone)]
pub struct FFprobeAdapter {
    binary: PathBuf,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter using the given binary
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Extract the duration from ffprobe's JSON output
    pub fn parse_duration(json: &[u8]) -> SplitClipResult<MediaTime> {
        let parsed: ProbeOutput = serde_json::from_slice(json)?;
        let raw = parsed.format.duration.ok_or_else(|| SplitClipError::ProbeError {
            message: "Could not determine media duration".to_string(),
        })?;
        let seconds: f64 = raw.trim().parse().map_err(|_| SplitClipError::ProbeError {
            message: format!("Unreadable duration '{}'", raw),
        })?;
        MediaTime::from_seconds(seconds)
            .filter(|d| *d > MediaTime::zero())
            .ok_or_else(|| SplitClipError::ProbeError {
                message: format!("Invalid media duration {}", seconds),
            })
    }
}

impl Default for FFprobeAdapter {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_duration(&self, path: &Path) -> SplitClipResult<MediaTime> {
        let output = Command::new(&self.binary)
            .args(["-v", "error", "-show_entries", "format=duration", "-of", "json"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| SplitClipError::ProbeError {
                message: format!("Failed to spawn {}: {}", self.binary.display(), e),
            })?;

        if !output.status.success() {
            return Err(SplitClipError::ProbeError {
                message: format!(
                    "ffprobe failed on {}: {}",
                    path.display(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Self::parse_duration(&output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        let json = br#"{ "format": { "duration": "10.000000" } }"#;
        let duration = FFprobeAdapter::parse_duration(json).unwrap();
        assert_eq!(duration, MediaTime::from_seconds(10.0).unwrap());
        assert_eq!(duration.timescale(), 600);
    }

    #[test]
    fn test_parse_missing_duration() {
        let json = br#"{ "format": {} }"#;
        assert!(matches!(
            FFprobeAdapter::parse_duration(json),
            Err(SplitClipError::ProbeError { .. })
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(FFprobeAdapter::parse_duration(b"not json").is_err());
        let json = br#"{ "format": { "duration": "N/A" } }"#;
        assert!(FFprobeAdapter::parse_duration(json).is_err());
        let json = br#"{ "format": { "duration": "0.0" } }"#;
        assert!(FFprobeAdapter::parse_duration(json).is_err());
    }
}
