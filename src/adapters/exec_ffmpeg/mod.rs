//! FFmpeg export adapter
//!
//! Runs each export through the `ffmpeg` binary as a child process.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::{ExportError, ExportResult};
use crate::domain::model::Composition;
use crate::ports::*;

/// Lines of ffmpeg stderr kept in an engine failure
const STDERR_TAIL_LINES: usize = 6;

/// FFmpeg-based export engine
#[derive(Debug, Clone)]
pub struct FFmpegExportAdapter {
    binary: PathBuf,
}

impl FFmpegExportAdapter {
    /// Create new FFmpeg adapter using the given binary
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Muxer name for a container extension
    pub fn muxer_for(container: &str) -> &str {
        match container {
            "mkv" => "matroska",
            "m4v" => "mp4",
            "ts" | "mts" | "m2ts" => "mpegts",
            other => other,
        }
    }

    /// Command line for one export, excluding the binary
    pub fn build_args(request: &EngineRequest) -> Vec<OsString> {
        let duration = request.range.duration();
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-nostdin".into(),
            "-loglevel".into(),
            "error".into(),
            "-y".into(),
            "-ss".into(),
            request.range.start.to_ffmpeg_arg().into(),
            "-t".into(),
            duration.to_ffmpeg_arg().into(),
            "-i".into(),
            request.source.as_os_str().to_owned(),
            "-map".into(),
            "0:v?".into(),
            "-map".into(),
            "0:a?".into(),
        ];

        match request.composition {
            Composition::Identity => {
                args.extend(["-c".into(), "copy".into()]);
                args.extend(["-avoid_negative_ts".into(), "make_zero".into()]);
            }
            Composition::Reencode => {
                let (speed, crf) = request.preset.x264_settings();
                args.extend([
                    "-c:v".into(),
                    "libx264".into(),
                    "-preset".into(),
                    speed.into(),
                    "-crf".into(),
                    crf.to_string().into(),
                    "-c:a".into(),
                    "aac".into(),
                ]);
            }
        }

        args.extend([
            "-f".into(),
            Self::muxer_for(&request.container).into(),
            request.output.as_os_str().to_owned(),
        ]);
        args
    }
}

impl Default for FFmpegExportAdapter {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl ExportEnginePort for FFmpegExportAdapter {
    async fn export(&self, request: &EngineRequest) -> ExportResult<PathBuf> {
        let args = Self::build_args(request);
        debug!(job_id = %request.job_id, ?args, "Running ffmpeg");

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                ExportError::engine(format!(
                    "Failed to spawn {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<&str> = stderr.lines().collect();
            let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
            return Err(ExportError::engine(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                tail.trim()
            )));
        }

        Ok(request.output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::*;

    fn request(composition: Composition) -> EngineRequest {
        let duration = MediaTime::from_seconds(10.0).unwrap();
        EngineRequest {
            job_id: JobId(7),
            source: PathBuf::from("/videos/in.mov"),
            output: PathBuf::from("/videos/in_part1.mp4"),
            range: TimeRange::new(
                MediaTime::from_seconds(0.01).unwrap(),
                MediaTime::from_seconds(5.0).unwrap(),
                duration,
            )
            .unwrap(),
            composition,
            container: "mp4".to_string(),
            preset: Preset::HighestQuality,
        }
    }

    fn as_strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_identity_uses_stream_copy() {
        let args = as_strings(FFmpegExportAdapter::build_args(&request(Composition::Identity)));
        let joined = args.join(" ");
        assert!(joined.contains("-ss 0.010000 -t 4.990000 -i /videos/in.mov"));
        assert!(joined.contains("-c copy"));
        assert!(!joined.contains("libx264"));
        assert_eq!(args[args.len() - 3..], ["-f", "mp4", "/videos/in_part1.mp4"]);
    }

    #[test]
    fn test_reencode_uses_preset() {
        let args = as_strings(FFmpegExportAdapter::build_args(&request(Composition::Reencode)));
        let joined = args.join(" ");
        assert!(joined.contains("-c:v libx264 -preset slow -crf 18"));
        assert!(!joined.contains("-c copy"));
    }

    fn planned_trim_args(preset: Preset, composition: Composition) -> Vec<String> {
        let config = ExportConfiguration {
            preset,
            composition,
            ..ExportConfiguration::default()
        };
        let planner = crate::app::SegmentationPlanner::new(config, DividePolicy::Sequential);
        let clip = SourceClip::new("/videos/in.mp4", MediaTime::from_seconds(10.0).unwrap()).unwrap();
        let request = SegmentationRequest::trim_seconds(1.0, 4.0).unwrap();
        let job = planner.plan(&clip, request).unwrap().remove(0);

        let request = EngineRequest::for_job(&job, job.source.clone(), preset);
        as_strings(FFmpegExportAdapter::build_args(&request))
    }

    #[test]
    fn test_configured_preset_reaches_reencode_args() {
        let high = planned_trim_args(Preset::HighestQuality, Composition::Reencode);
        let low = planned_trim_args(Preset::LowQuality, Composition::Reencode);
        assert_ne!(high, low);
        assert!(low.join(" ").contains("-preset veryfast -crf 28"));

        let copy = planned_trim_args(Preset::LowQuality, Composition::Identity);
        assert!(copy.join(" ").contains("-c copy"));
    }

    #[test]
    fn test_muxer_mapping() {
        assert_eq!(FFmpegExportAdapter::muxer_for("mkv"), "matroska");
        assert_eq!(FFmpegExportAdapter::muxer_for("mp4"), "mp4");
        assert_eq!(FFmpegExportAdapter::muxer_for("ts"), "mpegts");
    }

    #[tokio::test]
    async fn test_missing_binary_is_engine_failure() {
        let adapter = FFmpegExportAdapter::new("/nonexistent/splitclip-ffmpeg");
        let err = adapter.export(&request(Composition::Identity)).await.unwrap_err();
        assert!(matches!(err, ExportError::EngineFailure { .. }));
    }
}
