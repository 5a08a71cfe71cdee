// Probe LibAV adapter - Media duration through libav bindings

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::model::{MediaTime, PREFERRED_TIMESCALE};
use crate::error::{SplitClipError, SplitClipResult};
use crate::ports::*;

/// libav reports container durations in microseconds
const AV_TIME_BASE: i32 = 1_000_000;

/// LibAV-based probing adapter
pub struct ProbeLibavAdapter;

impl ProbeLibavAdapter {
    /// Create new LibAV probing adapter
    pub fn new() -> SplitClipResult<Self> {
        ffmpeg_next::init().map_err(|e| SplitClipError::ProbeError {
            message: format!("FFmpeg initialization failed: {}", e),
        })?;
        Ok(Self)
    }

    fn read_duration(path: PathBuf) -> SplitClipResult<MediaTime> {
        let context = ffmpeg_next::format::input(&path).map_err(|e| SplitClipError::ProbeError {
            message: format!("Failed to open {}: {}", path.display(), e),
        })?;

        MediaTime::new(context.duration(), AV_TIME_BASE)
            .map(|d| d.rescale(PREFERRED_TIMESCALE))
            .filter(|d| *d > MediaTime::zero())
            .ok_or_else(|| SplitClipError::ProbeError {
                message: "Could not determine media duration".to_string(),
            })
    }
}

#[async_trait]
impl ProbePort for ProbeLibavAdapter {
    async fn probe_duration(&self, path: &Path) -> SplitClipResult<MediaTime> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::read_duration(path))
            .await
            .map_err(|e| SplitClipError::ProbeError {
                message: format!("Probe task failed: {}", e),
            })?
    }
}
