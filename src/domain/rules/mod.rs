// Domain rules - Time-range math and output naming policies

use std::path::{Path, PathBuf};

use crate::domain::errors::{ExportError, ExportResult};
use crate::domain::model::*;

/// Offset of the first divide half from the very start of the clip (0.01s)
pub const DIVIDE_LEAD_IN: MediaTime = MediaTime::from_ticks(6);

/// Business rules for turning requests into validated ranges
pub struct RangeRules;

impl RangeRules {
    /// Validate an explicit trim against the clip duration
    pub fn trim_range(
        clip: &SourceClip,
        start: MediaTime,
        end: MediaTime,
    ) -> ExportResult<TimeRange> {
        TimeRange::new(start, end, clip.duration())
    }

    /// Split the clip at its midpoint into `[lead-in, mid)` and `[mid, end)`
    pub fn divide_ranges(clip: &SourceClip) -> ExportResult<(TimeRange, TimeRange)> {
        let length = clip.duration();
        let mid = length.half();

        let first = TimeRange::new(DIVIDE_LEAD_IN, mid, length).map_err(|err| match err {
            ExportError::InvalidRange {
                start,
                end,
                duration,
                ..
            } => ExportError::InvalidRange {
                start,
                end,
                duration,
                reason: "clip too short to divide".to_string(),
            },
            other => other,
        })?;
        let second = TimeRange::new(mid, length, length)?;

        Ok((first, second))
    }
}

/// Business rules for output file placement
pub struct OutputNaming;

impl OutputNaming {
    /// Sibling paths `<stem>_part1.<container>` and `<stem>_part2.<container>`
    pub fn divide_outputs(source: &Path, container: &str) -> ExportResult<(PathBuf, PathBuf)> {
        let stem = source
            .file_stem()
            .ok_or_else(|| ExportError::io(source, "source path has no file name"))?
            .to_string_lossy()
            .into_owned();
        let dir = source.parent().unwrap_or_else(|| Path::new(""));
        let extension = container.trim_start_matches('.');

        let name = |part: u8| {
            if extension.is_empty() {
                dir.join(format!("{}_part{}", stem, part))
            } else {
                dir.join(format!("{}_part{}.{}", stem, part, extension))
            }
        };

        Ok((name(1), name(2)))
    }
}

#[cfg(test)]
mod tests;
