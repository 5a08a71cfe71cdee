// Domain models - Core types and data structures

use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::errors::{ExportError, ExportResult};

/// Timescale used when converting caller-supplied seconds (600 ticks per second)
pub const PREFERRED_TIMESCALE: i32 = 600;

/// Rational media time - `value / timescale` seconds
///
/// Ordering and equality are exact: `5/1 == 3000/600`.
/// The timescale is always positive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "RawMediaTime")]
pub struct MediaTime {
    value: i64,
    timescale: i32,
}

#[derive(Deserialize)]
struct RawMediaTime {
    value: i64,
    timescale: i32,
}

impl TryFrom<RawMediaTime> for MediaTime {
    type Error = String;

    fn try_from(raw: RawMediaTime) -> Result<Self, Self::Error> {
        MediaTime::new(raw.value, raw.timescale)
            .ok_or_else(|| format!("timescale must be positive, got {}", raw.timescale))
    }
}

impl MediaTime {
    /// Create a media time; `None` if the timescale is not positive
    pub fn new(value: i64, timescale: i32) -> Option<Self> {
        if timescale <= 0 {
            return None;
        }
        Some(Self { value, timescale })
    }

    /// Ticks at the preferred timescale
    pub const fn from_ticks(value: i64) -> Self {
        Self {
            value,
            timescale: PREFERRED_TIMESCALE,
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn timescale(&self) -> i32 {
        self.timescale
    }

    pub const fn zero() -> Self {
        Self::from_ticks(0)
    }

    /// Convert seconds at the preferred timescale
    pub fn from_seconds(seconds: f64) -> Option<Self> {
        Self::from_seconds_with_timescale(seconds, PREFERRED_TIMESCALE)
    }

    /// Convert seconds at an explicit timescale, rounding to the nearest tick
    pub fn from_seconds_with_timescale(seconds: f64, timescale: i32) -> Option<Self> {
        if !seconds.is_finite() || timescale <= 0 {
            return None;
        }
        let ticks = (seconds * timescale as f64).round();
        if ticks > i64::MAX as f64 || ticks < i64::MIN as f64 {
            return None;
        }
        Some(Self {
            value: ticks as i64,
            timescale,
        })
    }

    pub fn as_seconds(&self) -> f64 {
        self.value as f64 / self.timescale as f64
    }

    pub fn is_negative(&self) -> bool {
        self.value < 0
    }

    /// Exact half; doubles the timescale when the value is odd
    pub fn half(&self) -> Self {
        if self.value % 2 == 0 {
            return Self {
                value: self.value / 2,
                timescale: self.timescale,
            };
        }
        match self.timescale.checked_mul(2) {
            Some(timescale) => Self {
                value: self.value,
                timescale,
            },
            None => Self {
                value: self.value / 2,
                timescale: self.timescale,
            },
        }
    }

    /// Rescale to another timescale, rounding half away from zero
    pub fn rescale(&self, timescale: i32) -> Self {
        if timescale == self.timescale || timescale <= 0 {
            return *self;
        }
        let scaled = self.value as i128 * timescale as i128;
        let den = self.timescale as i128;
        let rounded = if scaled >= 0 {
            (scaled + den / 2) / den
        } else {
            (scaled - den / 2) / den
        };
        Self {
            value: rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64,
            timescale,
        }
    }

    /// Difference `self - other` on a shared timescale
    pub fn saturating_sub(&self, other: &MediaTime) -> MediaTime {
        let timescale = common_timescale(self.timescale, other.timescale);
        let a = self.rescale(timescale);
        let b = other.rescale(timescale);
        MediaTime {
            value: a.value.saturating_sub(b.value),
            timescale,
        }
    }

    /// Seconds formatted for ffmpeg's `-ss`/`-to` arguments
    pub fn to_ffmpeg_arg(&self) -> String {
        format!("{:.6}", self.as_seconds())
    }
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.abs()
}

/// Least common multiple of two timescales, falling back to the larger one on overflow
fn common_timescale(a: i32, b: i32) -> i32 {
    if a == b {
        return a;
    }
    let lcm = (a as i64 / gcd(a as i64, b as i64)) * b as i64;
    i32::try_from(lcm).unwrap_or(a.max(b))
}

impl Ord for MediaTime {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.value as i128 * other.timescale as i128;
        let rhs = other.value as i128 * self.timescale as i128;
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for MediaTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MediaTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MediaTime {}

impl fmt::Display for MediaTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_seconds())
    }
}

/// Half-open interval `[start, end)` of playback time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: MediaTime,
    pub end: MediaTime,
}

impl TimeRange {
    /// Build a range, enforcing `0 <= start < end <= duration`
    pub fn new(start: MediaTime, end: MediaTime, duration: MediaTime) -> ExportResult<Self> {
        let reject = |reason: &str| ExportError::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
            duration: duration.to_string(),
            reason: reason.to_string(),
        };

        if start.is_negative() {
            return Err(reject("start is negative"));
        }
        if start == end {
            return Err(reject("range is empty"));
        }
        if start > end {
            return Err(reject("start is after end"));
        }
        if end > duration {
            return Err(reject("end exceeds clip duration"));
        }

        Ok(Self { start, end })
    }

    pub fn duration(&self) -> MediaTime {
        self.end.saturating_sub(&self.start)
    }

    /// True if the two half-open ranges share any instant
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, time: &MediaTime) -> bool {
        self.start <= *time && *time < self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// The media being edited
#[derive(Debug, Clone, PartialEq)]
pub struct SourceClip {
    path: PathBuf,
    duration: MediaTime,
}

impl SourceClip {
    pub fn new(path: impl Into<PathBuf>, duration: MediaTime) -> ExportResult<Self> {
        if duration <= MediaTime::zero() {
            return Err(ExportError::InvalidRange {
                start: MediaTime::zero().to_string(),
                end: duration.to_string(),
                duration: duration.to_string(),
                reason: "clip duration must be positive".to_string(),
            });
        }
        Ok(Self {
            path: path.into(),
            duration,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn duration(&self) -> MediaTime {
        self.duration
    }
}

/// How source frames map to output frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Composition {
    /// Pass-through; streams are copied as-is
    Identity,
    /// Re-encode frames with the configured quality preset
    Reencode,
}

impl Composition {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "identity" | "copy" => Some(Composition::Identity),
            "reencode" | "re-encode" => Some(Composition::Reencode),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Composition::Identity => "identity",
            Composition::Reencode => "reencode",
        }
    }
}

/// Export quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    HighestQuality,
    Medium,
    LowQuality,
}

impl Preset {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "highest-quality" | "highest" => Some(Preset::HighestQuality),
            "medium" => Some(Preset::Medium),
            "low-quality" | "low" => Some(Preset::LowQuality),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::HighestQuality => "highest-quality",
            Preset::Medium => "medium",
            Preset::LowQuality => "low-quality",
        }
    }

    /// x264 speed preset and CRF used when re-encoding
    pub fn x264_settings(&self) -> (&'static str, u8) {
        match self {
            Preset::HighestQuality => ("slow", 18),
            Preset::Medium => ("medium", 23),
            Preset::LowQuality => ("veryfast", 28),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output settings shared by every job of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfiguration {
    pub preset: Preset,
    pub container: String,
    /// Applied to every planned job; the preset only matters for `Reencode`
    #[serde(default = "default_composition")]
    pub composition: Composition,
}

fn default_composition() -> Composition {
    Composition::Identity
}

impl Default for ExportConfiguration {
    fn default() -> Self {
        Self {
            preset: Preset::HighestQuality,
            container: "mp4".to_string(),
            composition: default_composition(),
        }
    }
}

/// Identifier assigned to each planned job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Which part of a request a job produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Segment {
    Trimmed,
    FirstHalf,
    SecondHalf,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Segment::Trimmed => "trimmed",
            Segment::FirstHalf => "first-half",
            Segment::SecondHalf => "second-half",
        };
        f.write_str(name)
    }
}

/// Lifecycle of an export job
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded(PathBuf),
    Failed(ExportError),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded(_) | JobStatus::Failed(_))
    }

    fn name(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Succeeded(_) => "succeeded",
            JobStatus::Failed(_) => "failed",
        }
    }
}

/// Rejected status change
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{job} cannot move from {from} to {to}")]
pub struct InvalidTransition {
    pub job: JobId,
    pub from: &'static str,
    pub to: &'static str,
}

/// One unit of export work
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub id: JobId,
    pub segment: Segment,
    pub source: PathBuf,
    pub output: PathBuf,
    pub range: TimeRange,
    pub composition: Composition,
    pub container: String,
    status: JobStatus,
}

impl ExportJob {
    pub fn new(
        id: JobId,
        segment: Segment,
        source: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        range: TimeRange,
        composition: Composition,
        container: impl Into<String>,
    ) -> Self {
        Self {
            id,
            segment,
            source: source.into(),
            output: output.into(),
            range,
            composition,
            container: container.into(),
            status: JobStatus::Pending,
        }
    }

    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    /// Output overwrites the source file
    pub fn is_in_place(&self) -> bool {
        self.source == self.output
    }

    /// Pending -> Running
    pub fn mark_running(&mut self) -> Result<(), InvalidTransition> {
        match self.status {
            JobStatus::Pending => {
                self.status = JobStatus::Running;
                Ok(())
            }
            _ => Err(self.rejected("running")),
        }
    }

    /// Running -> Succeeded
    pub fn mark_succeeded(&mut self, path: PathBuf) -> Result<(), InvalidTransition> {
        match self.status {
            JobStatus::Running => {
                self.status = JobStatus::Succeeded(path);
                Ok(())
            }
            _ => Err(self.rejected("succeeded")),
        }
    }

    /// Pending or Running -> Failed
    pub fn mark_failed(&mut self, error: ExportError) -> Result<(), InvalidTransition> {
        if self.status.is_terminal() {
            return Err(self.rejected("failed"));
        }
        self.status = JobStatus::Failed(error);
        Ok(())
    }

    fn rejected(&self, to: &'static str) -> InvalidTransition {
        InvalidTransition {
            job: self.id,
            from: self.status.name(),
            to,
        }
    }
}

/// What the caller asks the planner to do with a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationRequest {
    Trim { start: MediaTime, end: MediaTime },
    Divide,
}

impl SegmentationRequest {
    /// Build a trim request from already-parsed seconds
    pub fn trim_seconds(start: f64, end: f64) -> ExportResult<Self> {
        let convert = |seconds: f64| {
            MediaTime::from_seconds(seconds).ok_or_else(|| ExportError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
                duration: "unknown".to_string(),
                reason: format!("{} is not a representable time", seconds),
            })
        };
        Ok(SegmentationRequest::Trim {
            start: convert(start)?,
            end: convert(end)?,
        })
    }
}

/// Scheduling of the second divide job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DividePolicy {
    /// Second job submitted once the first job's outcome is delivered
    #[default]
    Sequential,
    /// Second job submitted a fixed delay after the first; both may run at once
    FixedDelay(Duration),
}

impl DividePolicy {
    /// Delay used by the legacy fixed-delay scheduling
    pub const LEGACY_DELAY: Duration = Duration::from_secs(1);

    pub fn parse(value: &str, delay: Option<Duration>) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "sequential" => Some(DividePolicy::Sequential),
            "fixed-delay" | "delay" => Some(DividePolicy::FixedDelay(
                delay.unwrap_or(Self::LEGACY_DELAY),
            )),
            _ => None,
        }
    }
}

/// Result of one job as delivered to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    pub job_id: JobId,
    pub segment: Segment,
    pub range: TimeRange,
    pub result: ExportResult<PathBuf>,
    /// Non-fatal filesystem failure hit while preparing or cleaning up
    pub cleanup_error: Option<ExportError>,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn output(&self) -> Option<&Path> {
        self.result.as_ref().ok().map(PathBuf::as_path)
    }
}
