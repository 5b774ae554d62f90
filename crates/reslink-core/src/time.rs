//! Frame, second and timecode arithmetic.
//!
//! Frame rates are kept as exact rationals (24000/1001 rather than 23.976)
//! so that conversions never accumulate floating-point drift. Timecodes are
//! non-drop-frame `HH:MM:SS:FF` strings counted on the nominal integer
//! timebase of the rate (24 for 23.976, 30 for 29.97).

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ReslinkError, Result};

/// Frame rate as a rational number (e.g., 24000/1001 for 23.976 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 24000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Build a frame rate from a decimal fps value as reported by editors.
    ///
    /// Integer rates map to `n/1`, NTSC rates (23.976, 29.97, 59.94) map to
    /// `n*1000/1001`, anything else is kept to millisecond precision.
    pub fn from_fps(fps: f64) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(ReslinkError::InvalidArgument(format!(
                "frame rate must be positive, got {fps}"
            )));
        }
        let rounded = fps.round();
        if (fps - rounded).abs() < 1e-3 {
            return Ok(Self::new(rounded as u32, 1));
        }
        let ntsc = (fps * 1.001).round();
        if (ntsc * 1000.0 / 1001.0 - fps).abs() < 5e-3 {
            return Ok(Self::new(ntsc as u32 * 1000, 1001));
        }
        let ratio = Rational64::new((fps * 1000.0).round() as i64, 1000);
        Ok(Self::new(*ratio.numer() as u32, *ratio.denom() as u32))
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// The rate as an exact rational.
    #[inline]
    pub fn as_rational(self) -> Rational64 {
        Rational64::new(self.numerator as i64, self.denominator.max(1) as i64)
    }

    /// Nominal integer timebase used for timecode labels (`round(fps)`).
    #[inline]
    pub fn nominal(self) -> i64 {
        (self.to_fps_f64().round() as i64).max(1)
    }

    /// Common frame rates
    pub const FPS_23_976: Self = Self::new(24000, 1001);
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_50: Self = Self::new(50, 1);
    pub const FPS_59_94: Self = Self::new(60000, 1001);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_25
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}

/// Convert a frame count to an `HH:MM:SS:FF` timecode.
pub fn frames_to_timecode(frames: i64, rate: FrameRate) -> Result<String> {
    if frames < 0 {
        return Err(ReslinkError::InvalidArgument(format!(
            "frame count must be non-negative, got {frames}"
        )));
    }
    let base = rate.nominal();
    let ff = frames % base;
    let total_seconds = frames / base;
    let hh = total_seconds / 3600;
    let mm = (total_seconds % 3600) / 60;
    let ss = total_seconds % 60;
    Ok(format!("{hh:02}:{mm:02}:{ss:02}:{ff:02}"))
}

/// Parse an `HH:MM:SS:FF` timecode into a frame count.
pub fn timecode_to_frames(timecode: &str, rate: FrameRate) -> Result<i64> {
    let fields: Vec<&str> = timecode.trim().split(':').collect();
    if fields.len() != 4 {
        return Err(ReslinkError::Format(format!(
            "timecode {timecode:?} must have four fields"
        )));
    }

    let mut values = [0i64; 4];
    for (slot, field) in values.iter_mut().zip(&fields) {
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ReslinkError::Format(format!(
                "timecode {timecode:?} has non-numeric field {field:?}"
            )));
        }
        *slot = field
            .parse()
            .map_err(|_| ReslinkError::Format(format!("timecode field {field:?} out of range")))?;
    }

    let [hh, mm, ss, ff] = values;
    let base = rate.nominal();
    if mm >= 60 || ss >= 60 {
        return Err(ReslinkError::Format(format!(
            "timecode {timecode:?} has minutes or seconds >= 60"
        )));
    }
    if ff >= base {
        return Err(ReslinkError::Format(format!(
            "timecode {timecode:?} frame field must be below {base}"
        )));
    }
    hh.checked_mul(3600)
        .and_then(|s| s.checked_add(mm * 60 + ss))
        .and_then(|s| s.checked_mul(base))
        .and_then(|f| f.checked_add(ff))
        .ok_or_else(|| ReslinkError::Format(format!("timecode {timecode:?} is too large")))
}

/// Convert seconds to frames. Truncates toward zero, never rounds up.
pub fn seconds_to_frames(seconds: f64, rate: FrameRate) -> i64 {
    (seconds * rate.to_fps_f64()).trunc() as i64
}

/// Convert a frame count to seconds.
pub fn frames_to_seconds(frames: i64, rate: FrameRate) -> f64 {
    let secs = Rational64::from_integer(frames) / rate.as_rational();
    *secs.numer() as f64 / *secs.denom() as f64
}

/// A frame range with inclusive start and exclusive end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRange {
    /// Start frame (inclusive)
    pub start: i64,
    /// Length in frames
    pub duration: i64,
}

impl FrameRange {
    /// Create a new range from start and duration.
    #[inline]
    pub const fn new(start: i64, duration: i64) -> Self {
        Self { start, duration }
    }

    /// Create a range from start and end frames.
    #[inline]
    pub const fn from_start_end(start: i64, end: i64) -> Self {
        Self {
            start,
            duration: end - start,
        }
    }

    /// End frame (exclusive).
    #[inline]
    pub const fn end(self) -> i64 {
        self.start + self.duration
    }

    /// Check if a frame is within this range.
    #[inline]
    pub fn contains(self, frame: i64) -> bool {
        frame >= self.start && frame < self.end()
    }

    /// Check if two ranges share at least one frame. Empty ranges share none.
    pub fn overlaps(self, other: Self) -> bool {
        self.duration > 0
            && other.duration > 0
            && self.start < other.end()
            && other.start < self.end()
    }

    /// Number of frames shared by both ranges.
    pub fn overlap_len(self, other: Self) -> i64 {
        self.intersection(other).map_or(0, |r| r.duration)
    }

    /// Compute the intersection of two ranges, if any.
    pub fn intersection(self, other: Self) -> Option<Self> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Self::from_start_end(
            self.start.max(other.start),
            self.end().min(other.end()),
        ))
    }
}
