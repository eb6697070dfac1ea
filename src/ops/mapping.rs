//! Pointer-offset arithmetic shared by the seek, volume and rate controls.

use std::ops::RangeInclusive;

/// Double-clicks right of this offset skip forward, the rest skip back.
pub const ZONE_THRESHOLD_PX: f64 = 120.0;

/// Playback rate at the far right of the rate slider.
pub const MAX_PLAYBACK_RATE: f64 = 3.0;

/// Rates a browser `<video>` accepts; anything else throws.
pub const BROWSER_PLAYBACK_RATES: RangeInclusive<f64> = 0.0625..=16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipDirection {
    Forward,
    Backward,
}

/// Position of `offset_x` along a control `width` pixels wide.
///
/// `None` when the control has no usable width, which happens before the
/// host has laid it out.
pub fn fraction(offset_x: f64, width: f64) -> Option<f64> {
    let ratio = offset_x / width;
    (width > 0.0 && ratio.is_finite()).then_some(ratio)
}

pub fn seek_time(offset_x: f64, width: f64, duration: f64) -> Option<f64> {
    fraction(offset_x, width)
        .map(|ratio| ratio * duration)
        .filter(|time| time.is_finite())
}

/// Not clamped; out-of-range values are left to the media surface.
pub fn volume(offset_x: f64, width: f64) -> Option<f64> {
    fraction(offset_x, width)
}

pub fn playback_rate(offset_x: f64, width: f64) -> Option<f64> {
    fraction(offset_x, width).map(|ratio| ratio * MAX_PLAYBACK_RATE)
}

/// Whether a browser media element can play at `rate`. Clicks near the left
/// edge of the rate slider, or on its border, produce rates it refuses.
pub fn browser_accepts_rate(rate: f64) -> bool {
    BROWSER_PLAYBACK_RATES.contains(&rate)
}

/// Share of the media already played, in percent. Unknown or zero durations
/// read as 0.
pub fn progress_percent(current_time: f64, duration: f64) -> f64 {
    let percent = current_time / duration * 100.0;
    if percent.is_finite() { percent } else { 0.0 }
}

pub fn zone(offset_x: f64) -> SkipDirection {
    if offset_x > ZONE_THRESHOLD_PX {
        SkipDirection::Forward
    } else {
        SkipDirection::Backward
    }
}
