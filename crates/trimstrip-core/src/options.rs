//! Widget configuration.
//!
//! Options are read from JSON with camelCase keys and validated up front;
//! invalid combinations are rejected instead of producing oscillating clamps
//! during a drag.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{Result, TrimStripError};
use crate::geometry::DEFAULT_VERTICAL_PADDING_DP;
use crate::state::TimelineState;

/// What happens to the playhead when a trim handle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayheadTracking {
    /// Keep the trim-relative position; the marker slides with the window
    /// and no play callback fires.
    #[default]
    Proportional,
    /// Keep the absolute position, clamped into the new window; a play
    /// callback fires when the absolute position changes.
    Clamped,
}

/// Construction-time options for the trim strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineOptions {
    /// Line and handle fill color.
    pub color: Color,
    /// Handle icon, playhead shadow and label text color.
    pub icon_color: Color,
    /// Show and allow dragging the playhead.
    pub play_line: bool,
    /// Show the trimmed duration label.
    pub show_time: bool,
    pub start_progress: f32,
    pub end_progress: f32,
    /// Initial playhead, absolute fraction of the full duration.
    pub progress: f32,
    /// Minimum trim width (`0.0` = unconstrained).
    pub min_range_width: f32,
    pub max_range_width: f32,
    pub playhead_tracking: PlayheadTracking,
    /// Pixels per dp.
    pub density: f32,
    pub vertical_padding_dp: f32,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            icon_color: Color::BLACK,
            play_line: true,
            show_time: true,
            start_progress: 0.0,
            end_progress: 1.0,
            progress: 0.0,
            min_range_width: 0.0,
            max_range_width: 1.0,
            playhead_tracking: PlayheadTracking::default(),
            density: 1.0,
            vertical_padding_dp: DEFAULT_VERTICAL_PADDING_DP,
        }
    }
}

fn unit_interval(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(TrimStripError::ConfigurationInvalid(format!(
            "{name} must be within [0, 1], got {value}"
        )));
    }
    Ok(())
}

/// Check a pair of range-width bounds.
pub fn validate_range_bounds(min_range_width: f32, max_range_width: f32) -> Result<()> {
    unit_interval("minRangeWidth", min_range_width)?;
    unit_interval("maxRangeWidth", max_range_width)?;
    if max_range_width < min_range_width {
        return Err(TrimStripError::ConfigurationInvalid(format!(
            "maxRangeWidth ({max_range_width}) is smaller than minRangeWidth ({min_range_width})"
        )));
    }
    Ok(())
}

impl TimelineOptions {
    /// Parse options from JSON and validate them.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let options: Self = serde_json::from_slice(data)
            .map_err(|e| TrimStripError::Serialization(format!("Invalid options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            TrimStripError::Serialization(format!("Failed to serialize options: {}", e))
        })
    }

    /// Reject values the range model cannot honor.
    pub fn validate(&self) -> Result<()> {
        unit_interval("startProgress", self.start_progress)?;
        unit_interval("endProgress", self.end_progress)?;
        unit_interval("progress", self.progress)?;
        if self.start_progress > self.end_progress {
            return Err(TrimStripError::ConfigurationInvalid(format!(
                "startProgress ({}) is after endProgress ({})",
                self.start_progress, self.end_progress
            )));
        }
        validate_range_bounds(self.min_range_width, self.max_range_width)?;
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(TrimStripError::ConfigurationInvalid(format!(
                "density must be positive, got {}",
                self.density
            )));
        }
        if !self.vertical_padding_dp.is_finite() || self.vertical_padding_dp < 0.0 {
            return Err(TrimStripError::ConfigurationInvalid(format!(
                "verticalPaddingDp must not be negative, got {}",
                self.vertical_padding_dp
            )));
        }
        Ok(())
    }

    /// Initial timeline state described by these options.
    pub fn initial_state(&self) -> TimelineState {
        TimelineState {
            trim_start: self.start_progress,
            trim_end: self.end_progress,
            play_position: 0.0,
            min_range_width: self.min_range_width,
            max_range_width: self.max_range_width,
            total_duration_micros: 0,
        }
        .with_play_progress(self.progress)
    }
}
