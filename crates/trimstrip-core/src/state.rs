//! Range/position model: normalized trim range, playhead and width bounds.
//!
//! All operations are pure. Updates take the current state by reference and
//! return the next state; out-of-range input is clamped, never rejected.

use serde::{Deserialize, Serialize};

use crate::geometry::{Vec2, ViewportGeometry};

/// Half-width of the playhead's hit region, in dp.
pub const PLAY_HIT_TOLERANCE_DP: f32 = 8.0;

/// Half-width of a trim handle's hit region, in dp.
pub const TRIM_HIT_TOLERANCE_DP: f32 = 12.0;

/// One of the three draggable hit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    /// Left trim handle (`trim_start`).
    Left,
    /// Right trim handle (`trim_end`).
    Right,
    /// Playhead.
    Play,
}

/// Normalized timeline state.
///
/// Invariant: `0 <= trim_start <= trim_end <= 1`. `play_position` is stored
/// relative to the trim window, so the marker stays pinned inside the window
/// when the window moves; [`TimelineState::play_progress`] gives the absolute
/// fraction of the full duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineState {
    pub trim_start: f32,
    pub trim_end: f32,
    /// Playhead as a fraction of the trim window.
    pub play_position: f32,
    /// Minimum trim width; `0.0` disables the bound.
    pub min_range_width: f32,
    pub max_range_width: f32,
    pub total_duration_micros: u64,
}

impl Default for TimelineState {
    fn default() -> Self {
        Self {
            trim_start: 0.0,
            trim_end: 1.0,
            play_position: 0.0,
            min_range_width: 0.0,
            max_range_width: 1.0,
            total_duration_micros: 0,
        }
    }
}

impl TimelineState {
    /// Full range, playhead at the start, unconstrained width.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current trim width.
    #[inline]
    pub fn range_width(&self) -> f32 {
        self.trim_end - self.trim_start
    }

    /// Playhead as an absolute fraction of the full duration.
    #[inline]
    pub fn play_progress(&self) -> f32 {
        self.trim_start + self.range_width() * self.play_position
    }

    /// Express an absolute fraction relative to the trim window.
    ///
    /// The input is clamped into `[trim_start, trim_end]` first; a collapsed
    /// window maps to `0.0`.
    pub fn relative_to_window(&self, absolute: f32) -> f32 {
        let clamped = absolute.max(self.trim_start).min(self.trim_end);
        let width = self.range_width();
        if width <= 0.0 {
            return 0.0;
        }
        ((clamped - self.trim_start) / width).max(0.0).min(1.0)
    }

    /// Move the playhead to an absolute fraction, clamped into the trim window.
    pub fn with_play_progress(self, absolute: f32) -> Self {
        Self {
            play_position: self.relative_to_window(absolute),
            ..self
        }
    }

    /// Duration of the trimmed range, rounded to whole microseconds.
    pub fn cropped_duration_micros(&self) -> u64 {
        let width = self.range_width().max(0.0) as f64;
        (self.total_duration_micros as f64 * width).round() as u64
    }

    /// Pixel x coordinate of a handle in the given layout.
    pub fn handle_position(&self, handle: Handle, geometry: &ViewportGeometry) -> f32 {
        let fraction = match handle {
            Handle::Left => self.trim_start,
            Handle::Right => self.trim_end,
            Handle::Play => self.play_progress(),
        };
        geometry.fraction_to_pixel(fraction)
    }

    /// Find the handle under `pointer`, if any.
    ///
    /// Checked in order Play (when enabled), Left, Right; the first match wins,
    /// so the playhead takes priority when it overlaps a trim handle.
    pub fn hit_test(
        &self,
        pointer: Vec2,
        geometry: &ViewportGeometry,
        play_enabled: bool,
    ) -> Option<Handle> {
        if geometry.is_empty() {
            return None;
        }

        let play_tolerance = geometry.dp(PLAY_HIT_TOLERANCE_DP);
        let trim_tolerance = geometry.dp(TRIM_HIT_TOLERANCE_DP);

        let candidates = [
            (Handle::Play, play_tolerance, play_enabled),
            (Handle::Left, trim_tolerance, true),
            (Handle::Right, trim_tolerance, true),
        ];

        candidates
            .into_iter()
            .filter(|&(_, _, enabled)| enabled)
            .find(|&(handle, tolerance, _)| {
                geometry
                    .hit_region(self.handle_position(handle, geometry), tolerance)
                    .contains(pointer)
            })
            .map(|(handle, _, _)| handle)
    }

    /// Drag the left trim handle.
    ///
    /// The candidate edge is clamped to `[strip left, current end]`. If the
    /// width then exceeds `max_range_width` the *end* is pulled in; if it falls
    /// below a nonzero `min_range_width` the *start* is pushed back (not past 0).
    pub fn update_left_trim(
        &self,
        pointer_px: f32,
        press_offset_px: f32,
        geometry: &ViewportGeometry,
    ) -> Self {
        let end_px = geometry.fraction_to_pixel(self.trim_end);
        let start_px = (pointer_px - press_offset_px)
            .max(geometry.timeline_left())
            .min(end_px);

        let mut next = *self;
        next.trim_start = geometry
            .pixel_to_fraction(start_px)
            .max(0.0)
            .min(self.trim_end);

        let width = next.range_width();
        if width > next.max_range_width {
            next.trim_end = (next.trim_start + next.max_range_width).min(1.0);
        } else if next.min_range_width != 0.0 && width < next.min_range_width {
            next.trim_start = (next.trim_end - next.min_range_width).max(0.0);
        }
        next
    }

    /// Drag the right trim handle.
    ///
    /// Mirror of [`update_left_trim`](Self::update_left_trim): a too-wide range
    /// pulls the *start* in, a too-narrow one pushes the *end* out (not past 1).
    pub fn update_right_trim(
        &self,
        pointer_px: f32,
        press_offset_px: f32,
        geometry: &ViewportGeometry,
    ) -> Self {
        let start_px = geometry.fraction_to_pixel(self.trim_start);
        let end_px = (pointer_px - press_offset_px)
            .max(start_px)
            .min(geometry.timeline_right());

        let mut next = *self;
        next.trim_end = geometry
            .pixel_to_fraction(end_px)
            .max(self.trim_start)
            .min(1.0);

        let width = next.range_width();
        if width > next.max_range_width {
            next.trim_start = (next.trim_end - next.max_range_width).max(0.0);
        } else if next.min_range_width != 0.0 && width < next.min_range_width {
            next.trim_end = (next.trim_start + next.min_range_width).min(1.0);
        }
        next
    }

    /// Drag the playhead; returns the new trim-relative position.
    ///
    /// The pointer maps over the full strip, is clamped into the trim window,
    /// then re-expressed as a fraction of that window.
    pub fn update_play_position(
        &self,
        pointer_px: f32,
        press_offset_px: f32,
        geometry: &ViewportGeometry,
    ) -> f32 {
        let raw = geometry.pixel_to_fraction(pointer_px - press_offset_px);
        self.relative_to_window(raw)
    }
}
