//! Viewport geometry: how the frame strip is laid out inside the widget and
//! how pixel coordinates map to normalized progress values.

use glam::Vec2 as GlamVec2;
use serde::{Deserialize, Serialize};

/// 2D vector (pointer positions, widget-local pixels).
pub type Vec2 = GlamVec2;

/// Default vertical padding above and below the frame strip, in dp.
pub const DEFAULT_VERTICAL_PADDING_DP: f32 = 8.0;

/// Convert density-independent units to pixels.
///
/// Rounds up so thin lines never vanish on low-density screens; zero stays zero.
#[inline]
pub fn dp(value: f32, density: f32) -> f32 {
    if value == 0.0 {
        0.0
    } else {
        (density * value).ceil()
    }
}

/// Map an x coordinate to a fraction of the timeline width.
///
/// Not clamped; callers clamp per context. A zero-width timeline maps
/// everything to `0.0`.
#[inline]
pub fn pixel_to_fraction(px: f32, padding_left: f32, timeline_width: f32) -> f32 {
    if timeline_width <= 0.0 {
        return 0.0;
    }
    (px - padding_left) / timeline_width
}

/// Inverse of [`pixel_to_fraction`].
#[inline]
pub fn fraction_to_pixel(fraction: f32, padding_left: f32, timeline_width: f32) -> f32 {
    padding_left + fraction * timeline_width
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two corners.
    pub fn from_corners(min: Vec2, max: Vec2) -> Self {
        Self {
            x: min.x,
            y: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }

    /// Check if a point is inside the rectangle, edges included.
    #[inline]
    pub fn contains(self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Layout of the frame strip for one widget size.
///
/// Derived from the widget's pixel dimensions; recompute on every resize
/// rather than caching across layout passes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportGeometry {
    /// Widget width in pixels.
    pub width: f32,
    /// Widget height in pixels.
    pub height: f32,
    /// Pixels per dp.
    pub density: f32,
    /// Padding above and below the strip, in pixels.
    pub vertical_padding: f32,
    /// Edge length of one square thumbnail, in pixels.
    pub frame_size: u32,
    /// Number of thumbnails that fit across the widget.
    pub frame_count: usize,
    /// `frame_count * frame_size`.
    pub timeline_width: f32,
    /// Left offset that centers the strip horizontally.
    pub horizontal_padding: f32,
}

impl ViewportGeometry {
    /// Lay out the strip for a widget of `width × height` pixels.
    pub fn compute(width: f32, height: f32, density: f32, vertical_padding_dp: f32) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let vertical_padding = dp(vertical_padding_dp, density);

        let edge = (height - vertical_padding * 2.0).floor();
        let frame_size = if edge >= 1.0 { edge as u32 } else { 0 };
        let frame_count = if frame_size == 0 {
            0
        } else {
            (width / frame_size as f32).floor() as usize
        };
        let timeline_width = (frame_count as u32 * frame_size) as f32;
        let horizontal_padding = (width - timeline_width) / 2.0;

        Self {
            width,
            height,
            density,
            vertical_padding,
            frame_size,
            frame_count,
            timeline_width,
            horizontal_padding,
        }
    }

    /// True when no frame fits; nothing can be hit or dragged.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    /// Density-scaled size for this layout.
    #[inline]
    pub fn dp(&self, value: f32) -> f32 {
        dp(value, self.density)
    }

    /// Widget-local x coordinate to timeline fraction (unclamped).
    #[inline]
    pub fn pixel_to_fraction(&self, px: f32) -> f32 {
        pixel_to_fraction(px, self.horizontal_padding, self.timeline_width)
    }

    /// Timeline fraction to widget-local x coordinate.
    #[inline]
    pub fn fraction_to_pixel(&self, fraction: f32) -> f32 {
        fraction_to_pixel(fraction, self.horizontal_padding, self.timeline_width)
    }

    /// Left edge of the strip.
    #[inline]
    pub fn timeline_left(&self) -> f32 {
        self.horizontal_padding
    }

    /// Right edge of the strip.
    #[inline]
    pub fn timeline_right(&self) -> f32 {
        self.horizontal_padding + self.timeline_width
    }

    /// Destination rectangle of thumbnail `index`.
    pub fn frame_rect(&self, index: usize) -> Rect {
        let size = self.frame_size as f32;
        Rect::new(
            self.horizontal_padding + index as f32 * size,
            self.vertical_padding,
            size,
            size,
        )
    }

    /// Full-height hit region of half-width `tolerance` around `x`.
    pub fn hit_region(&self, x: f32, tolerance: f32) -> Rect {
        Rect::new(x - tolerance, 0.0, tolerance * 2.0, self.height)
    }
}
