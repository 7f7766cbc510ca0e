//! TrimStrip Core - geometry and interaction model for a video trim strip
//!
//! This crate provides the platform-independent part of the widget:
//! - Pixel ↔ progress conversion and strip layout
//! - Normalized trim range, playhead and width bounds
//! - The drag state machine for the left, right and play handles
//! - Options, colors and the error taxonomy

pub mod color;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod options;
pub mod state;
pub mod timeline;

pub use color::Color;
pub use error::{FrameFailure, Result, TrimStripError};
pub use geometry::{dp, fraction_to_pixel, pixel_to_fraction, Rect, Vec2, ViewportGeometry};
pub use interaction::{
    DragPhase, DragSession, EventResponse, InteractionContext, InteractionController,
    NullListener, PointerEvent, TimelineEvent, TimelineListener,
};
pub use options::{PlayheadTracking, TimelineOptions};
pub use state::{Handle, TimelineState};
pub use timeline::TrimTimeline;

/// Fixed drawing metrics, in dp.
pub mod metrics {
    /// Width of the trim frame lines.
    pub const LINE_SIZE: f32 = 2.0;

    /// Width of the rounded trim handles.
    pub const HANDLE_WIDTH: f32 = 8.0;

    /// Corner radius of the trim handles.
    pub const HANDLE_RADIUS: f32 = 4.0;

    /// Half-size of the chevron drawn on a trim handle.
    pub const HANDLE_ICON_HALF: f32 = 8.0;

    /// Half-width of the playhead line and its shadow.
    pub const PLAY_LINE_HALF: f32 = 1.0;
    pub const PLAY_SHADOW_HALF: f32 = 1.5;

    /// Playhead knob radius and its shadow radius.
    pub const PLAY_KNOB_RADIUS: f32 = 3.0;
    pub const PLAY_KNOB_SHADOW_RADIUS: f32 = 3.5;

    /// Duration label font size.
    pub const LABEL_FONT_SIZE: f32 = 12.0;

    /// Duration label card margins and corner radius.
    pub const LABEL_PAD_X: f32 = 1.5;
    pub const LABEL_PAD_TOP: f32 = 4.0;
    pub const LABEL_CARD_RADIUS: f32 = 2.0;
}
