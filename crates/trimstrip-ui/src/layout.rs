//! Pure layout of everything the strip draws, in widget-local pixels.

use trimstrip_core::metrics::{
    HANDLE_ICON_HALF, HANDLE_RADIUS, HANDLE_WIDTH, LABEL_CARD_RADIUS, LABEL_FONT_SIZE,
    LABEL_PAD_TOP, LABEL_PAD_X, LINE_SIZE, PLAY_KNOB_RADIUS, PLAY_KNOB_SHADOW_RADIUS,
    PLAY_LINE_HALF, PLAY_SHADOW_HALF,
};
use trimstrip_core::{Rect, TimelineOptions, TimelineState, Vec2, ViewportGeometry};

/// A rounded trim handle and the chevron drawn on it.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleShape {
    pub rect: Rect,
    /// Open polyline, pointing away from the trim window.
    pub chevron: [Vec2; 3],
}

/// Playhead marker: a full-height line with a knob near the bottom, each
/// with a slightly larger shadow behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayIndicator {
    pub shadow: Rect,
    pub line: Rect,
    pub corner_radius: f32,
    pub knob_center: Vec2,
    pub knob_radius: f32,
    pub knob_shadow_radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DurationLabel {
    pub text: String,
    pub center: Vec2,
    pub font_size: f32,
    /// Card margin left/right of the text.
    pub pad_x: f32,
    /// Card margin above the text.
    pub pad_top: f32,
    pub card_radius: f32,
}

/// Shapes for one frame of the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct StripLayout {
    pub frames: Vec<Rect>,
    pub top_line: Rect,
    pub bottom_line: Rect,
    pub left_line: Rect,
    pub right_line: Rect,
    pub left_handle: HandleShape,
    pub right_handle: HandleShape,
    pub handle_radius: f32,
    pub play: Option<PlayIndicator>,
    pub label: Option<DurationLabel>,
}

impl StripLayout {
    /// Lay out the strip, or `None` when no frame fits the widget.
    pub fn compute(
        geometry: &ViewportGeometry,
        state: &TimelineState,
        options: &TimelineOptions,
    ) -> Option<Self> {
        if geometry.is_empty() {
            return None;
        }

        let pad = geometry.vertical_padding;
        let frame = geometry.frame_size as f32;
        let line = geometry.dp(LINE_SIZE);
        let handle_w = geometry.dp(HANDLE_WIDTH);
        let top = pad - line;
        let bottom = pad + frame + line;
        let mid_y = geometry.height / 2.0;
        let icon_half = geometry.dp(HANDLE_ICON_HALF);

        let start_x = geometry.fraction_to_pixel(state.trim_start);
        let end_x = geometry.fraction_to_pixel(state.trim_end);

        let frames = (0..geometry.frame_count)
            .map(|i| geometry.frame_rect(i))
            .collect();

        let left_handle = HandleShape {
            rect: Rect::from_corners(
                Vec2::new(start_x - handle_w, top),
                Vec2::new(start_x, bottom),
            ),
            chevron: chevron(start_x - handle_w, start_x, mid_y, icon_half, true),
        };
        let right_handle = HandleShape {
            rect: Rect::from_corners(Vec2::new(end_x, top), Vec2::new(end_x + handle_w, bottom)),
            chevron: chevron(end_x, end_x + handle_w, mid_y, icon_half, false),
        };

        let play = options.play_line.then(|| {
            let x = geometry.fraction_to_pixel(state.play_progress());
            let h = geometry.height;
            let shadow_half = geometry.dp(PLAY_SHADOW_HALF);
            let line_half = geometry.dp(PLAY_LINE_HALF);
            PlayIndicator {
                shadow: Rect::from_corners(
                    Vec2::new(x - shadow_half, 0.0),
                    Vec2::new(x + shadow_half, h),
                ),
                line: Rect::from_corners(
                    Vec2::new(x - line_half, 0.0),
                    Vec2::new(x + line_half, h),
                ),
                corner_radius: line_half,
                knob_center: Vec2::new(x, h - geometry.dp(PLAY_KNOB_RADIUS)),
                knob_radius: geometry.dp(PLAY_KNOB_RADIUS),
                knob_shadow_radius: geometry.dp(PLAY_KNOB_SHADOW_RADIUS),
            }
        });

        let label = options.show_time.then(|| DurationLabel {
            text: format_duration_label(state.cropped_duration_micros()),
            center: Vec2::new((start_x + end_x) / 2.0, mid_y),
            font_size: geometry.dp(LABEL_FONT_SIZE),
            pad_x: geometry.dp(LABEL_PAD_X),
            pad_top: geometry.dp(LABEL_PAD_TOP),
            card_radius: geometry.dp(LABEL_CARD_RADIUS),
        });

        Some(Self {
            frames,
            top_line: Rect::from_corners(Vec2::new(start_x, top), Vec2::new(end_x, pad)),
            bottom_line: Rect::from_corners(
                Vec2::new(start_x, pad + frame),
                Vec2::new(end_x, bottom),
            ),
            left_line: Rect::from_corners(
                Vec2::new(start_x - line, top),
                Vec2::new(start_x, bottom),
            ),
            right_line: Rect::from_corners(Vec2::new(end_x, top), Vec2::new(end_x + line, bottom)),
            left_handle,
            right_handle,
            handle_radius: geometry.dp(HANDLE_RADIUS),
            play,
            label,
        })
    }
}

fn chevron(left: f32, right: f32, mid_y: f32, half: f32, points_left: bool) -> [Vec2; 3] {
    let inset = (right - left) * 0.3;
    let (tip, back) = if points_left {
        (left + inset, right - inset)
    } else {
        (right - inset, left + inset)
    };
    let rise = half * 0.5;
    [
        Vec2::new(back, mid_y - rise),
        Vec2::new(tip, mid_y),
        Vec2::new(back, mid_y + rise),
    ]
}

/// Text of the trimmed-duration label.
///
/// Tenths of a second below one minute, `m:ss` from there on.
pub fn format_duration_label(micros: u64) -> String {
    let seconds = micros as f64 / 1_000_000.0;
    if seconds < 60.0 {
        format!("{:.1}s", seconds)
    } else {
        let whole = micros / 1_000_000;
        format!("{}:{:02}", whole / 60, whole % 60)
    }
}
