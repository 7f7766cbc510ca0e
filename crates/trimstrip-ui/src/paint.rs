//! Draws a [`StripLayout`] with an egui painter.

use egui::{pos2, vec2, Color32, FontId, Painter, Pos2, Rounding, Shape, Stroke, TextureHandle};
use trimstrip_core::{Color, Rect, Vec2};

use crate::layout::StripLayout;

/// Colors of the strip decorations.
#[derive(Debug, Clone, Copy)]
pub struct StripPalette {
    /// Lines, handles, playhead and label card.
    pub color: Color32,
    /// Chevrons, shadows and label text.
    pub icon_color: Color32,
}

impl StripPalette {
    pub fn new(color: Color, icon_color: Color) -> Self {
        Self {
            color: to_color32(color),
            icon_color: to_color32(icon_color),
        }
    }
}

pub fn to_color32(color: Color) -> Color32 {
    let [r, g, b, a] = color.to_rgba8();
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

fn to_screen(origin: Pos2, rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(origin + vec2(rect.x, rect.y), vec2(rect.width, rect.height))
}

fn to_pos(origin: Pos2, point: Vec2) -> Pos2 {
    pos2(origin.x + point.x, origin.y + point.y)
}

/// Paint `layout` with its top-left corner at `origin`.
///
/// Frames are drawn only when `frames` holds one texture per slot.
pub fn paint_strip(
    painter: &Painter,
    origin: Pos2,
    layout: &StripLayout,
    frames: &[TextureHandle],
    palette: StripPalette,
) {
    if frames.len() == layout.frames.len() {
        let uv = egui::Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        for (texture, rect) in frames.iter().zip(&layout.frames) {
            painter.image(texture.id(), to_screen(origin, *rect), uv, Color32::WHITE);
        }
    }

    for line in [layout.top_line, layout.bottom_line, layout.left_line, layout.right_line] {
        painter.rect_filled(to_screen(origin, line), 0.0, palette.color);
    }

    let chevron_stroke = Stroke::new(layout.left_line.width.max(1.0), palette.icon_color);
    for handle in [&layout.left_handle, &layout.right_handle] {
        painter.rect_filled(
            to_screen(origin, handle.rect),
            Rounding::same(layout.handle_radius),
            palette.color,
        );
        let points = handle.chevron.iter().map(|p| to_pos(origin, *p)).collect();
        painter.add(Shape::line(points, chevron_stroke));
    }

    if let Some(play) = &layout.play {
        let knob = to_pos(origin, play.knob_center);
        let rounding = Rounding::same(play.corner_radius);
        painter.rect_filled(to_screen(origin, play.shadow), rounding, palette.icon_color);
        painter.circle_filled(knob, play.knob_shadow_radius, palette.icon_color);
        painter.rect_filled(to_screen(origin, play.line), rounding, palette.color);
        painter.circle_filled(knob, play.knob_radius, palette.color);
    }

    if let Some(label) = &layout.label {
        let galley = painter.layout_no_wrap(
            label.text.clone(),
            FontId::proportional(label.font_size),
            palette.icon_color,
        );
        let center = to_pos(origin, label.center);
        let size = galley.size();
        let card = egui::Rect::from_min_max(
            pos2(center.x - size.x / 2.0 - label.pad_x, center.y - size.y / 2.0 - label.pad_top),
            pos2(center.x + size.x / 2.0 + label.pad_x, center.y + size.y / 2.0),
        );
        painter.rect_filled(card, Rounding::same(label.card_radius), palette.color);
        let text_pos = pos2(center.x - size.x / 2.0, center.y - size.y / 2.0 - label.pad_top / 2.0);
        painter.galley(text_pos, galley, palette.icon_color);
    }
}
