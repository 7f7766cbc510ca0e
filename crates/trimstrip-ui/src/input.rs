//! Translation of egui input into widget-local pointer events.

use egui::{CursorIcon, Event, PointerButton, Pos2, Rect};
use trimstrip_core::{Handle, PointerEvent, Vec2};

fn local(pos: Pos2, origin: Pos2) -> Vec2 {
    Vec2::new(pos.x - origin.x, pos.y - origin.y)
}

/// Convert this frame's raw events into [`PointerEvent`]s relative to
/// `bounds.min`.
///
/// Presses only count inside `bounds`; moves and releases are passed on
/// wherever they happen so a drag can leave the widget.
pub fn pointer_events(events: &[Event], bounds: Rect) -> Vec<PointerEvent> {
    let origin = bounds.min;
    events
        .iter()
        .filter_map(|event| match event {
            Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed: true,
                ..
            } if bounds.contains(*pos) => Some(PointerEvent::Down(local(*pos, origin))),
            Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed: false,
                ..
            } => Some(PointerEvent::Up(local(*pos, origin))),
            Event::PointerMoved(pos) => Some(PointerEvent::Move(local(*pos, origin))),
            Event::PointerGone => Some(PointerEvent::Cancel),
            _ => None,
        })
        .collect()
}

/// Cursor shown over, or while dragging, a handle.
pub fn handle_cursor(handle: Handle) -> CursorIcon {
    match handle {
        Handle::Left => CursorIcon::ResizeWest,
        Handle::Right => CursorIcon::ResizeEast,
        Handle::Play => CursorIcon::ResizeHorizontal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2, Modifiers};

    fn bounds() -> Rect {
        Rect::from_min_size(pos2(10.0, 20.0), vec2(400.0, 80.0))
    }

    fn button(x: f32, y: f32, pressed: bool) -> Event {
        Event::PointerButton {
            pos: pos2(x, y),
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn test_events_are_widget_local() {
        let events = [
            button(110.0, 60.0, true),
            Event::PointerMoved(pos2(150.0, 60.0)),
            button(150.0, 60.0, false),
        ];
        assert_eq!(
            pointer_events(&events, bounds()),
            vec![
                PointerEvent::Down(Vec2::new(100.0, 40.0)),
                PointerEvent::Move(Vec2::new(140.0, 40.0)),
                PointerEvent::Up(Vec2::new(140.0, 40.0)),
            ]
        );
    }

    #[test]
    fn test_press_outside_is_ignored() {
        let events = [button(5.0, 60.0, true), Event::PointerMoved(pos2(900.0, 500.0))];
        assert_eq!(
            pointer_events(&events, bounds()),
            vec![PointerEvent::Move(Vec2::new(890.0, 480.0))]
        );
    }

    #[test]
    fn test_secondary_button_and_gone() {
        let events = [
            Event::PointerButton {
                pos: pos2(100.0, 60.0),
                button: PointerButton::Secondary,
                pressed: true,
                modifiers: Modifiers::NONE,
            },
            Event::PointerGone,
        ];
        assert_eq!(pointer_events(&events, bounds()), vec![PointerEvent::Cancel]);
    }

    #[test]
    fn test_handle_cursor() {
        assert_eq!(handle_cursor(Handle::Left), CursorIcon::ResizeWest);
        assert_eq!(handle_cursor(Handle::Right), CursorIcon::ResizeEast);
        assert_eq!(handle_cursor(Handle::Play), CursorIcon::ResizeHorizontal);
    }
}
