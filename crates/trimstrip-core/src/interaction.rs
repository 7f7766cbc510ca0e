//! Pointer interaction: a small drag state machine over the range model.
//!
//! `Idle --down(hit)--> Dragging* --move--> Dragging* --up/cancel--> Idle`.
//! Every state change is reported synchronously to a [`TimelineListener`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FrameFailure, TrimStripError};
use crate::geometry::{Vec2, ViewportGeometry};
use crate::options::PlayheadTracking;
use crate::state::{Handle, TimelineState};

/// Receiver of range, position and drag-state changes.
///
/// Callbacks are fire-and-forget and arrive from inside event handling, in
/// emission order. All methods default to no-ops.
pub trait TimelineListener {
    fn on_left_progress_changed(&mut self, _progress: f32) {}
    fn on_right_progress_changed(&mut self, _progress: f32) {}
    fn on_duration_changed(&mut self, _duration_micros: u64) {}
    /// Absolute fraction of the full duration.
    fn on_play_progress_changed(&mut self, _progress: f32) {}
    fn on_dragging_state_changed(&mut self, _dragging: bool) {}
    /// Thumbnails or duration could not be produced for the current source.
    fn on_frames_failed(&mut self, _error: &TrimStripError) {}
}

/// Listener that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullListener;

impl TimelineListener for NullListener {}

/// One listener callback, as a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimelineEvent {
    LeftProgressChanged(f32),
    RightProgressChanged(f32),
    DurationChanged(u64),
    PlayProgressChanged(f32),
    DraggingStateChanged(bool),
    FramesFailed(FrameFailure),
}

impl TimelineEvent {
    /// Replay this event into a listener.
    pub fn dispatch<L: TimelineListener + ?Sized>(&self, listener: &mut L) {
        match self {
            Self::LeftProgressChanged(p) => listener.on_left_progress_changed(*p),
            Self::RightProgressChanged(p) => listener.on_right_progress_changed(*p),
            Self::DurationChanged(d) => listener.on_duration_changed(*d),
            Self::PlayProgressChanged(p) => listener.on_play_progress_changed(*p),
            Self::DraggingStateChanged(d) => listener.on_dragging_state_changed(*d),
            Self::FramesFailed(failure) => listener.on_frames_failed(&failure.to_error()),
        }
    }
}

/// Records every callback in order.
impl TimelineListener for Vec<TimelineEvent> {
    fn on_left_progress_changed(&mut self, progress: f32) {
        self.push(TimelineEvent::LeftProgressChanged(progress));
    }
    fn on_right_progress_changed(&mut self, progress: f32) {
        self.push(TimelineEvent::RightProgressChanged(progress));
    }
    fn on_duration_changed(&mut self, duration_micros: u64) {
        self.push(TimelineEvent::DurationChanged(duration_micros));
    }
    fn on_play_progress_changed(&mut self, progress: f32) {
        self.push(TimelineEvent::PlayProgressChanged(progress));
    }
    fn on_dragging_state_changed(&mut self, dragging: bool) {
        self.push(TimelineEvent::DraggingStateChanged(dragging));
    }
    fn on_frames_failed(&mut self, error: &TrimStripError) {
        self.push(TimelineEvent::FramesFailed(error.into()));
    }
}

/// Forwards every callback over a channel. A disconnected receiver is ignored.
impl TimelineListener for crossbeam_channel::Sender<TimelineEvent> {
    fn on_left_progress_changed(&mut self, progress: f32) {
        let _ = self.send(TimelineEvent::LeftProgressChanged(progress));
    }
    fn on_right_progress_changed(&mut self, progress: f32) {
        let _ = self.send(TimelineEvent::RightProgressChanged(progress));
    }
    fn on_duration_changed(&mut self, duration_micros: u64) {
        let _ = self.send(TimelineEvent::DurationChanged(duration_micros));
    }
    fn on_play_progress_changed(&mut self, progress: f32) {
        let _ = self.send(TimelineEvent::PlayProgressChanged(progress));
    }
    fn on_dragging_state_changed(&mut self, dragging: bool) {
        let _ = self.send(TimelineEvent::DraggingStateChanged(dragging));
    }
    fn on_frames_failed(&mut self, error: &TrimStripError) {
        let _ = self.send(TimelineEvent::FramesFailed(error.into()));
    }
}

/// Pointer input in widget-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up(Vec2),
    Cancel,
}

/// Whether the controller consumed an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventResponse {
    /// The event belonged to a gesture on a handle; parents should not
    /// process it.
    pub handled: bool,
    /// State changed visibly.
    pub redraw: bool,
}

impl EventResponse {
    pub const UNHANDLED: Self = Self {
        handled: false,
        redraw: false,
    };

    const fn handled(redraw: bool) -> Self {
        Self {
            handled: true,
            redraw,
        }
    }
}

/// Controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    DraggingLeft,
    DraggingRight,
    DraggingPlay,
}

impl DragPhase {
    /// Handle being dragged, if any.
    pub fn handle(self) -> Option<Handle> {
        match self {
            Self::Idle => None,
            Self::DraggingLeft => Some(Handle::Left),
            Self::DraggingRight => Some(Handle::Right),
            Self::DraggingPlay => Some(Handle::Play),
        }
    }
}

/// State of one press-drag-release gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub handle: Handle,
    /// Signed distance from the pointer to the handle at press time, kept for
    /// the whole drag so the handle does not jump under the pointer.
    pub press_offset_px: f32,
}

/// Per-event inputs the controller reads but does not own.
#[derive(Debug, Clone, Copy)]
pub struct InteractionContext<'a> {
    pub geometry: &'a ViewportGeometry,
    pub play_enabled: bool,
    pub tracking: PlayheadTracking,
}

/// Drag state machine for the three handles.
#[derive(Debug, Default, Clone)]
pub struct InteractionController {
    session: Option<DragSession>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live drag session, if any.
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> DragPhase {
        match self.session.map(|s| s.handle) {
            None => DragPhase::Idle,
            Some(Handle::Left) => DragPhase::DraggingLeft,
            Some(Handle::Right) => DragPhase::DraggingRight,
            Some(Handle::Play) => DragPhase::DraggingPlay,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Feed one pointer event through the state machine.
    pub fn handle_event<L: TimelineListener + ?Sized>(
        &mut self,
        event: PointerEvent,
        state: &mut TimelineState,
        ctx: InteractionContext<'_>,
        listener: &mut L,
    ) -> EventResponse {
        match (event, self.session) {
            (PointerEvent::Down(pos), None) => self.press(pos, state, ctx, listener),
            (PointerEvent::Move(pos), Some(session)) => {
                Self::drag(session, pos, state, ctx, listener)
            }
            (PointerEvent::Up(_) | PointerEvent::Cancel, Some(session)) => {
                self.session = None;
                debug!(handle = ?session.handle, "Drag finished");
                listener.on_dragging_state_changed(false);
                EventResponse::handled(false)
            }
            _ => EventResponse::UNHANDLED,
        }
    }

    fn press<L: TimelineListener + ?Sized>(
        &mut self,
        pos: Vec2,
        state: &TimelineState,
        ctx: InteractionContext<'_>,
        listener: &mut L,
    ) -> EventResponse {
        let Some(handle) = state.hit_test(pos, ctx.geometry, ctx.play_enabled) else {
            return EventResponse::UNHANDLED;
        };

        let press_offset_px = pos.x - state.handle_position(handle, ctx.geometry);
        self.session = Some(DragSession {
            handle,
            press_offset_px,
        });
        debug!(?handle, press_offset_px, "Drag started");
        listener.on_dragging_state_changed(true);
        EventResponse::handled(true)
    }

    fn drag<L: TimelineListener + ?Sized>(
        session: DragSession,
        pos: Vec2,
        state: &mut TimelineState,
        ctx: InteractionContext<'_>,
        listener: &mut L,
    ) -> EventResponse {
        // No strip to map the pointer onto.
        if ctx.geometry.is_empty() {
            return EventResponse::handled(false);
        }
        let offset = session.press_offset_px;
        match session.handle {
            Handle::Play => {
                if !ctx.play_enabled {
                    return EventResponse::handled(false);
                }
                state.play_position = state.update_play_position(pos.x, offset, ctx.geometry);
                listener.on_play_progress_changed(state.play_progress());
            }
            Handle::Left | Handle::Right => {
                let before = state.play_progress();
                *state = if session.handle == Handle::Left {
                    state.update_left_trim(pos.x, offset, ctx.geometry)
                } else {
                    state.update_right_trim(pos.x, offset, ctx.geometry)
                };

                if session.handle == Handle::Left {
                    listener.on_left_progress_changed(state.trim_start);
                } else {
                    listener.on_right_progress_changed(state.trim_end);
                }
                listener.on_duration_changed(state.cropped_duration_micros());

                if ctx.tracking == PlayheadTracking::Clamped {
                    if (state.trim_start..=state.trim_end).contains(&before) {
                        state.play_position = state.relative_to_window(before);
                    } else {
                        *state = state.with_play_progress(before);
                        listener.on_play_progress_changed(state.play_progress());
                    }
                }
            }
        }
        EventResponse::handled(true)
    }
}
