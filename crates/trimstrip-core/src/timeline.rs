//! Headless trim timeline: state, layout, drag controller and listener slot
//! behind one object any rendering surface can drive.

use tracing::{debug, warn};

use crate::error::{Result, TrimStripError};
use crate::geometry::{Vec2, ViewportGeometry};
use crate::interaction::{
    DragPhase, EventResponse, InteractionContext, InteractionController, NullListener,
    PointerEvent, TimelineListener,
};
use crate::options::{validate_range_bounds, TimelineOptions};
use crate::state::{Handle, TimelineState};

/// Stateful trim timeline without any platform dependency.
pub struct TrimTimeline {
    options: TimelineOptions,
    state: TimelineState,
    geometry: ViewportGeometry,
    controller: InteractionController,
    listener: Option<Box<dyn TimelineListener>>,
    redraw_requested: bool,
}

impl TrimTimeline {
    /// Create a timeline from validated options.
    pub fn new(options: TimelineOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            state: options.initial_state(),
            geometry: ViewportGeometry::default(),
            controller: InteractionController::new(),
            listener: None,
            redraw_requested: true,
            options,
        })
    }

    pub fn options(&self) -> &TimelineOptions {
        &self.options
    }

    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    pub fn geometry(&self) -> &ViewportGeometry {
        &self.geometry
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.controller.phase()
    }

    /// Handle under a widget-local pointer position.
    pub fn handle_at(&self, pointer: Vec2) -> Option<Handle> {
        self.state
            .hit_test(pointer, &self.geometry, self.options.play_line)
    }

    /// Absolute playhead position.
    pub fn play_progress(&self) -> f32 {
        self.state.play_progress()
    }

    pub fn cropped_duration_micros(&self) -> u64 {
        self.state.cropped_duration_micros()
    }

    /// Recompute the layout for a new widget size.
    ///
    /// Returns `true` when the layout actually changed.
    pub fn layout(&mut self, width: f32, height: f32) -> bool {
        let next = ViewportGeometry::compute(
            width,
            height,
            self.options.density,
            self.options.vertical_padding_dp,
        );
        if next == self.geometry {
            return false;
        }
        debug!(
            width,
            height,
            frame_size = next.frame_size,
            frame_count = next.frame_count,
            "Timeline layout changed"
        );
        self.geometry = next;
        self.redraw_requested = true;
        if self.geometry.is_empty() && self.controller.is_dragging() {
            debug!("Layout emptied mid-drag, ending the gesture");
            self.handle_pointer(PointerEvent::Cancel);
        }
        true
    }

    /// Register the listener, replacing any previous one.
    pub fn set_listener(&mut self, listener: Box<dyn TimelineListener>) {
        self.listener = Some(listener);
    }

    /// Drop the registered listener, returning it.
    pub fn clear_listener(&mut self) -> Option<Box<dyn TimelineListener>> {
        self.listener.take()
    }

    /// Move the playhead to an absolute fraction of the full duration.
    ///
    /// Clamped into the trim window. Emits no callback: the host is the
    /// source of this value.
    pub fn set_progress(&mut self, progress: f32) {
        if !progress.is_finite() {
            warn!(progress, "Ignoring non-finite playhead position");
            return;
        }
        self.state = self.state.with_play_progress(progress);
        self.redraw_requested = true;
    }

    /// Install the probed duration of the current source.
    pub fn set_duration_micros(&mut self, duration_micros: u64) {
        self.state.total_duration_micros = duration_micros;
        self.redraw_requested = true;
    }

    /// Change the trim width bounds at runtime.
    ///
    /// The current range is left as is; the bounds apply from the next drag.
    pub fn set_range_bounds(&mut self, min_range_width: f32, max_range_width: f32) -> Result<()> {
        validate_range_bounds(min_range_width, max_range_width)?;
        self.state.min_range_width = min_range_width;
        self.state.max_range_width = max_range_width;
        self.options.min_range_width = min_range_width;
        self.options.max_range_width = max_range_width;
        Ok(())
    }

    /// Feed one widget-local pointer event to the drag controller.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> EventResponse {
        let ctx = InteractionContext {
            geometry: &self.geometry,
            play_enabled: self.options.play_line,
            tracking: self.options.playhead_tracking,
        };
        let response = match self.listener.as_deref_mut() {
            Some(listener) => self
                .controller
                .handle_event(event, &mut self.state, ctx, listener),
            None => self
                .controller
                .handle_event(event, &mut self.state, ctx, &mut NullListener),
        };
        if response.redraw {
            self.redraw_requested = true;
        }
        response
    }

    /// Forward a media failure to the listener.
    ///
    /// The numeric state is left untouched.
    pub fn report_media_failure(&mut self, error: &TrimStripError) {
        warn!(error = %error, "Timeline media unavailable");
        if let Some(listener) = self.listener.as_deref_mut() {
            listener.on_frames_failed(error);
        }
        self.redraw_requested = true;
    }

    /// Ask for a redraw from outside (e.g. frames arrived).
    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    /// Return and clear the pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }
}
