//! The trim strip as an egui widget.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use egui::{ColorImage, Sense, TextureHandle, TextureOptions, Ui};
use tracing::{debug, info};
use trimstrip_core::{
    EventResponse, Result, TimelineListener, TimelineOptions, TrimTimeline, Vec2,
};
use trimstrip_media::{
    DurationProbe, FrameEvent, FrameKey, FrameLoader, FrameProvider, SidecarFrameProvider,
    Thumbnail,
};

use crate::input::{handle_cursor, pointer_events};
use crate::layout::StripLayout;
use crate::paint::{paint_strip, StripPalette};

/// Default widget height in points.
pub const DEFAULT_HEIGHT: f32 = 72.0;

/// Outcome of one [`TimelineView::show`] call.
#[derive(Debug)]
pub struct TimelineOutput {
    pub response: egui::Response,
    /// Combined controller response for this frame's pointer events. When
    /// `handled` is set the gesture belongs to a handle and the host should
    /// not act on it.
    pub pointer: EventResponse,
}

/// Video trim strip: thumbnails, trim handles and an optional playhead.
pub struct TimelineView {
    timeline: TrimTimeline,
    loader: FrameLoader,
    probe: Arc<dyn DurationProbe>,
    source: Option<PathBuf>,
    textures: Vec<TextureHandle>,
    height: f32,
    waker_installed: bool,
}

impl TimelineView {
    /// Widget backed by ffmpeg for thumbnails and ffprobe for durations.
    pub fn new(options: TimelineOptions) -> Result<Self> {
        let sidecar = Arc::new(SidecarFrameProvider::new());
        Self::with_backends(options, sidecar.clone(), sidecar)
    }

    pub fn with_backends(
        options: TimelineOptions,
        frames: Arc<dyn FrameProvider>,
        probe: Arc<dyn DurationProbe>,
    ) -> Result<Self> {
        Ok(Self {
            timeline: TrimTimeline::new(options)?,
            loader: FrameLoader::new(frames),
            probe,
            source: None,
            textures: Vec::new(),
            height: DEFAULT_HEIGHT,
            waker_installed: false,
        })
    }

    pub fn timeline(&self) -> &TrimTimeline {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut TrimTimeline {
        &mut self.timeline
    }

    pub fn loader(&self) -> &FrameLoader {
        &self.loader
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height.max(0.0);
    }

    pub fn set_listener(&mut self, listener: Box<dyn TimelineListener>) {
        self.timeline.set_listener(listener);
    }

    /// Move the playhead to an absolute fraction of the full duration.
    pub fn set_progress(&mut self, progress: f32) {
        self.timeline.set_progress(progress);
    }

    /// Switch to a new video.
    ///
    /// The duration is probed right away; thumbnails follow asynchronously.
    /// An unreadable source keeps the previous duration, leaves the strip
    /// blank and reports `on_frames_failed`.
    pub fn set_source(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.loader.invalidate();
        self.textures.clear();

        match self.probe.probe_duration_micros(&path) {
            Ok(micros) => {
                info!(source = %path.display(), micros, "Timeline source set");
                self.timeline.set_duration_micros(micros);
                self.source = Some(path);
            }
            Err(e) => {
                self.timeline.report_media_failure(&e);
                self.source = None;
            }
        }
        self.timeline.request_redraw();
    }

    /// Lay out, handle input and paint.
    pub fn show(&mut self, ui: &mut Ui) -> TimelineOutput {
        if !self.waker_installed {
            let ctx = ui.ctx().clone();
            self.loader.set_waker(move || ctx.request_repaint());
            self.waker_installed = true;
        }

        let desired = egui::vec2(ui.available_width(), self.height);
        let (response, painter) = ui.allocate_painter(desired, Sense::click_and_drag());
        let rect = response.rect;
        self.timeline.layout(rect.width(), rect.height());

        self.sync_frames(ui.ctx());

        let mut pointer = EventResponse::UNHANDLED;
        if ui.is_enabled() {
            let events = ui.input(|i| i.events.clone());
            for event in pointer_events(&events, rect) {
                let r = self.timeline.handle_pointer(event);
                pointer.handled |= r.handled;
                pointer.redraw |= r.redraw;
            }
        }

        let cursor_handle = self.timeline.drag_phase().handle().or_else(|| {
            response
                .hover_pos()
                .map(|p| Vec2::new(p.x - rect.min.x, p.y - rect.min.y))
                .and_then(|p| self.timeline.handle_at(p))
        });
        if let Some(handle) = cursor_handle {
            ui.ctx().set_cursor_icon(handle_cursor(handle));
        }

        if let Some(layout) = StripLayout::compute(
            self.timeline.geometry(),
            self.timeline.state(),
            self.timeline.options(),
        ) {
            let options = self.timeline.options();
            let palette = StripPalette::new(options.color, options.icon_color);
            paint_strip(&painter, rect.min, &layout, &self.textures, palette);
        }

        if self.timeline.take_redraw_request() {
            ui.ctx().request_repaint();
        }
        TimelineOutput { response, pointer }
    }

    /// Request the strip the current layout needs and install finished decodes.
    fn sync_frames(&mut self, ctx: &egui::Context) {
        let wanted = self
            .source
            .as_deref()
            .and_then(|source| FrameKey::for_geometry(source, self.timeline.geometry()));
        match wanted {
            Some(key) => {
                if self.loader.request(key) {
                    self.textures.clear();
                }
            }
            None if self.loader.cache().key().is_some() => {
                self.loader.invalidate();
                self.textures.clear();
            }
            None => {}
        }

        match self.loader.poll() {
            Some(FrameEvent::Ready(key)) => {
                self.textures = upload(ctx, self.loader.frames());
                debug!(frames = self.textures.len(), edge_px = key.edge_px, "Uploaded thumbnails");
                self.timeline.request_redraw();
            }
            Some(FrameEvent::Failed(e)) => {
                self.textures.clear();
                self.timeline.report_media_failure(&e);
            }
            None => {}
        }
    }
}

fn upload(ctx: &egui::Context, frames: &[Thumbnail]) -> Vec<TextureHandle> {
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            let size = [frame.width() as usize, frame.height() as usize];
            let image = ColorImage::from_rgba_unmultiplied(size, frame.as_raw());
            ctx.load_texture(format!("trimstrip-frame-{i}"), image, TextureOptions::LINEAR)
        })
        .collect()
}
