//! FFmpeg-backed frame provider.
//!
//! Every thumbnail is one short-lived ffmpeg process: an input-side seek to
//! the nearest key frame, a single rawvideo RGB frame on stdout, and the
//! square crop done in-process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use image::{DynamicImage, RgbImage};
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use trimstrip_core::{Result, TrimStripError};

use crate::probe::{DurationProbe, FfprobeDurationProbe};
use crate::thumbnail::{
    frame_timestamps, prepare_thumbnail, DecodeCancel, FrameProvider, Thumbnail,
};

/// [`FrameProvider`] and [`DurationProbe`] built on ffmpeg-sidecar.
///
/// Durations are probed once per path and memoized.
pub struct SidecarFrameProvider {
    probe: Arc<dyn DurationProbe>,
    durations: Mutex<HashMap<PathBuf, u64>>,
}

impl Default for SidecarFrameProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SidecarFrameProvider {
    pub fn new() -> Self {
        Self::with_probe(Arc::new(FfprobeDurationProbe::new()))
    }

    pub fn with_probe(probe: Arc<dyn DurationProbe>) -> Self {
        Self {
            probe,
            durations: Mutex::new(HashMap::new()),
        }
    }

    /// Whether the ffmpeg binary can be located.
    pub fn is_available() -> bool {
        ffmpeg_sidecar::command::ffmpeg_is_installed()
    }

    /// Forget the memoized duration of `source`.
    pub fn forget(&self, source: &Path) {
        self.durations.lock().remove(source);
    }

    fn decode_one(
        &self,
        source: &Path,
        index: usize,
        at_micros: u64,
        edge: u32,
    ) -> Result<Thumbnail> {
        let failed = |reason: String| TrimStripError::FrameDecodeFailed { index, reason };

        let mut child = FfmpegCommand::new()
            .hide_banner()
            .arg("-noaccurate_seek")
            .seek(seek_position(at_micros))
            .input(source.to_string_lossy())
            .args(["-vf", scale_filter(edge).as_str()])
            .frames(1)
            .rawvideo()
            .spawn()
            .map_err(|e| failed(format!("failed to spawn ffmpeg: {e}")))?;

        let mut frame = None;
        let mut last_error = None;
        let events = child.iter().map_err(|e| failed(e.to_string()))?;
        for event in events {
            match event {
                FfmpegEvent::OutputFrame(f) if frame.is_none() => frame = Some(f),
                FfmpegEvent::Log(LogLevel::Error, msg)
                | FfmpegEvent::Error(msg) => last_error = Some(msg),
                _ => {}
            }
        }
        if let Err(e) = child.wait() {
            debug!(error = %e, "ffmpeg did not exit cleanly");
        }

        let frame = frame.ok_or_else(|| {
            failed(last_error.unwrap_or_else(|| "ffmpeg produced no frame".into()))
        })?;
        let rgb = RgbImage::from_raw(frame.width, frame.height, frame.data).ok_or_else(|| {
            failed(format!(
                "short frame buffer for {}x{}",
                frame.width, frame.height
            ))
        })?;
        Ok(prepare_thumbnail(&DynamicImage::ImageRgb8(rgb), edge))
    }
}

impl DurationProbe for SidecarFrameProvider {
    fn probe_duration_micros(&self, source: &Path) -> Result<u64> {
        if let Some(&micros) = self.durations.lock().get(source) {
            return Ok(micros);
        }
        let micros = self.probe.probe_duration_micros(source)?;
        self.durations.lock().insert(source.to_path_buf(), micros);
        Ok(micros)
    }
}

impl FrameProvider for SidecarFrameProvider {
    fn decode(
        &self,
        source: &Path,
        frame_count: usize,
        edge_px: u32,
        cancel: &DecodeCancel,
    ) -> Result<Vec<Thumbnail>> {
        if frame_count == 0 || edge_px == 0 {
            return Ok(Vec::new());
        }
        cancel.check()?;
        let duration = self.probe_duration_micros(source)?;
        info!(
            source = %source.display(),
            frame_count,
            edge_px,
            "Decoding thumbnail strip"
        );

        let mut frames = Vec::with_capacity(frame_count);
        for (index, at) in frame_timestamps(duration, frame_count).into_iter().enumerate() {
            if cancel.is_cancelled() {
                debug!(
                    source = %source.display(),
                    decoded = index,
                    generation = cancel.generation(),
                    "Thumbnail strip superseded"
                );
                return Err(TrimStripError::DecodeCancelled);
            }
            match self.decode_one(source, index, at, edge_px) {
                Ok(thumb) => frames.push(thumb),
                Err(e) => {
                    warn!(error = %e, source = %source.display(), "Thumbnail decode failed");
                    return Err(e);
                }
            }
        }
        Ok(frames)
    }
}

/// `-ss` argument for a position in microseconds.
pub fn seek_position(micros: u64) -> String {
    format!("{}.{:06}", micros / 1_000_000, micros % 1_000_000)
}

/// Filter that scales a frame to cover an `edge × edge` square.
pub fn scale_filter(edge: u32) -> String {
    format!("scale={edge}:{edge}:force_original_aspect_ratio=increase")
}
