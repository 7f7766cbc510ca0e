//! TrimStrip Media - thumbnails and durations for the trim strip
//!
//! This crate handles:
//! - Duration probing through ffprobe
//! - Evenly spaced thumbnail decoding through ffmpeg-sidecar
//! - Aspect-fill square cropping
//! - The decode-once frame cache and its background loader

pub mod frame_cache;
pub mod probe;
pub mod sidecar;
pub mod thumbnail;

pub use frame_cache::{FrameCache, FrameEvent, FrameKey, FrameLoader};
pub use probe::{DurationProbe, FfprobeDurationProbe};
pub use sidecar::SidecarFrameProvider;
pub use thumbnail::{
    frame_timestamps, prepare_thumbnail, DecodeCancel, FrameProvider, Thumbnail,
};

/// Log whether the FFmpeg tools are reachable (call once at startup).
pub fn init() {
    if SidecarFrameProvider::is_available() {
        tracing::info!("TrimStrip Media initialized");
    } else {
        tracing::warn!("ffmpeg not found; thumbnails will be unavailable");
    }
}
