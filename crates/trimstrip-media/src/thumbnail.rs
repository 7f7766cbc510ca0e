//! Frame Provider contract and square thumbnail preparation.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use trimstrip_core::{Result, TrimStripError};

/// A decoded, square, RGBA thumbnail.
pub type Thumbnail = RgbaImage;

/// Cancellation token for one decode request.
///
/// Holds the generation the request was issued under and the loader's live
/// generation counter; once the two differ the request has been superseded.
#[derive(Debug, Clone)]
pub struct DecodeCancel {
    current: Arc<AtomicU64>,
    generation: u64,
}

impl DecodeCancel {
    pub fn new(current: Arc<AtomicU64>, generation: u64) -> Self {
        Self {
            current,
            generation,
        }
    }

    /// A token that is never cancelled.
    pub fn never() -> Self {
        Self::new(Arc::new(AtomicU64::new(0)), 0)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.current.load(Ordering::Acquire) != self.generation
    }

    /// `Err(DecodeCancelled)` once superseded.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(TrimStripError::DecodeCancelled);
        }
        Ok(())
    }
}

/// Produces the thumbnails of a frame strip.
pub trait FrameProvider: Send + Sync {
    /// Decode `frame_count` evenly spaced frames of `source`, each cropped to
    /// `edge_px × edge_px`, in timeline order.
    ///
    /// Implementations should poll `cancel` between frames and stop with
    /// [`TrimStripError::DecodeCancelled`] once it fires.
    fn decode(
        &self,
        source: &Path,
        frame_count: usize,
        edge_px: u32,
        cancel: &DecodeCancel,
    ) -> Result<Vec<Thumbnail>>;
}

/// Scale `image` to cover an `edge × edge` square and crop the centre.
pub fn prepare_thumbnail(image: &DynamicImage, edge: u32) -> Thumbnail {
    if edge == 0 || image.width() == 0 || image.height() == 0 {
        return RgbaImage::new(0, 0);
    }
    if image.width() == edge && image.height() == edge {
        return image.to_rgba8();
    }
    image.resize_to_fill(edge, edge, FilterType::Triangle).to_rgba8()
}

/// Presentation times, in microseconds, of `count` evenly spaced frames.
///
/// Frame `i` sits at `i * duration / count`; the last frame never reaches
/// the end of the source.
pub fn frame_timestamps(duration_micros: u64, count: usize) -> Vec<u64> {
    if count == 0 {
        return Vec::new();
    }
    let count = count as u128;
    (0..count)
        .map(|i| (i * duration_micros as u128 / count) as u64)
        .collect()
}
