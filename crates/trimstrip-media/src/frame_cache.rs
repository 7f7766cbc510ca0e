//! Decode-once thumbnail cache and its background loader.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use tracing::{debug, info, warn};
use trimstrip_core::{Result, TrimStripError, ViewportGeometry};

use crate::thumbnail::{DecodeCancel, FrameProvider, Thumbnail};

/// Identifies one decoded strip: the same key never decodes twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameKey {
    pub source: PathBuf,
    pub frame_count: usize,
    pub edge_px: u32,
}

impl FrameKey {
    pub fn new(source: impl Into<PathBuf>, frame_count: usize, edge_px: u32) -> Self {
        Self {
            source: source.into(),
            frame_count,
            edge_px,
        }
    }

    /// Key for the strip a layout needs, or `None` when it shows no frames.
    pub fn for_geometry(source: &Path, geometry: &ViewportGeometry) -> Option<Self> {
        if geometry.is_empty() {
            return None;
        }
        Some(Self::new(source, geometry.frame_count, geometry.frame_size))
    }
}

/// Lifecycle of the cached strip.
#[derive(Debug, Clone, Default)]
pub enum FrameCache {
    #[default]
    Empty,
    Pending(FrameKey),
    Ready(FrameKey, Arc<Vec<Thumbnail>>),
    Failed(FrameKey),
}

impl FrameCache {
    pub fn key(&self) -> Option<&FrameKey> {
        match self {
            Self::Empty => None,
            Self::Pending(key) | Self::Ready(key, _) | Self::Failed(key) => Some(key),
        }
    }

    /// Whether `key` was already requested, successfully or not.
    pub fn holds(&self, key: &FrameKey) -> bool {
        self.key() == Some(key)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(..))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Decoded frames; empty unless ready.
    pub fn frames(&self) -> &[Thumbnail] {
        match self {
            Self::Ready(_, frames) => frames,
            _ => &[],
        }
    }

    pub fn clear(&mut self) {
        *self = Self::Empty;
    }
}

/// Result of a finished decode, reported by [`FrameLoader::poll`].
#[derive(Debug)]
pub enum FrameEvent {
    Ready(FrameKey),
    Failed(TrimStripError),
}

struct DecodeOutcome {
    generation: u64,
    result: Result<Vec<Thumbnail>>,
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Runs [`FrameProvider`] off the render path and installs the result.
///
/// A request bumps the generation; results from older generations are
/// dropped, so a source or size change never shows stale frames. Workers
/// share the counter and stop between frames once superseded.
pub struct FrameLoader {
    provider: Arc<dyn FrameProvider>,
    cache: FrameCache,
    generation: Arc<AtomicU64>,
    tx: Sender<DecodeOutcome>,
    rx: Receiver<DecodeOutcome>,
    waker: Option<Waker>,
}

impl FrameLoader {
    pub fn new(provider: Arc<dyn FrameProvider>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            provider,
            cache: FrameCache::Empty,
            generation: Arc::new(AtomicU64::new(0)),
            tx,
            rx,
            waker: None,
        }
    }

    /// Callback invoked from the worker thread after each decode.
    pub fn set_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.waker = Some(Arc::new(waker));
    }

    pub fn cache(&self) -> &FrameCache {
        &self.cache
    }

    pub fn frames(&self) -> &[Thumbnail] {
        self.cache.frames()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Start decoding `key` unless it was already requested.
    ///
    /// Returns `true` when a decode was started.
    pub fn request(&mut self, key: FrameKey) -> bool {
        if self.cache.holds(&key) {
            return false;
        }
        let generation = self.bump_generation();
        self.cache = FrameCache::Pending(key.clone());
        info!(
            source = %key.source.display(),
            frame_count = key.frame_count,
            edge_px = key.edge_px,
            generation,
            "Requesting thumbnail strip"
        );

        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let waker = self.waker.clone();
        let cancel = DecodeCancel::new(Arc::clone(&self.generation), generation);
        let spawned = std::thread::Builder::new()
            .name("trimstrip-decode".into())
            .spawn(move || {
                let result =
                    provider.decode(&key.source, key.frame_count, key.edge_px, &cancel);
                // receiver gone means the loader was dropped
                let _ = tx.send(DecodeOutcome { generation, result });
                if let Some(wake) = waker {
                    wake();
                }
            });

        if let Err(e) = spawned {
            warn!(error = %e, "Failed to start decode thread");
            let _ = self.tx.send(DecodeOutcome {
                generation,
                result: Err(e.into()),
            });
        }
        true
    }

    /// Drop the cached strip and ignore any decode still in flight.
    pub fn invalidate(&mut self) {
        if !matches!(self.cache, FrameCache::Empty) {
            debug!(generation = self.generation(), "Invalidating thumbnail strip");
        }
        self.bump_generation();
        self.cache.clear();
    }

    /// Install the newest finished decode, if any. Never blocks.
    pub fn poll(&mut self) -> Option<FrameEvent> {
        let mut latest = None;
        while let Ok(outcome) = self.rx.try_recv() {
            if let Some(event) = self.install(outcome) {
                latest = Some(event);
            }
        }
        latest
    }

    /// Block until the pending decode finishes or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> Option<FrameEvent> {
        let deadline = Instant::now() + timeout;
        while self.cache.is_pending() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) => {
                    if let Some(event) = self.install(outcome) {
                        return Some(event);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            }
        }
        None
    }

    fn install(&mut self, outcome: DecodeOutcome) -> Option<FrameEvent> {
        let current = self.generation();
        if outcome.generation != current {
            debug!(
                stale = outcome.generation,
                current,
                "Dropping stale decode"
            );
            return None;
        }
        let key = match &self.cache {
            FrameCache::Pending(key) => key.clone(),
            _ => return None,
        };
        match outcome.result {
            Ok(frames) => {
                info!(frames = frames.len(), "Thumbnail strip ready");
                self.cache = FrameCache::Ready(key.clone(), Arc::new(frames));
                Some(FrameEvent::Ready(key))
            }
            Err(e) => {
                warn!(error = %e, source = %key.source.display(), "Thumbnail strip failed");
                self.cache = FrameCache::Failed(key);
                Some(FrameEvent::Failed(e))
            }
        }
    }
}
