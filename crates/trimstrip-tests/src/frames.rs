//! Frame loading wired to the timeline layout.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::unbounded;
use parking_lot::Mutex;
use trimstrip_core::{
    FrameFailure, PointerEvent, Result, TimelineEvent, TimelineOptions, TrimStripError,
    TrimTimeline, Vec2,
};
use trimstrip_media::{
    DecodeCancel, DurationProbe, FrameEvent, FrameKey, FrameLoader, FrameProvider,
    SidecarFrameProvider, Thumbnail,
};

const TIMEOUT: Duration = Duration::from_secs(5);

// ── Helpers ────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingProvider {
    requests: Mutex<Vec<(usize, u32)>>,
    fail: bool,
}

impl FrameProvider for RecordingProvider {
    fn decode(
        &self,
        source: &Path,
        frame_count: usize,
        edge_px: u32,
        _cancel: &DecodeCancel,
    ) -> Result<Vec<Thumbnail>> {
        self.requests.lock().push((frame_count, edge_px));
        if self.fail {
            return Err(TrimStripError::FrameDecodeFailed {
                index: 0,
                reason: format!("{} is corrupt", source.display()),
            });
        }
        Ok(vec![Thumbnail::new(edge_px, edge_px); frame_count])
    }
}

struct UnreadableProbe {
    calls: AtomicUsize,
}

impl DurationProbe for UnreadableProbe {
    fn probe_duration_micros(&self, source: &Path) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TrimStripError::SourceUnreadable(source.display().to_string()))
    }
}

fn timeline() -> TrimTimeline {
    let mut t = TrimTimeline::new(TimelineOptions::default()).unwrap();
    t.layout(1000.0, 116.0);
    t
}

fn key_for(t: &TrimTimeline) -> FrameKey {
    FrameKey::for_geometry(Path::new("/videos/clip.mp4"), t.geometry()).unwrap()
}

// ── Decode-once ────────────────────────────────────────────────

#[test]
fn repeated_layout_passes_decode_once() {
    let provider = Arc::new(RecordingProvider::default());
    let mut loader = FrameLoader::new(provider.clone());
    let mut t = timeline();

    for _ in 0..5 {
        t.layout(1000.0, 116.0);
        loader.request(key_for(&t));
    }
    assert!(matches!(loader.wait(TIMEOUT), Some(FrameEvent::Ready(_))));
    assert_eq!(*provider.requests.lock(), vec![(10, 100)]);
    assert_eq!(loader.frames().len(), t.geometry().frame_count);
}

#[test]
fn resize_decodes_new_strip() {
    let provider = Arc::new(RecordingProvider::default());
    let mut loader = FrameLoader::new(provider.clone());
    let mut t = timeline();

    loader.request(key_for(&t));
    loader.wait(TIMEOUT);

    t.layout(1000.0, 76.0);
    assert!(loader.request(key_for(&t)));
    loader.wait(TIMEOUT);

    assert_eq!(*provider.requests.lock(), vec![(10, 100), (16, 60)]);
    assert_eq!(loader.frames()[0].dimensions(), (60, 60));
}

// ── Failures ───────────────────────────────────────────────────

#[test]
fn decode_failure_leaves_state_untouched() {
    let provider = Arc::new(RecordingProvider {
        fail: true,
        ..Default::default()
    });
    let mut loader = FrameLoader::new(provider);
    let mut t = timeline();
    let (tx, rx) = unbounded();
    t.set_listener(Box::new(tx));

    t.handle_pointer(PointerEvent::Down(Vec2::new(1000.0, 50.0)));
    t.handle_pointer(PointerEvent::Move(Vec2::new(650.0, 50.0)));
    t.handle_pointer(PointerEvent::Up(Vec2::new(650.0, 50.0)));
    let before = *t.state();
    rx.try_iter().for_each(drop);

    loader.request(key_for(&t));
    match loader.wait(TIMEOUT) {
        Some(FrameEvent::Failed(e)) => t.report_media_failure(&e),
        other => panic!("expected failure, got {other:?}"),
    }

    assert_eq!(*t.state(), before);
    assert!(loader.frames().is_empty());
    let events: Vec<_> = rx.try_iter().collect();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        TimelineEvent::FramesFailed(FrameFailure::FrameDecodeFailed { reason, .. })
            if reason.contains("corrupt")
    ));

    // the strip stays blank but dragging still works
    t.handle_pointer(PointerEvent::Down(Vec2::new(650.0, 50.0)));
    t.handle_pointer(PointerEvent::Move(Vec2::new(500.0, 50.0)));
    assert!((t.state().trim_end - 0.5).abs() < 1e-4);
}

#[test]
fn sidecar_reports_unreadable_source_without_spawning() {
    let probe = Arc::new(UnreadableProbe {
        calls: AtomicUsize::new(0),
    });
    let provider = Arc::new(SidecarFrameProvider::with_probe(probe.clone()));
    let mut loader = FrameLoader::new(provider);

    loader.request(FrameKey::new("/videos/gone.mp4", 4, 32));
    assert!(matches!(
        loader.wait(TIMEOUT),
        Some(FrameEvent::Failed(TrimStripError::SourceUnreadable(_)))
    ));
    assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
}
