//! Scrolling list of listener callbacks.

use std::collections::VecDeque;

use eframe::egui;
use trimstrip_core::TimelineEvent;

const MAX_ENTRIES: usize = 200;

#[derive(Default)]
pub struct EventLog {
    entries: VecDeque<String>,
}

impl EventLog {
    pub fn push(&mut self, event: TimelineEvent) {
        if self.entries.len() == MAX_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(describe(&event));
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for entry in &self.entries {
                    ui.monospace(entry);
                }
            });
    }
}

fn describe(event: &TimelineEvent) -> String {
    match event {
        TimelineEvent::LeftProgressChanged(p) => format!("left    {p:.4}"),
        TimelineEvent::RightProgressChanged(p) => format!("right   {p:.4}"),
        TimelineEvent::DurationChanged(us) => format!("length  {:.3}s", *us as f64 / 1e6),
        TimelineEvent::PlayProgressChanged(p) => format!("play    {p:.4}"),
        TimelineEvent::DraggingStateChanged(true) => "drag    start".into(),
        TimelineEvent::DraggingStateChanged(false) => "drag    end".into(),
        TimelineEvent::FramesFailed(reason) => format!("failed  {reason}"),
    }
}
