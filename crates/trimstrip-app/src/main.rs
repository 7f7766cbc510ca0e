//! TrimStrip - video trim strip demo
//!
//! `trimstrip [VIDEO] [OPTIONS.json]`

mod event_log;

use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver};
use eframe::egui;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use trimstrip_core::{TimelineEvent, TimelineOptions};
use trimstrip_ui::{format_duration_label, TimelineView};

use crate::event_log::EventLog;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("TrimStrip starting...");
    trimstrip_media::init();

    let mut args = std::env::args().skip(1);
    let video_path = args.next().map(PathBuf::from);
    let options = match args.next() {
        Some(path) => {
            let data = std::fs::read(&path).with_context(|| format!("reading {path}"))?;
            TimelineOptions::from_json(&data).with_context(|| format!("loading {path}"))?
        }
        None => TimelineOptions::default(),
    };
    let app = TrimStripApp::new(options, video_path)?;

    let native = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 360.0])
            .with_title("TrimStrip"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native("TrimStrip", native, Box::new(move |_cc| Ok(Box::new(app))))?;

    Ok(())
}

struct TrimStripApp {
    view: TimelineView,
    events: Receiver<TimelineEvent>,
    log: EventLog,
    start_progress: f32,
}

impl TrimStripApp {
    fn new(options: TimelineOptions, video_path: Option<PathBuf>) -> Result<Self> {
        let start_progress = options.start_progress;
        let mut view = TimelineView::new(options)?;
        let (tx, rx) = unbounded();
        view.set_listener(Box::new(tx));
        if let Some(path) = video_path {
            view.set_source(path);
        }
        Ok(Self {
            view,
            events: rx,
            log: EventLog::default(),
            start_progress,
        })
    }

    fn open_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Video", &["mp4", "mov", "mkv", "webm", "avi", "m4v"])
            .pick_file();
        if let Some(path) = picked {
            info!(path = %path.display(), "Opening video");
            self.view.set_source(path);
        }
    }
}

impl eframe::App for TrimStripApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for event in self.events.try_iter() {
            self.log.push(event);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open video…").clicked() {
                    self.open_dialog();
                }
                if ui.button("Reset").clicked() {
                    self.view.set_progress(self.start_progress);
                }
                ui.separator();
                match self.view.source() {
                    Some(path) => ui.label(path.display().to_string()),
                    None => ui.weak("No video loaded"),
                };
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.view.show(ui);
            ui.add_space(8.0);

            let timeline = self.view.timeline();
            let state = timeline.state();
            ui.horizontal(|ui| {
                ui.label(format!("Start {:.3}", state.trim_start));
                ui.separator();
                ui.label(format!("End {:.3}", state.trim_end));
                ui.separator();
                ui.label(format!("Play {:.3}", timeline.play_progress()));
                ui.separator();
                ui.label(format!(
                    "Selected {}",
                    format_duration_label(timeline.cropped_duration_micros())
                ));
                ui.separator();
                ui.label(format!("{:?}", timeline.drag_phase()));
            });

            ui.separator();
            self.log.show(ui);
        });
    }
}
