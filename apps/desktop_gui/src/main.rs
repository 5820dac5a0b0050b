mod backend_bridge;
mod config;
mod ui;

use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::commands::{BackendCommand, UiEvent};
use crate::ui::app::ScribeApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Audio Scribe")
            .with_inner_size([760.0, 560.0])
            .with_min_inner_size([560.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Audio Scribe",
        options,
        Box::new(|_cc| Ok(Box::new(ScribeApp::new(cmd_tx, ui_rx)))),
    )
}
