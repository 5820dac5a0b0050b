use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use eframe::egui;
use scribe_core::SessionSnapshot;

use crate::backend_bridge::commands::{BackendCommand, UiEvent};

pub struct ScribeApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    snapshot: SessionSnapshot,
    status: String,
    applied_dark: Option<bool>,
}

impl ScribeApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            snapshot: SessionSnapshot::default(),
            status: String::new(),
            applied_dark: None,
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        match self.cmd_tx.try_send(cmd) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.status = "Backend queue is full; please retry".to_string();
            }
            Err(TrySendError::Disconnected(_)) => {
                self.status = "Backend worker disconnected; restart the app".to_string();
            }
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Snapshot(snapshot) => self.snapshot = snapshot,
                UiEvent::Info(message) | UiEvent::Error(message) => self.status = message,
            }
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.applied_dark == Some(self.snapshot.is_dark_mode) {
            return;
        }
        if self.snapshot.is_dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }
        self.applied_dark = Some(self.snapshot.is_dark_mode);
    }

    fn show_file_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Select audio file…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Audio", &["mp3", "wav", "m4a", "ogg", "flac"])
                    .pick_file()
                {
                    self.dispatch(BackendCommand::SelectFile { path });
                }
            }
            match &self.snapshot.selected_file {
                Some(file) => {
                    ui.label(format!(
                        "{} ({})",
                        file.name,
                        human_readable_bytes(file.size_bytes as u64)
                    ));
                }
                None => {
                    ui.weak("No file selected");
                }
            }
        });
    }

    fn show_action_row(&mut self, ui: &mut egui::Ui) {
        let snapshot = self.snapshot.clone();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(snapshot.can_transcribe(), egui::Button::new("Transcribe"))
                .clicked()
            {
                self.dispatch(BackendCommand::Transcribe);
            }
            if ui
                .add_enabled(snapshot.can_fix_grammar(), egui::Button::new("Fix grammar"))
                .clicked()
            {
                self.dispatch(BackendCommand::FixGrammar);
            }
            if snapshot.is_transcribing {
                ui.spinner();
                ui.label("Transcribing…");
            }
            if snapshot.is_fixing_grammar {
                ui.spinner();
                ui.label("Fixing grammar…");
            }
            if ui
                .button(if snapshot.is_dark_mode {
                    "Light mode"
                } else {
                    "Dark mode"
                })
                .clicked()
            {
                self.dispatch(BackendCommand::ToggleDarkMode);
            }
        });
    }

    fn show_transcript(&mut self, ui: &mut egui::Ui) {
        let snapshot = self.snapshot.clone();

        if snapshot.corrected_text.is_some() {
            ui.horizontal(|ui| {
                if ui
                    .selectable_label(!snapshot.showing_corrected, "Original")
                    .clicked()
                {
                    self.dispatch(BackendCommand::ShowView { corrected: false });
                }
                if ui
                    .selectable_label(snapshot.showing_corrected, "Corrected")
                    .clicked()
                {
                    self.dispatch(BackendCommand::ShowView { corrected: true });
                }
            });
        }

        let Some(text) = snapshot.displayed_text() else {
            return;
        };

        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .max_height(260.0)
            .show(ui, |ui| {
                let mut shown = text.to_string();
                ui.add(
                    egui::TextEdit::multiline(&mut shown)
                        .desired_width(f32::INFINITY)
                        .desired_rows(10)
                        .interactive(false),
                );
            });

        ui.horizontal(|ui| {
            let copy_label = if snapshot.is_copied { "Copied!" } else { "Copy" };
            if ui.button(copy_label).clicked() {
                self.dispatch(BackendCommand::CopyText);
            }
            if ui
                .button(format!("Save {}", snapshot.download_file_name()))
                .clicked()
            {
                self.dispatch(BackendCommand::SaveTranscript);
            }
        });
    }
}

impl eframe::App for ScribeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.apply_theme_if_needed(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Audio Scribe");
            ui.add_space(8.0);
            self.show_file_row(ui);
            ui.separator();
            self.show_action_row(ui);

            if let Some(error) = self.snapshot.error_message.clone() {
                ui.add_space(4.0);
                ui.colored_label(ui.visuals().error_fg_color, error);
            }

            ui.add_space(8.0);
            self.show_transcript(ui);

            if !self.status.is_empty() {
                ui.add_space(8.0);
                ui.weak(self.status.clone());
            }
        });

        // Snapshots arrive from the worker thread between frames.
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

fn human_readable_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        return format!("{bytes} B");
    }
    if bytes < MB {
        return format_scaled_unit(bytes, KB, "KB");
    }
    if bytes < GB {
        return format_scaled_unit(bytes, MB, "MB");
    }
    format_scaled_unit(bytes, GB, "GB")
}

fn format_scaled_unit(bytes: u64, unit_size: u64, unit_label: &str) -> String {
    let value = bytes as f64 / unit_size as f64;
    let value_text = format!("{value:.1}");
    let compact_value = value_text.strip_suffix(".0").unwrap_or(&value_text);
    format!("{compact_value} {unit_label}")
}

#[cfg(test)]
mod tests {
    use super::human_readable_bytes;

    #[test]
    fn formats_file_sizes_readably() {
        assert_eq!(human_readable_bytes(0), "0 B");
        assert_eq!(human_readable_bytes(1023), "1023 B");
        assert_eq!(human_readable_bytes(1024), "1 KB");
        assert_eq!(human_readable_bytes(1536), "1.5 KB");
        assert_eq!(human_readable_bytes(2 * 1024 * 1024), "2 MB");
        assert_eq!(human_readable_bytes(25 * 1024 * 1024), "25 MB");
    }
}
