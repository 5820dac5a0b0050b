use std::{sync::Arc, thread};

use anyhow::Result;
use crossbeam_channel::{Receiver, Sender};
use scribe_core::{ClipboardSink, FsTranscriptSaver, HttpScribeApi, SessionController};
use shared::domain::AudioFile;

use crate::backend_bridge::commands::{BackendCommand, UiEvent};
use crate::config;

/// arboard-backed clipboard. Each write opens a fresh handle; arboard
/// contexts are not Sync and the writes are rare.
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text.to_string())?;
        Ok(())
    }
}

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let settings = config::load_settings();
            let download_dir = config::resolve_download_dir(&settings);
            tracing::info!(
                api_base_url = %settings.api_base_url,
                download_dir = %download_dir.display(),
                "backend worker ready"
            );

            let controller = SessionController::new_with_dependencies(
                Arc::new(HttpScribeApi::new(settings.api_base_url)),
                Arc::new(SystemClipboard),
                Arc::new(FsTranscriptSaver::new(download_dir)),
            );

            let mut events = controller.subscribe_events();
            let snapshot_tx = ui_tx.clone();
            tokio::spawn(async move {
                while let Ok(snapshot) = events.recv().await {
                    let _ = snapshot_tx.try_send(UiEvent::Snapshot(snapshot));
                }
            });

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::SelectFile { path } => match std::fs::read(&path) {
                        Ok(bytes) => {
                            let name = path
                                .file_name()
                                .and_then(|name| name.to_str())
                                .unwrap_or("audio")
                                .to_string();
                            controller.select_file(AudioFile::new(name, bytes)).await;
                        }
                        Err(err) => {
                            let _ = ui_tx.try_send(UiEvent::Error(format!(
                                "could not read {}: {err}",
                                path.display()
                            )));
                        }
                    },
                    BackendCommand::Transcribe => controller.submit_transcription().await,
                    BackendCommand::FixGrammar => controller.submit_grammar_fix().await,
                    BackendCommand::ShowView { corrected } => {
                        controller.toggle_view(corrected).await
                    }
                    BackendCommand::CopyText => controller.copy_current_text().await,
                    BackendCommand::SaveTranscript => {
                        if let Some(path) = controller.download_current_text().await {
                            let _ = ui_tx
                                .try_send(UiEvent::Info(format!("Saved {}", path.display())));
                        }
                    }
                    BackendCommand::ToggleDarkMode => controller.toggle_dark_mode().await,
                }
            }
        });
    });
}
