use std::path::PathBuf;

use scribe_core::SessionSnapshot;

/// Actions queued from UI widgets to the backend worker.
pub enum BackendCommand {
    SelectFile { path: PathBuf },
    Transcribe,
    FixGrammar,
    ShowView { corrected: bool },
    CopyText,
    SaveTranscript,
    ToggleDarkMode,
}

/// Feedback flowing back to the egui thread.
pub enum UiEvent {
    Snapshot(SessionSnapshot),
    Info(String),
    Error(String),
}
