use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{AudioFile, AudioFileMeta, TranscriptView, MAX_FILE_SIZE_BYTES},
    error::ScribeError,
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{info, warn};
use unicode_normalization::UnicodeNormalization;

pub mod api_client;
pub use api_client::HttpScribeApi;

/// How long the copy acknowledgement stays visible. A newer successful
/// copy restarts the window.
pub const COPY_FEEDBACK_WINDOW: Duration = Duration::from_millis(2000);

/// The two opaque HTTP collaborators. Error `Display` is the user-facing
/// detail the controller splices into its error message.
#[async_trait]
pub trait ScribeApi: Send + Sync {
    async fn transcribe(&self, file: &AudioFile) -> Result<String>;
    async fn fix_grammar(&self, text: &str) -> Result<String>;
}

pub trait ClipboardSink: Send + Sync {
    fn set_text(&self, text: &str) -> Result<()>;
}

pub trait TranscriptSaver: Send + Sync {
    fn save(&self, file_name: &str, contents: &str) -> Result<PathBuf>;
}

pub struct MissingClipboard;

impl ClipboardSink for MissingClipboard {
    fn set_text(&self, _text: &str) -> Result<()> {
        Err(anyhow!("clipboard is unavailable"))
    }
}

pub struct MissingTranscriptSaver;

impl TranscriptSaver for MissingTranscriptSaver {
    fn save(&self, _file_name: &str, _contents: &str) -> Result<PathBuf> {
        Err(anyhow!("no save destination configured"))
    }
}

/// Writes transcripts into a fixed directory, creating it on first use.
pub struct FsTranscriptSaver {
    dir: PathBuf,
}

impl FsTranscriptSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TranscriptSaver for FsTranscriptSaver {
    fn save(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

/// Immutable view of the session, broadcast after every state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub selected_file: Option<AudioFileMeta>,
    pub original_text: Option<String>,
    pub corrected_text: Option<String>,
    pub showing_corrected: bool,
    pub is_transcribing: bool,
    pub is_fixing_grammar: bool,
    pub error_message: Option<String>,
    pub is_dark_mode: bool,
    pub is_copied: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        SessionState::empty().snapshot()
    }
}

impl SessionSnapshot {
    pub fn current_view(&self) -> TranscriptView {
        if self.showing_corrected {
            TranscriptView::Corrected
        } else {
            TranscriptView::Original
        }
    }

    /// The text the user currently sees, if any.
    pub fn displayed_text(&self) -> Option<&str> {
        let text = match self.current_view() {
            TranscriptView::Corrected => self.corrected_text.as_deref(),
            TranscriptView::Original => self.original_text.as_deref(),
        };
        text.filter(|text| !text.is_empty())
    }

    /// Grammar correction is offered exactly once per transcript; a fresh
    /// file selection is required to recompute.
    pub fn can_fix_grammar(&self) -> bool {
        self.original_text.as_deref().is_some_and(|t| !t.is_empty())
            && self.corrected_text.is_none()
            && !self.is_transcribing
            && !self.is_fixing_grammar
    }

    pub fn can_transcribe(&self) -> bool {
        self.selected_file.is_some() && !self.is_transcribing && !self.is_fixing_grammar
    }

    /// Deterministic name for a saved transcript:
    /// `<stem>-<original|corrected>.txt`, stem defaulting to
    /// `"transcription"` when no file was ever selected.
    pub fn download_file_name(&self) -> String {
        let stem = self
            .selected_file
            .as_ref()
            .map(|file| file.stem())
            .unwrap_or("transcription");
        format!("{stem}-{}.txt", self.current_view().label())
    }
}

struct SessionState {
    selected_file: Option<AudioFile>,
    original_text: Option<String>,
    corrected_text: Option<String>,
    showing_corrected: bool,
    is_transcribing: bool,
    is_fixing_grammar: bool,
    error_message: Option<String>,
    is_dark_mode: bool,
    is_copied: bool,
    copied_reset: Option<JoinHandle<()>>,
}

impl SessionState {
    fn empty() -> Self {
        Self {
            selected_file: None,
            original_text: None,
            corrected_text: None,
            showing_corrected: false,
            is_transcribing: false,
            is_fixing_grammar: false,
            error_message: None,
            is_dark_mode: false,
            is_copied: false,
            copied_reset: None,
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            selected_file: self.selected_file.as_ref().map(AudioFile::meta),
            original_text: self.original_text.clone(),
            corrected_text: self.corrected_text.clone(),
            showing_corrected: self.showing_corrected,
            is_transcribing: self.is_transcribing,
            is_fixing_grammar: self.is_fixing_grammar,
            error_message: self.error_message.clone(),
            is_dark_mode: self.is_dark_mode,
            is_copied: self.is_copied,
        }
    }

    fn reset_transcripts(&mut self) {
        self.original_text = None;
        self.corrected_text = None;
        self.showing_corrected = false;
        self.error_message = None;
    }
}

/// State plus event fanout, shared with the copy-acknowledgement reset
/// task so that task can outlive the call that spawned it.
struct ControllerShared {
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionSnapshot>,
}

impl ControllerShared {
    fn emit(&self, state: &SessionState) {
        let _ = self.events.send(state.snapshot());
    }
}

/// Owns all mutable state for one upload/transcribe/correct session and
/// issues the two outbound requests in sequence. All mutation goes
/// through the operations below; observers subscribe to snapshots.
pub struct SessionController {
    api: Arc<dyn ScribeApi>,
    clipboard: Arc<dyn ClipboardSink>,
    saver: Arc<dyn TranscriptSaver>,
    shared: Arc<ControllerShared>,
}

impl SessionController {
    pub fn new(api: Arc<dyn ScribeApi>) -> Arc<Self> {
        Self::new_with_dependencies(
            api,
            Arc::new(MissingClipboard),
            Arc::new(MissingTranscriptSaver),
        )
    }

    pub fn new_with_dependencies(
        api: Arc<dyn ScribeApi>,
        clipboard: Arc<dyn ClipboardSink>,
        saver: Arc<dyn TranscriptSaver>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            api,
            clipboard,
            saver,
            shared: Arc::new(ControllerShared {
                inner: Mutex::new(SessionState::empty()),
                events,
            }),
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionSnapshot> {
        self.shared.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.shared.inner.lock().await.snapshot()
    }

    /// Accept or reject a candidate file. Rejection clears the selection
    /// and reports the size limit; acceptance resets all transcript and
    /// error state. No network call either way.
    pub async fn select_file(&self, candidate: AudioFile) {
        let mut guard = self.shared.inner.lock().await;
        if candidate.size_bytes() > MAX_FILE_SIZE_BYTES {
            warn!(
                file = %candidate.name,
                size_bytes = candidate.size_bytes(),
                "rejected oversized file"
            );
            guard.selected_file = None;
            guard.error_message = Some(ScribeError::file_too_large().to_string());
        } else {
            guard.selected_file = Some(candidate);
            guard.reset_transcripts();
        }
        self.shared.emit(&guard);
    }

    /// Upload the selected file to the transcription endpoint and store
    /// the returned text. The in-flight flag is cleared on success and
    /// failure alike.
    pub async fn submit_transcription(&self) {
        let file = {
            let mut guard = self.shared.inner.lock().await;
            if guard.is_transcribing || guard.is_fixing_grammar {
                return;
            }
            let Some(file) = guard.selected_file.clone() else {
                guard.error_message = Some(ScribeError::NoFileSelected.to_string());
                self.shared.emit(&guard);
                return;
            };
            guard.is_transcribing = true;
            guard.reset_transcripts();
            self.shared.emit(&guard);
            file
        };

        let outcome = self.api.transcribe(&file).await;

        let mut guard = self.shared.inner.lock().await;
        match outcome {
            Ok(text) => {
                info!(file = %file.name, chars = text.len(), "transcription succeeded");
                guard.original_text = Some(normalize_text(&text));
            }
            Err(err) => {
                warn!(file = %file.name, "transcription failed: {err}");
                guard.error_message =
                    Some(ScribeError::TranscriptionRequestFailed(err.to_string()).to_string());
            }
        }
        guard.is_transcribing = false;
        self.shared.emit(&guard);
    }

    /// Send the transcript to the grammar endpoint. A no-op without a
    /// transcript or once a correction already exists; a failure leaves
    /// `original_text` intact so the user can retry.
    pub async fn submit_grammar_fix(&self) {
        let text = {
            let mut guard = self.shared.inner.lock().await;
            if guard.is_transcribing || guard.is_fixing_grammar || guard.corrected_text.is_some() {
                return;
            }
            let Some(text) = guard.original_text.clone().filter(|t| !t.is_empty()) else {
                return;
            };
            guard.is_fixing_grammar = true;
            guard.error_message = None;
            self.shared.emit(&guard);
            text
        };

        let outcome = self.api.fix_grammar(&text).await;

        let mut guard = self.shared.inner.lock().await;
        match outcome {
            Ok(corrected) => {
                info!(chars = corrected.len(), "grammar fix succeeded");
                guard.corrected_text = Some(normalize_text(&corrected));
                guard.showing_corrected = true;
            }
            Err(err) => {
                warn!("grammar fix failed: {err}");
                guard.error_message =
                    Some(ScribeError::GrammarFixRequestFailed(err.to_string()).to_string());
            }
        }
        guard.is_fixing_grammar = false;
        self.shared.emit(&guard);
    }

    /// Switch between the original and corrected transcript. A no-op when
    /// the requested view's text is absent.
    pub async fn toggle_view(&self, show_corrected: bool) {
        let mut guard = self.shared.inner.lock().await;
        let target_present = if show_corrected {
            guard.corrected_text.is_some()
        } else {
            guard.original_text.is_some()
        };
        if !target_present || guard.showing_corrected == show_corrected {
            return;
        }
        guard.showing_corrected = show_corrected;
        self.shared.emit(&guard);
    }

    /// Place the displayed text on the system clipboard. Failures are
    /// logged and never reach `error_message`; success raises `is_copied`
    /// for [`COPY_FEEDBACK_WINDOW`], restarting the window on re-copy.
    pub async fn copy_current_text(&self) {
        let text = {
            let guard = self.shared.inner.lock().await;
            match guard.snapshot().displayed_text() {
                Some(text) => text.to_string(),
                None => return,
            }
        };

        if let Err(err) = self.clipboard.set_text(&text) {
            let err = ScribeError::ClipboardWriteFailed(err.to_string());
            warn!("{err}");
            return;
        }

        let mut guard = self.shared.inner.lock().await;
        guard.is_copied = true;
        if let Some(task) = guard.copied_reset.take() {
            task.abort();
        }
        let shared = Arc::clone(&self.shared);
        guard.copied_reset = Some(tokio::spawn(async move {
            tokio::time::sleep(COPY_FEEDBACK_WINDOW).await;
            let mut guard = shared.inner.lock().await;
            guard.is_copied = false;
            guard.copied_reset = None;
            shared.emit(&guard);
        }));
        self.shared.emit(&guard);
    }

    /// Save the displayed text as a plain-text file, returning the written
    /// path. Save failures follow the clipboard rule: logged only.
    pub async fn download_current_text(&self) -> Option<PathBuf> {
        let (file_name, text) = {
            let guard = self.shared.inner.lock().await;
            let snapshot = guard.snapshot();
            match snapshot.displayed_text() {
                Some(text) => (snapshot.download_file_name(), text.to_string()),
                None => return None,
            }
        };

        match self.saver.save(&file_name, &text) {
            Ok(path) => {
                info!(path = %path.display(), "saved transcript");
                Some(path)
            }
            Err(err) => {
                warn!(file_name, "failed to save transcript: {err}");
                None
            }
        }
    }

    /// Flip the process-wide theme flag; the UI layer applies the visuals.
    pub async fn toggle_dark_mode(&self) {
        let mut guard = self.shared.inner.lock().await;
        guard.is_dark_mode = !guard.is_dark_mode;
        self.shared.emit(&guard);
    }
}

/// Server-returned text is normalized to canonical composed form (NFC)
/// before display so round-trip comparisons stay stable.
fn normalize_text(text: &str) -> String {
    text.nfc().collect()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
