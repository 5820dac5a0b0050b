use std::path::Path;

use serde::{Deserialize, Serialize};

/// Largest audio upload the client will accept, mirrored by the service.
pub const MAX_FILE_SIZE_MB: usize = 25;
pub const MAX_FILE_SIZE_BYTES: usize = MAX_FILE_SIZE_MB * 1024 * 1024;

/// An audio file as selected by the user: original filename plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl AudioFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Filename without its extension, used when naming saved transcripts.
    pub fn stem(&self) -> &str {
        stem_of(&self.name)
    }

    pub fn meta(&self) -> AudioFileMeta {
        AudioFileMeta {
            name: self.name.clone(),
            size_bytes: self.size_bytes(),
        }
    }
}

/// Lightweight description of the selected file, safe to clone into snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFileMeta {
    pub name: String,
    pub size_bytes: usize,
}

impl AudioFileMeta {
    pub fn stem(&self) -> &str {
        stem_of(&self.name)
    }
}

fn stem_of(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptView {
    Original,
    Corrected,
}

impl TranscriptView {
    pub fn label(self) -> &'static str {
        match self {
            TranscriptView::Original => "original",
            TranscriptView::Corrected => "corrected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_strips_extension() {
        let file = AudioFile::new("test.mp3", vec![0u8; 4]);
        assert_eq!(file.stem(), "test");
    }

    #[test]
    fn stem_keeps_name_without_extension() {
        let file = AudioFile::new("recording", Vec::new());
        assert_eq!(file.stem(), "recording");
    }

    #[test]
    fn view_labels_match_save_suffixes() {
        assert_eq!(TranscriptView::Original.label(), "original");
        assert_eq!(TranscriptView::Corrected.label(), "corrected");
    }
}
