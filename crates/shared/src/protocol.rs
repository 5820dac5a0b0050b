//! Wire payloads for the two HTTP collaborators. Both endpoints answer
//! non-2xx statuses with an [`ErrorBody`] carrying a human-readable detail.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscribeResponse {
    pub transcription: String,
    /// Echo of the uploaded filename; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarFixRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarFixResponse {
    pub corrected_text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcribe_response_tolerates_missing_filename() {
        let body: TranscribeResponse =
            serde_json::from_str(r#"{"transcription": "hello there"}"#).expect("parse");
        assert_eq!(body.transcription, "hello there");
        assert!(body.filename.is_none());
    }

    #[test]
    fn error_body_defaults_to_empty_detail() {
        let body: ErrorBody = serde_json::from_str("{}").expect("parse");
        assert!(body.detail.is_empty());
    }

    #[test]
    fn grammar_fix_request_serializes_text_field() {
        let raw = serde_json::to_string(&GrammarFixRequest {
            text: "fix me".into(),
        })
        .expect("serialize");
        assert_eq!(raw, r#"{"text":"fix me"}"#);
    }
}
