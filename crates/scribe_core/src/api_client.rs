//! reqwest client for the transcription and grammar endpoints.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use shared::{
    domain::AudioFile,
    protocol::{ErrorBody, GrammarFixRequest, GrammarFixResponse, TranscribeResponse},
};

use crate::ScribeApi;

pub struct HttpScribeApi {
    http: Client,
    base_url: String,
}

impl HttpScribeApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl ScribeApi for HttpScribeApi {
    async fn transcribe(&self, file: &AudioFile) -> Result<String> {
        let mut part = multipart::Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        if let Some(mime) = mime_guess::from_path(&file.name).first_raw() {
            part = part.mime_str(mime)?;
        }
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/api/transcribe", self.base_url))
            .multipart(form)
            .send()
            .await?;
        let response = require_success(response).await?;
        let body: TranscribeResponse = response.json().await?;
        Ok(body.transcription)
    }

    async fn fix_grammar(&self, text: &str) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/api/fix-grammar", self.base_url))
            .json(&GrammarFixRequest {
                text: text.to_string(),
            })
            .send()
            .await?;
        let response = require_success(response).await?;
        let body: GrammarFixResponse = response.json().await?;
        Ok(body.corrected_text)
    }
}

/// On non-2xx statuses, surface the server's `detail` message, or a
/// generic HTTP-status string when the body carries none.
async fn require_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = match response.json::<ErrorBody>().await {
        Ok(body) if !body.detail.is_empty() => body.detail,
        _ => format!("HTTP {status}"),
    };
    Err(anyhow!(detail))
}
