//! Upload client: send the selected file to `POST /api/upload` and get the
//! extracted text back.

use crate::error::{DocAnalyzerError, Endpoint};
use crate::output::ExtractedText;
use crate::pipeline::http::{read_json, transport_error, BackendClient};
use crate::pipeline::input::SelectedFile;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info};

/// Name of the multipart field carrying the document.
pub const UPLOAD_FIELD: &str = "document";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    text: String,
}

/// Build the multipart body: one part named [`UPLOAD_FIELD`] with the file's
/// bytes, name and MIME type.
pub fn build_form(file: &SelectedFile) -> Result<Form, DocAnalyzerError> {
    let part = Part::bytes(file.bytes().to_vec())
        .file_name(file.file_name().to_string())
        .mime_str(file.mime())
        .map_err(|e| DocAnalyzerError::UploadFailed {
            message: format!("invalid MIME type '{}': {e}", file.mime()),
            status: None,
        })?;
    Ok(Form::new().part(UPLOAD_FIELD, part))
}

impl BackendClient {
    /// Upload `file` and return the text the backend extracted from it.
    ///
    /// Issues exactly one POST. No retries.
    pub async fn upload(&self, file: &SelectedFile) -> Result<ExtractedText, DocAnalyzerError> {
        let start = Instant::now();
        let timeout = self.timeout_for(Endpoint::Upload);
        let form = build_form(file)?;

        info!(
            "Uploading '{}' ({} bytes, {}) to {}",
            file.file_name(),
            file.len(),
            file.mime(),
            self.upload_url
        );

        let response = self
            .http
            .post(self.upload_url.clone())
            .timeout(timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error(Endpoint::Upload, e, timeout))?;

        let body: UploadResponse = read_json(Endpoint::Upload, response, timeout).await?;
        debug!(
            "Extracted {} chars in {}ms",
            body.text.chars().count(),
            start.elapsed().as_millis()
        );
        Ok(ExtractedText::new(body.text))
    }
}
