//! Analysis client: send extracted text to `POST /api/analyze`.
//!
//! The text is forwarded exactly as the upload endpoint returned it; an empty
//! string is a valid request and it is up to the backend to decide what an
//! analysis of nothing looks like.

use crate::error::{DocAnalyzerError, Endpoint};
use crate::output::{AnalysisResult, ExtractedText};
use crate::pipeline::http::{read_json, transport_error, BackendClient};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

impl BackendClient {
    /// Analyze `text` and return the structured result.
    ///
    /// Issues exactly one POST. No retries.
    pub async fn analyze(&self, text: &ExtractedText) -> Result<AnalysisResult, DocAnalyzerError> {
        let start = Instant::now();
        let timeout = self.timeout_for(Endpoint::Analyze);
        info!("Analyzing {} chars of extracted text", text.as_str().chars().count());

        let response = self
            .http
            .post(self.analyze_url.clone())
            .timeout(timeout)
            .json(&AnalyzeRequest {
                text: text.as_str(),
            })
            .send()
            .await
            .map_err(|e| transport_error(Endpoint::Analyze, e, timeout))?;

        let body: Value = read_json(Endpoint::Analyze, response, timeout).await?;
        let result = AnalysisResult::from_value(body)?;
        debug!("Analysis received in {}ms", start.elapsed().as_millis());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(AnalyzeRequest { text: "Hello world" }).unwrap();
        assert_eq!(body, serde_json::json!({"text": "Hello world"}));
    }

    #[test]
    fn empty_text_is_forwarded() {
        let body = serde_json::to_value(AnalyzeRequest { text: "" }).unwrap();
        assert_eq!(body, serde_json::json!({"text": ""}));
    }
}
