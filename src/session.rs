//! Session controller and one-shot entry points.
//!
//! A [`Session`] owns the [`SessionState`] and is the only writer of it. Each
//! call to [`Session::upload`] runs one full cycle:
//!
//! ```text
//! select ─▶ UploadStarted ─▶ POST /api/upload ─┬─▶ UploadSucceeded ─▶ POST /api/analyze ─┬─▶ AnalysisSucceeded
//!                                              └─▶ UploadFailed (file kept)              └─▶ AnalysisFailed
//! ```
//!
//! Every outcome is reported twice: as a [`Notification`] to the configured
//! sink and as the `Result` of the call. `upload` takes `&mut self`, so a
//! single session can never run two cycles at once; the reducer refuses an
//! overlapping `UploadStarted` as well for callers that drive it directly.

use crate::cancel::{CancelHandle, CancellationToken};
use crate::config::AnalyzerConfig;
use crate::error::{DocAnalyzerError, Endpoint};
use crate::notify::{NoopSink, Notification, SharedSink};
use crate::output::{AnalysisResult, ExtractedText};
use crate::pipeline::http::BackendClient;
use crate::pipeline::input::{self, SelectedFile};
use crate::state::{SessionEvent, SessionState};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

const MSG_UPLOADED: &str = "File Uploaded Successfully!";
const MSG_ANALYZED: &str = "Text Analyzed Successfully!";

/// One user's upload/analysis session.
pub struct Session {
    config: AnalyzerConfig,
    client: BackendClient,
    state: SessionState,
    sink: SharedSink,
    cancel: CancelHandle,
}

impl Session {
    /// Create a session. Fails only if the configuration is unusable.
    pub fn new(config: AnalyzerConfig) -> Result<Self, DocAnalyzerError> {
        let client = BackendClient::new(&config)?;
        let sink = config
            .notification_sink
            .clone()
            .unwrap_or_else(|| Arc::new(NoopSink) as SharedSink);
        Ok(Self {
            config,
            client,
            state: SessionState::new(),
            sink,
            cancel: CancelHandle::new(),
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Current snapshot of the session.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Handle that cancels the cycle in flight at the time it is used.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Select `file` for the next upload, replacing any previous selection.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), DocAnalyzerError> {
        debug!("Selected {:?}", file);
        self.dispatch(SessionEvent::FileSelected(file))
    }

    /// Load a local file and select it.
    pub async fn select_path(&mut self, path: impl AsRef<Path>) -> Result<(), DocAnalyzerError> {
        let file = input::load_path(path).await?;
        self.select_file(file)
    }

    /// Run one cycle: upload the selected file, then analyze the extracted text.
    ///
    /// # Errors
    /// - [`DocAnalyzerError::NoFileSelected`] without any network call
    /// - [`DocAnalyzerError::Busy`] if the session is mid-cycle
    /// - upload errors (`UploadFailed`, `Timeout`, `Cancelled`, `MalformedResponse`);
    ///   the selected file is kept so the caller can retry
    /// - the same family of errors from the analysis step; the file is
    ///   already cleared at that point and no result is shown
    pub async fn upload(&mut self) -> Result<AnalysisResult, DocAnalyzerError> {
        let Some(file) = self.state.selected_file().cloned() else {
            let err = DocAnalyzerError::NoFileSelected;
            self.notify_error(&err);
            return Err(err);
        };

        if let Err(e) = self.dispatch(SessionEvent::UploadStarted) {
            self.notify_error(&e);
            return Err(e);
        }
        let token = self.cancel.begin_cycle();
        let cycle_start = Instant::now();
        info!("Cycle {} started for '{}'", self.state.cycle(), file.file_name());

        let uploaded = tokio::select! {
            r = self.client.upload(&file) => r,
            _ = token.cancelled() => Err(DocAnalyzerError::Cancelled { endpoint: Endpoint::Upload }),
        };

        let text = match uploaded {
            Ok(text) => text,
            Err(e) => {
                warn!("Upload failed: {}", e);
                self.dispatch(SessionEvent::UploadFailed {
                    message: e.to_string(),
                })?;
                self.notify_error(&e);
                return Err(e);
            }
        };

        self.notify_success(MSG_UPLOADED);
        self.dispatch(SessionEvent::UploadSucceeded(text.clone()))?;

        let result = self.analyze(&text, &token).await;
        info!(
            "Cycle {} finished in {}ms ({})",
            self.state.cycle(),
            cycle_start.elapsed().as_millis(),
            self.state.phase()
        );
        result
    }

    /// The analysis half of a cycle. Always leaves the Analyzing phase.
    async fn analyze(
        &mut self,
        text: &ExtractedText,
        token: &CancellationToken,
    ) -> Result<AnalysisResult, DocAnalyzerError> {
        let analyzed = tokio::select! {
            r = self.client.analyze(text) => r,
            _ = token.cancelled() => Err(DocAnalyzerError::Cancelled { endpoint: Endpoint::Analyze }),
        };

        match analyzed {
            Ok(result) => {
                self.dispatch(SessionEvent::AnalysisSucceeded(result.clone()))?;
                self.notify_success(MSG_ANALYZED);
                Ok(result)
            }
            Err(e) => {
                warn!("Analysis failed: {}", e);
                self.dispatch(SessionEvent::AnalysisFailed {
                    message: e.to_string(),
                })?;
                self.notify_error(&e);
                Err(e)
            }
        }
    }

    /// Apply `event` through the reducer and report any phase change.
    fn dispatch(&mut self, event: SessionEvent) -> Result<(), DocAnalyzerError> {
        let from = self.state.phase();
        self.state = self.state.apply(event)?;
        let to = self.state.phase();
        if from != to {
            debug!("Phase {} → {}", from, to);
            self.sink.on_phase_change(from, to);
        }
        Ok(())
    }

    fn notify_success(&self, message: &str) {
        self.sink
            .notify(&Notification::success(message, self.config.notification_ttl()));
    }

    fn notify_error(&self, err: &DocAnalyzerError) {
        self.sink
            .notify(&Notification::error(err.to_string(), self.config.notification_ttl()));
    }
}

// ── One-shot entry points ─────────────────────────────────────────────────

/// Upload and analyze a local file in one call.
///
/// # Example
/// ```rust,no_run
/// use docanalyzer::{analyze_file, render_report, AnalyzerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let result = analyze_file("report.pdf", &AnalyzerConfig::default()).await?;
///     println!("{}", render_report(&result));
///     Ok(())
/// }
/// ```
pub async fn analyze_file(
    path: impl AsRef<Path>,
    config: &AnalyzerConfig,
) -> Result<AnalysisResult, DocAnalyzerError> {
    let mut session = Session::new(config.clone())?;
    session.select_path(path).await?;
    session.upload().await
}

/// Upload and analyze an in-memory document.
pub async fn analyze_bytes(
    file_name: impl Into<String>,
    bytes: impl Into<Vec<u8>>,
    config: &AnalyzerConfig,
) -> Result<AnalysisResult, DocAnalyzerError> {
    let mut session = Session::new(config.clone())?;
    session.select_file(SelectedFile::from_bytes(file_name, bytes))?;
    session.upload().await
}

/// Synchronous wrapper around [`analyze_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_file_sync(
    path: impl AsRef<Path>,
    config: &AnalyzerConfig,
) -> Result<AnalysisResult, DocAnalyzerError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DocAnalyzerError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(analyze_file(path, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::notify::NotificationCenter;
    use crate::state::AnalysisPhase;

    fn offline_config(center: Arc<NotificationCenter>) -> AnalyzerConfig {
        // Port 9 (discard) on loopback: nothing should ever be sent there.
        AnalyzerConfig::builder()
            .base_url("http://127.0.0.1:9")
            .use_system_proxy(false)
            .notification_sink(center)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn upload_without_file_notifies_and_stays_idle() {
        let center = Arc::new(NotificationCenter::new());
        let mut session = Session::new(offline_config(center.clone())).unwrap();

        let err = session.upload().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoFileSelected);
        assert_eq!(session.state().phase(), AnalysisPhase::Idle);
        assert_eq!(session.state().cycle(), 0, "no cycle was started");

        let active = center.active();
        assert_eq!(active.len(), 1);
        assert!(active[0].is_error());
        assert_eq!(active[0].message, "Please select a file first.");
    }

    #[tokio::test]
    async fn select_path_missing_file_leaves_state_untouched() {
        let center = Arc::new(NotificationCenter::new());
        let mut session = Session::new(offline_config(center)).unwrap();
        let err = session.select_path("/no/such/report.pdf").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(session.state().selected_file().is_none());
    }

    #[test]
    fn new_rejects_bad_config() {
        let config = AnalyzerConfig {
            base_url: "mailto:someone".into(),
            ..AnalyzerConfig::default()
        };
        assert!(Session::new(config).is_err());
    }
}
