//! Configuration for an upload/analysis session.
//!
//! All session behaviour is controlled through [`AnalyzerConfig`], built via
//! its [`AnalyzerConfigBuilder`]. The builder validates the endpoint URLs
//! once, up front, so a typo in the base URL fails at start-up instead of on
//! the first upload.

use crate::error::DocAnalyzerError;
use crate::notify::NotificationSink;
use reqwest::Url;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Base URL of the public extraction/analysis backend.
pub const DEFAULT_BASE_URL: &str = "https://docanalyzer-backend.onrender.com";

/// Path of the text-extraction endpoint.
pub const DEFAULT_UPLOAD_PATH: &str = "/api/upload";

/// Path of the analysis endpoint.
pub const DEFAULT_ANALYZE_PATH: &str = "/api/analyze";

/// Configuration for a [`crate::session::Session`].
///
/// # Example
/// ```rust
/// use docanalyzer::AnalyzerConfig;
///
/// let config = AnalyzerConfig::builder()
///     .base_url("http://localhost:5000")
///     .analyze_timeout_secs(60)
///     .build()
///     .unwrap();
/// assert_eq!(config.analyze_url().unwrap().as_str(), "http://localhost:5000/api/analyze");
/// ```
#[derive(Clone)]
pub struct AnalyzerConfig {
    /// Scheme, host and optional path prefix of the backend. Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// Path of the upload endpoint, appended to `base_url`. Default: `/api/upload`.
    pub upload_path: String,

    /// Path of the analyze endpoint, appended to `base_url`. Default: `/api/analyze`.
    pub analyze_path: String,

    /// Upper bound on one upload request, including the body transfer. Default: 120.
    ///
    /// The hosted backend sleeps when idle; its first request after a pause
    /// can take close to a minute before any byte comes back.
    pub upload_timeout_secs: u64,

    /// Upper bound on one analyze request. Default: 120.
    pub analyze_timeout_secs: u64,

    /// How long a notification stays visible. Default: 3000 ms.
    pub notification_ttl_ms: u64,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment. Default: true.
    pub use_system_proxy: bool,

    /// Receives notifications and phase changes. Default: none (events are
    /// only logged).
    pub notification_sink: Option<Arc<dyn NotificationSink>>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            upload_path: DEFAULT_UPLOAD_PATH.to_string(),
            analyze_path: DEFAULT_ANALYZE_PATH.to_string(),
            upload_timeout_secs: 120,
            analyze_timeout_secs: 120,
            notification_ttl_ms: 3000,
            use_system_proxy: true,
            notification_sink: None,
        }
    }
}

impl fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("base_url", &self.base_url)
            .field("upload_path", &self.upload_path)
            .field("analyze_path", &self.analyze_path)
            .field("upload_timeout_secs", &self.upload_timeout_secs)
            .field("analyze_timeout_secs", &self.analyze_timeout_secs)
            .field("notification_ttl_ms", &self.notification_ttl_ms)
            .field("use_system_proxy", &self.use_system_proxy)
            .field(
                "notification_sink",
                &self.notification_sink.as_ref().map(|_| "<dyn NotificationSink>"),
            )
            .finish()
    }
}

impl AnalyzerConfig {
    /// Create a new builder for `AnalyzerConfig`.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Full URL of the upload endpoint.
    pub fn upload_url(&self) -> Result<Url, DocAnalyzerError> {
        join_endpoint(&self.base_url, &self.upload_path)
    }

    /// Full URL of the analyze endpoint.
    pub fn analyze_url(&self) -> Result<Url, DocAnalyzerError> {
        join_endpoint(&self.base_url, &self.analyze_path)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn analyze_timeout(&self) -> Duration {
        Duration::from_secs(self.analyze_timeout_secs)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    /// Check the rules the builder enforces. Also applied to configs built
    /// as struct literals before a client is created from them.
    pub fn validate(&self) -> Result<(), DocAnalyzerError> {
        for path in [&self.upload_path, &self.analyze_path] {
            if !path.starts_with('/') {
                return Err(DocAnalyzerError::InvalidConfig(format!(
                    "Endpoint paths must start with '/', got '{path}'"
                )));
            }
        }
        if self.upload_timeout_secs == 0 || self.analyze_timeout_secs == 0 {
            return Err(DocAnalyzerError::InvalidConfig(
                "Timeouts must be ≥ 1 second".into(),
            ));
        }
        self.upload_url()?;
        self.analyze_url()?;
        Ok(())
    }
}

/// Builder for [`AnalyzerConfig`].
#[derive(Debug)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn upload_path(mut self, path: impl Into<String>) -> Self {
        self.config.upload_path = path.into();
        self
    }

    pub fn analyze_path(mut self, path: impl Into<String>) -> Self {
        self.config.analyze_path = path.into();
        self
    }

    pub fn upload_timeout_secs(mut self, secs: u64) -> Self {
        self.config.upload_timeout_secs = secs;
        self
    }

    pub fn analyze_timeout_secs(mut self, secs: u64) -> Self {
        self.config.analyze_timeout_secs = secs;
        self
    }

    pub fn notification_ttl_ms(mut self, ms: u64) -> Self {
        self.config.notification_ttl_ms = ms;
        self
    }

    pub fn use_system_proxy(mut self, v: bool) -> Self {
        self.config.use_system_proxy = v;
        self
    }

    pub fn notification_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.config.notification_sink = Some(sink);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalyzerConfig, DocAnalyzerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Append `path` to `base`, keeping any path prefix already on `base`.
fn join_endpoint(base: &str, path: &str) -> Result<Url, DocAnalyzerError> {
    let joined = format!("{}{}", base.trim_end_matches('/'), path);
    let url = Url::parse(&joined).map_err(|e| {
        DocAnalyzerError::InvalidConfig(format!("Invalid backend URL '{joined}': {e}"))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DocAnalyzerError::InvalidConfig(format!(
            "Backend URL must be http or https, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_hosted_backend() {
        let c = AnalyzerConfig::default();
        assert_eq!(
            c.upload_url().unwrap().as_str(),
            "https://docanalyzer-backend.onrender.com/api/upload"
        );
        assert_eq!(c.notification_ttl(), Duration::from_millis(3000));
    }

    #[test]
    fn base_url_prefix_and_trailing_slash() {
        let c = AnalyzerConfig::builder()
            .base_url("http://127.0.0.1:8080/backend/")
            .build()
            .unwrap();
        assert_eq!(
            c.analyze_url().unwrap().as_str(),
            "http://127.0.0.1:8080/backend/api/analyze"
        );
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = AnalyzerConfig::builder()
            .base_url("ftp://files.example.org")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("http or https"), "got: {err}");
    }

    #[test]
    fn rejects_garbage_url() {
        assert!(AnalyzerConfig::builder().base_url("not a url").build().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(AnalyzerConfig::builder()
            .analyze_timeout_secs(0)
            .build()
            .is_err());
    }

    #[test]
    fn validate_catches_struct_literal_zero_timeout() {
        let c = AnalyzerConfig {
            upload_timeout_secs: 0,
            ..AnalyzerConfig::default()
        };
        let err = c.validate().unwrap_err();
        assert!(matches!(err, DocAnalyzerError::InvalidConfig(_)), "got: {err}");
    }

    #[test]
    fn rejects_relative_path() {
        assert!(AnalyzerConfig::builder()
            .upload_path("api/upload")
            .build()
            .is_err());
    }

    #[test]
    fn debug_hides_sink() {
        let c = AnalyzerConfig::builder()
            .notification_sink(Arc::new(crate::notify::NoopSink))
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("<dyn NotificationSink>"));
    }
}
