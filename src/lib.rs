//! # docanalyzer
//!
//! Upload a document to a text-extraction backend, have the extracted text
//! analysed by an AI endpoint, and render the result.
//!
//! ## Pipeline Overview
//!
//! ```text
//! file
//!  │
//!  ├─ 1. Select   load bytes, name and MIME type (no validation)
//!  ├─ 2. Upload   multipart POST /api/upload  → { text }
//!  ├─ 3. Analyze  JSON POST /api/analyze      → { summary, entities, sentiment, analysis }
//!  ├─ 4. Render   strip emphasis, flatten nested entities/sentiment
//!  └─ 5. Notify   success/error notifications at every stage
//! ```
//!
//! The analysis call is chained automatically after a successful upload. Each
//! stage is a transition of an explicit state machine ([`state`]), so the
//! "spinner shows ⇒ no result shown" rule is checked rather than hoped for.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docanalyzer::{render_report, AnalyzerConfig, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = Session::new(AnalyzerConfig::default())?;
//!     session.select_path("report.pdf").await?;
//!     let result = session.upload().await?;
//!     println!("{}", render_report(&result));
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docanalyzer` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod cancel;
pub mod config;
pub mod error;
pub mod notify;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod state;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use cancel::{CancelHandle, CancellationToken};
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder};
pub use error::{DocAnalyzerError, Endpoint, ErrorKind};
pub use notify::{
    NoopSink, Notification, NotificationCenter, NotificationKind, NotificationSink, SharedSink,
};
pub use output::{AnalysisResult, ExtractedText, Structured};
pub use pipeline::http::BackendClient;
pub use pipeline::input::SelectedFile;
pub use render::{format_plain_text, format_structured, render_report};
pub use session::{analyze_bytes, analyze_file, analyze_file_sync, Session};
pub use state::{AnalysisPhase, SessionEvent, SessionState, TransitionError};
