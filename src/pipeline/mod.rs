//! Pipeline stages of one upload cycle.
//!
//! ```text
//! local file ─▶ input ─▶ upload ─▶ analyze ─▶ AnalysisResult
//!                         └── http (shared client + error policy) ──┘
//! ```

pub mod analyze;
pub mod http;
pub mod input;
pub mod upload;
