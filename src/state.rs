//! Session state and the reducer that advances it.
//!
//! The whole observable state of an upload/analysis session lives in one
//! immutable [`SessionState`] record. The only way to change it is
//! [`SessionState::apply`], which takes a [`SessionEvent`] and returns the next
//! record (or refuses the transition). Every phase invariant is therefore
//! enforced in one place and can be checked mechanically after each step.
//!
//! ```text
//!            FileSelected (any phase but Uploading)
//!                 │
//!  Idle/Complete/Failed ──UploadStarted──▶ Uploading
//!                                           │      │
//!                                 UploadFailed    UploadSucceeded
//!                                           │      │  (file cleared)
//!                                           ▼      ▼
//!                                         Idle   Analyzing
//!                                                  │       │
//!                                     AnalysisSucceeded  AnalysisFailed
//!                                                  ▼       ▼
//!                                              Complete  Failed
//! ```

use crate::output::{AnalysisResult, ExtractedText};
use crate::pipeline::input::SelectedFile;
use std::fmt;
use thiserror::Error;

/// Stage of the current upload/analysis cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisPhase {
    #[default]
    Idle,
    Uploading,
    Analyzing,
    Complete,
    Failed,
}

impl AnalysisPhase {
    /// A request is in flight.
    pub fn is_busy(self) -> bool {
        matches!(self, AnalysisPhase::Uploading | AnalysisPhase::Analyzing)
    }
}

impl fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnalysisPhase::Idle => "idle",
            AnalysisPhase::Uploading => "uploading",
            AnalysisPhase::Analyzing => "analyzing",
            AnalysisPhase::Complete => "complete",
            AnalysisPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Inputs to the reducer.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    FileSelected(SelectedFile),
    UploadStarted,
    UploadSucceeded(ExtractedText),
    UploadFailed { message: String },
    AnalysisSucceeded(AnalysisResult),
    AnalysisFailed { message: String },
}

impl SessionEvent {
    fn name(&self) -> &'static str {
        match self {
            SessionEvent::FileSelected(_) => "FileSelected",
            SessionEvent::UploadStarted => "UploadStarted",
            SessionEvent::UploadSucceeded(_) => "UploadSucceeded",
            SessionEvent::UploadFailed { .. } => "UploadFailed",
            SessionEvent::AnalysisSucceeded(_) => "AnalysisSucceeded",
            SessionEvent::AnalysisFailed { .. } => "AnalysisFailed",
        }
    }
}

/// A transition the reducer refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("a cycle is already in flight ({phase})")]
    Busy { phase: AnalysisPhase },

    #[error("no file selected")]
    NoFileSelected,

    #[error("event {event} is not valid in phase {phase}")]
    Unexpected {
        phase: AnalysisPhase,
        event: &'static str,
    },
}

impl From<TransitionError> for crate::error::DocAnalyzerError {
    fn from(e: TransitionError) -> Self {
        use crate::error::DocAnalyzerError;
        match e {
            TransitionError::Busy { phase } => DocAnalyzerError::Busy { phase },
            TransitionError::NoFileSelected => DocAnalyzerError::NoFileSelected,
            other @ TransitionError::Unexpected { .. } => {
                DocAnalyzerError::Internal(other.to_string())
            }
        }
    }
}

/// Immutable snapshot of a session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    selected_file: Option<SelectedFile>,
    extracted_text: Option<ExtractedText>,
    analysis: Option<AnalysisResult>,
    phase: AnalysisPhase,
    cycle: u64,
    last_error: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> AnalysisPhase {
        self.phase
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn extracted_text(&self) -> Option<&ExtractedText> {
        self.extracted_text.as_ref()
    }

    /// The result to display. Only ever `Some` in [`AnalysisPhase::Complete`].
    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    /// Number of upload cycles started so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Message of the most recent failure in the current cycle.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the "analysis in progress" indicator should be shown.
    pub fn is_analyzing(&self) -> bool {
        self.phase == AnalysisPhase::Analyzing
    }

    /// Whether an upload may be triggered now.
    pub fn can_upload(&self) -> bool {
        self.selected_file.is_some() && !self.phase.is_busy()
    }

    /// Compute the next state for `event`.
    pub fn apply(&self, event: SessionEvent) -> Result<SessionState, TransitionError> {
        let phase = self.phase;
        let unexpected = TransitionError::Unexpected {
            phase,
            event: event.name(),
        };

        let mut next = self.clone();
        match event {
            SessionEvent::FileSelected(file) => {
                if phase == AnalysisPhase::Uploading {
                    return Err(TransitionError::Busy { phase });
                }
                next.selected_file = Some(file);
            }
            SessionEvent::UploadStarted => {
                if phase.is_busy() {
                    return Err(TransitionError::Busy { phase });
                }
                if self.selected_file.is_none() {
                    return Err(TransitionError::NoFileSelected);
                }
                next.phase = AnalysisPhase::Uploading;
                next.cycle += 1;
                next.analysis = None;
                next.extracted_text = None;
                next.last_error = None;
            }
            SessionEvent::UploadSucceeded(text) => {
                if phase != AnalysisPhase::Uploading {
                    return Err(unexpected);
                }
                next.selected_file = None;
                next.extracted_text = Some(text);
                next.phase = AnalysisPhase::Analyzing;
            }
            SessionEvent::UploadFailed { message } => {
                if phase != AnalysisPhase::Uploading {
                    return Err(unexpected);
                }
                next.phase = AnalysisPhase::Idle;
                next.last_error = Some(message);
            }
            SessionEvent::AnalysisSucceeded(result) => {
                if phase != AnalysisPhase::Analyzing {
                    return Err(unexpected);
                }
                next.analysis = Some(result);
                next.phase = AnalysisPhase::Complete;
            }
            SessionEvent::AnalysisFailed { message } => {
                if phase != AnalysisPhase::Analyzing {
                    return Err(unexpected);
                }
                next.analysis = None;
                next.phase = AnalysisPhase::Failed;
                next.last_error = Some(message);
            }
        }

        debug_assert!(next.invariants_hold(), "invariant violated: {next:?}");
        Ok(next)
    }

    /// `Analyzing ⇒ no result` and `result ⇒ Complete`.
    pub fn invariants_hold(&self) -> bool {
        let analyzing_without_result = !self.is_analyzing() || self.analysis.is_none();
        let result_only_when_complete =
            self.analysis.is_none() || self.phase == AnalysisPhase::Complete;
        analyzing_without_result && result_only_when_complete
    }
}
