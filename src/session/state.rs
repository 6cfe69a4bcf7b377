// Observable request state.

use crate::prediction::error::PredictionError;
use crate::prediction::result::PredictionResult;

/// Identifies one submit within a session. Strictly increasing.
pub type RequestId = u64;

/// Where the current request is in its lifecycle.
///
/// `Succeeded` and `Failed` carry their data inline, so the two outcomes are
/// mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Submitting { request_id: RequestId },
    Succeeded(PredictionResult),
    Failed(PredictionError),
}

/// Data-free view of `RequestState`, handy for logging and comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Submitting => "submitting",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RequestState {
    pub fn phase(&self) -> Phase {
        match self {
            RequestState::Idle => Phase::Idle,
            RequestState::Submitting { .. } => Phase::Submitting,
            RequestState::Succeeded(_) => Phase::Succeeded,
            RequestState::Failed(_) => Phase::Failed,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, RequestState::Submitting { .. })
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            RequestState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&PredictionError> {
        match self {
            RequestState::Failed(error) => Some(error),
            _ => None,
        }
    }
}
