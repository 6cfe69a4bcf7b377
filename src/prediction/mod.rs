// Prediction request plumbing — from form state to a validated result.
//
// The flow is: FormModel -> normalize() -> PredictionPayload -> a
// PredictionBackend (HTTP in production) -> PredictionResult. Every failure
// along the way is folded into the PredictionError taxonomy so callers never
// see a raw transport error.

pub mod client;
pub mod error;
pub mod payload;
pub mod result;
