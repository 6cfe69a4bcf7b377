// RequestStateMachine — drives one form session's submits.
//
// A submit is split in two halves so callers that need to do something while
// the request is in flight (show a spinner, accept more input) can:
//
//   begin(form)            -> Option<PendingRequest>   (Idle/Succeeded/Failed -> Submitting)
//   complete(id, outcome)  -> bool                     (Submitting -> Succeeded/Failed)
//
// `submit` chains both around a PredictionBackend call for the common case.
// Responses are matched to the submit that issued them by request id; a
// response for anything but the active request is dropped.

use tracing::{info, warn};

use super::state::{RequestId, RequestState};
use crate::form::model::FormModel;
use crate::prediction::client::PredictionBackend;
use crate::prediction::error::PredictionError;
use crate::prediction::payload::{normalize, PredictionPayload};
use crate::prediction::result::PredictionResult;

/// A payload that has been accepted for sending, tagged with its request id.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub request_id: RequestId,
    pub payload: PredictionPayload,
}

/// Owns the request state for a single view session. Reusable indefinitely.
#[derive(Debug, Default)]
pub struct RequestStateMachine {
    state: RequestState,
    last_request_id: RequestId,
}

impl RequestStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Start a submit.
    ///
    /// Returns `None` without touching the state if a request is already in
    /// flight. Returns `None` and moves to `Failed` if the form doesn't
    /// normalize; no request should be sent in that case. Otherwise moves to
    /// `Submitting` and hands back the payload to send.
    pub fn begin(&mut self, form: &FormModel) -> Option<PendingRequest> {
        if let RequestState::Submitting { request_id } = self.state {
            warn!(request_id, "Submit ignored: a request is already in flight");
            return None;
        }

        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.state = RequestState::Submitting { request_id };

        match normalize(form) {
            Ok(payload) => {
                info!(
                    request_id,
                    platform = %payload.platform,
                    "Submitting prediction request"
                );
                Some(PendingRequest {
                    request_id,
                    payload,
                })
            }
            Err(e) => {
                info!(request_id, error = %e, "Form failed validation, not sending");
                self.state = RequestState::Failed(e.into());
                None
            }
        }
    }

    /// Apply the outcome of a request.
    ///
    /// Returns `false` (and changes nothing) when `request_id` is not the
    /// request currently in flight, e.g. it was cancelled or superseded.
    pub fn complete(
        &mut self,
        request_id: RequestId,
        outcome: Result<PredictionResult, PredictionError>,
    ) -> bool {
        match self.state {
            RequestState::Submitting { request_id: active } if active == request_id => {}
            _ => {
                warn!(
                    request_id,
                    "Discarding response for a request that is no longer active"
                );
                return false;
            }
        }

        self.state = match outcome {
            Ok(result) => {
                info!(
                    request_id,
                    day = result.day_name(),
                    hour = result.best_hour,
                    "Prediction succeeded"
                );
                RequestState::Succeeded(result)
            }
            Err(e) => {
                warn!(request_id, kind = %e.kind(), error = %e, "Prediction failed");
                RequestState::Failed(e)
            }
        };
        true
    }

    /// Abandon the in-flight request, returning to `Idle`. Its response, if
    /// it ever arrives, will be discarded. Returns `false` if nothing was in
    /// flight.
    pub fn cancel(&mut self) -> bool {
        if let RequestState::Submitting { request_id } = self.state {
            info!(request_id, "Prediction request cancelled");
            self.state = RequestState::Idle;
            true
        } else {
            false
        }
    }

    /// Normalize, send and record the outcome in one go.
    pub async fn submit<B>(&mut self, form: &FormModel, backend: &B) -> &RequestState
    where
        B: PredictionBackend + ?Sized,
    {
        if let Some(pending) = self.begin(form) {
            let outcome = backend.predict(&pending.payload).await;
            self.complete(pending.request_id, outcome);
        }
        &self.state
    }
}
