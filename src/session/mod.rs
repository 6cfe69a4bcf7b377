// Request lifecycle for one form session: Idle -> Submitting -> Succeeded | Failed.
//
// The machine is the single source of truth for what the UI shows. A result
// and an error can never be held at the same time, and only the most recent
// submit's response is ever applied.

pub mod machine;
pub mod state;
