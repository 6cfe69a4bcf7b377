// Form state — the typed input fields for one prediction request.
//
// Enum-backed fields can only hold values from their declared domain.
// Numeric fields keep the raw text the user typed; coercion to integers
// happens at submit time in the payload normalizer.

pub mod fields;
pub mod model;
