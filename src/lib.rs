// Postwise: optimal posting time prediction for social media posts.
//
// This is the library root. Each module corresponds to one stage of the
// prediction request lifecycle, from form input to rendered result.

pub mod config;
pub mod form;
pub mod output;
pub mod prediction;
pub mod session;
