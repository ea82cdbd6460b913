//! CLI command implementations

pub mod duplicate;
pub mod inspect;
pub mod json_output;

mod inputs;
mod reporting;
