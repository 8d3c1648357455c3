//! Utility modules: retry, prompt files.

pub mod prompt;
pub mod retry;
