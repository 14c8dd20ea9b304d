//! HTTP protocol layer module
//!
//! Provides HTTP response plumbing, decoupled from routing and endpoint logic.

pub mod response;

// Re-export commonly used functions
pub use response::{build_json_response, encode_json};
