//! Request handler module
//!
//! Responsible for request dispatch, endpoint logic and error translation.

pub mod context;
pub mod dispatch;
pub mod endpoints;
mod envelope;
mod errors;
pub mod router;

use chrono::{DateTime, Utc};

use crate::config::ServiceInfo;
use crate::error::HandlerResult;

pub use context::RequestContext;
pub use envelope::Envelope;

// Re-export main entry point
pub use router::handle_request;

/// Signature shared by all endpoint handlers
pub type HandlerFn =
    fn(&RequestContext<'_>, &ServiceInfo, DateTime<Utc>) -> HandlerResult<Envelope>;
