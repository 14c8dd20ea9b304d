//! Handler fault type
//!
//! A fault is the only way a handler can fail. The dispatcher turns every
//! fault into the 500 error envelope and never lets one reach the client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandlerFault {
    #[error("failed to build response envelope: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("response for {0} did not serialize to a JSON object")]
    NotAnObject(&'static str),

    #[error("handler panicked: {0}")]
    Panicked(String),

    #[cfg(test)]
    #[error("{0}")]
    Injected(String),
}

pub type HandlerResult<T> = std::result::Result<T, HandlerFault>;
