//! Error types for the JavaScript-facing surface.
//!
//! The layout and animation core never fails; these errors only arise when
//! host input cannot be decoded or refers to something that does not exist.

use thiserror::Error;
use wasm_bindgen::{JsError, JsValue};

use crate::tree::NodeId;

#[derive(Debug, Error)]
pub enum SunburstError {
    #[error("invalid tree input: {0}")]
    InvalidTree(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    #[error("unknown weight mode: {0:?} (expected \"size\" or \"count\")")]
    UnknownMode(String),

    #[error("unknown node id {0}")]
    UnknownNode(NodeId),
}

impl From<SunburstError> for JsValue {
    fn from(err: SunburstError) -> Self {
        JsError::new(&err.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            SunburstError::UnknownNode(NodeId(7)).to_string(),
            "unknown node id #7"
        );
        assert_eq!(
            SunburstError::UnknownMode("bytes".into()).to_string(),
            "unknown weight mode: \"bytes\" (expected \"size\" or \"count\")"
        );
    }
}
