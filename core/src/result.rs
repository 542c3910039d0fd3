//! The response envelope returned by every call.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::http::find_header;

/// Normalized outcome of a completed round-trip.
///
/// Any status code lands here, including 4xx and 5xx. `json` is present
/// exactly when `body` is non-empty; a body that fails to parse never
/// produces a `CallResult`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallResult {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub json: Option<Value>,
}

impl CallResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Decode the parsed body into `T`. `None` when there is no body.
    pub fn json_as<T: DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        self.json.clone().map(serde_json::from_value)
    }
}
