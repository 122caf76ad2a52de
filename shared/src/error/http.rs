//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    ///
    /// Business and validation failures are all 400 except lookups (404);
    /// only infrastructure failures map to 500.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound | Self::CartItemNotFound => StatusCode::NOT_FOUND,

            Self::InternalError
            | Self::DatabaseError
            | Self::InventoryInvariant => StatusCode::INTERNAL_SERVER_ERROR,

            _ => StatusCode::BAD_REQUEST,
        }
    }
}
