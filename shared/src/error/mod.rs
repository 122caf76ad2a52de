//! Unified error system
//!
//! - [`ErrorCode`]: standardized numeric codes
//! - [`ErrorCategory`]: classification by code range
//! - [`AppError`]: code + message + optional details
//! - [`ErrorBody`]: JSON body returned by the API routes
//! - [`ServiceError`]: bridge from `sqlx::Error` (feature `db`)
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Store errors (inventory, rentals, checkout)
//! - 2xxx: Faculty errors (courses, matriculation)
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::not_found("Game");
//! assert_eq!(err.code, ErrorCode::NotFound);
//!
//! let err = AppError::validation("Fill in all fields.").with_detail("field", "title");
//! assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
//! ```

mod category;
mod codes;
mod http;
#[cfg(feature = "db")]
mod service;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
#[cfg(feature = "db")]
pub use service::{ServiceError, ServiceResult};
pub use types::{AppError, AppResult, ErrorBody};
