//! Error codes shared by the store and faculty servers
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Store errors
//! - 2xxx: Faculty errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire so API clients can branch on the number
/// instead of parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Store ====================
    /// Not enough available copies for a rental or purchase
    InsufficientStock = 1001,
    /// Cart has no items
    CartEmpty = 1002,
    /// Cart does not contain the requested game
    CartItemNotFound = 1003,
    /// Rental is already returned
    RentalAlreadyReturned = 1004,

    // ==================== 2xxx: Faculty ====================
    /// Course code is not one of the accepted codes
    InvalidCourse = 2001,
    /// Could not allocate a unique matriculation
    MatriculationConflict = 2002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Database constraint rejected the write (unique / foreign key / check)
    ConstraintViolation = 9003,
    /// Inventory invariant broken while committing a checkout
    InventoryInvariant = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Store
            ErrorCode::InsufficientStock => "Not enough copies available",
            ErrorCode::CartEmpty => "Cart is empty",
            ErrorCode::CartItemNotFound => "Item not found in cart",
            ErrorCode::RentalAlreadyReturned => "Rental is already returned",

            // Faculty
            ErrorCode::InvalidCourse => "Invalid course code",
            ErrorCode::MatriculationConflict => "Could not allocate a matriculation",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConstraintViolation => "Database constraint violated",
            ErrorCode::InventoryInvariant => "Inventory would become negative",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            1001 => Ok(ErrorCode::InsufficientStock),
            1002 => Ok(ErrorCode::CartEmpty),
            1003 => Ok(ErrorCode::CartItemNotFound),
            1004 => Ok(ErrorCode::RentalAlreadyReturned),

            2001 => Ok(ErrorCode::InvalidCourse),
            2002 => Ok(ErrorCode::MatriculationConflict),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConstraintViolation),
            9005 => Ok(ErrorCode::InventoryInvariant),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
