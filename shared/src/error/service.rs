//! Service-layer error bridging sqlx and `AppError`
//!
//! Repositories return `ServiceResult<T>` so `?` works on sqlx calls and on
//! business-rule checks alike. The database text is kept verbatim: both
//! apps surface the raw failure to the user after rolling back.

use axum::response::IntoResponse;

use super::{AppError, ErrorCode};

/// Service-layer error
///
/// - `Db`: database failure (logged once, classified on conversion)
/// - `App`: business-rule error (passed through untouched)
#[derive(Debug)]
pub enum ServiceError {
    Db(sqlx::Error),
    App(AppError),
}

impl ServiceError {
    /// True when the database rejected a write because of a unique index
    pub fn is_unique_violation(&self) -> bool {
        match self {
            ServiceError::Db(sqlx::Error::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Db(e) => write!(f, "{e}"),
            ServiceError::App(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(sqlx::Error::Database(db)) => {
                let constraint = db.is_unique_violation()
                    || db.is_foreign_key_violation()
                    || db.is_check_violation();
                if constraint {
                    tracing::warn!(error = %db, "Write rejected by database constraint");
                    AppError::with_message(ErrorCode::ConstraintViolation, db.message())
                } else {
                    tracing::error!(error = %db, "Service database error");
                    AppError::database(db.message())
                }
            }
            ServiceError::Db(sqlx::Error::RowNotFound) => AppError::new(ErrorCode::NotFound),
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::database(db_err.to_string())
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;
