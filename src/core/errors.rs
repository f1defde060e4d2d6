//! Application-wide error type.
//!
//! Every layer (repositories, services, handlers) returns [`AppResult`]. Because
//! [`AppError`] implements [`actix_web::ResponseError`], a handler can simply
//! propagate it with `?` and the client receives the shop's error envelope:
//!
//! ```text
//! HTTP/1.1 409 Conflict
//! { "success": false, "message": "Conflict error: email is already registered" }
//! ```
//!
//! A rejected business rule additionally carries a stable `reason` code that
//! clients can branch on without parsing the message:
//!
//! ```text
//! HTTP/1.1 400 Bad Request
//! { "success": false, "message": "Validation error: coupon has expired", "reason": "expired" }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::core::errors::AppError;
//!
//! async fn delete_product(id: &str) -> Result<(), AppError> {
//!     if !repo.delete(id).await? {
//!         return Err(AppError::NotFound("product not found".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use actix_web::http::StatusCode;
use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

/// Every failure the shop backend can report to a client.
///
/// The variant decides the HTTP status; the payload is the human readable
/// message placed in the `message` field of the response body.
#[derive(Error, Debug)]
pub enum AppError {
    /// MongoDB failure (500)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis failure (500)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// Invalid input or a business rule rejecting the request (400)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A business rule refused the request (400). `reason` is a stable,
    /// machine-readable code echoed in the response body.
    #[error("Validation error: {message}")]
    RuleViolation { reason: &'static str, message: String },

    /// Missing resource (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate or concurrently modified resource (409)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// Missing or invalid credentials (401)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Authenticated but not allowed (403)
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// Failure of a dependency outside the process (500)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// Anything else (500)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Converts a MongoDB driver error, turning duplicate-key violations
    /// (server code 11000) into [`AppError::ConflictError`].
    ///
    /// Single writes report the violation as a write error, bulk inserts as
    /// one entry of their `write_errors` and some server paths (for example
    /// index builds) as a command error; all three are recognised.
    ///
    /// # Arguments
    ///
    /// * `error` - the driver error returned by the failed operation
    /// * `conflict_message` - client-facing message used when the failure is a duplicate key
    ///
    /// # Returns
    ///
    /// [`AppError::ConflictError`] for a duplicate key, [`AppError::DatabaseError`]
    /// for everything else.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// collection
    ///     .insert_one(&brand)
    ///     .await
    ///     .map_err(|e| AppError::from_mongo(e, "a brand with this name already exists"))?;
    /// ```
    pub fn from_mongo(error: mongodb::error::Error, conflict_message: &str) -> Self {
        if is_duplicate_key(&error) {
            AppError::ConflictError(conflict_message.to_string())
        } else {
            AppError::DatabaseError(error.to_string())
        }
    }
}

const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == DUPLICATE_KEY,
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY,
        ErrorKind::InsertMany(insert_error) => insert_error
            .write_errors
            .as_ref()
            .is_some_and(|errors| errors.iter().any(|e| e.code == DUPLICATE_KEY)),
        _ => false,
    }
}

impl From<redis::RedisError> for AppError {
    fn from(error: redis::RedisError) -> Self {
        AppError::RedisError(error.to_string())
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::RuleViolation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }

        let mut body = serde_json::json!({
            "success": false,
            "message": self.to_string()
        });
        if let AppError::RuleViolation { reason, .. } = self {
            body["reason"] = serde_json::Value::from(*reason);
        }

        actix_web::HttpResponse::build(status).json(body)
    }
}

/// Result alias used throughout the crate.
pub type AppResult<T> = Result<T, AppError>;

/// Attaches context to foreign errors, mapping them to [`AppError::InternalError`].
///
/// Used where a failure is never the client's fault (file system, hashing,
/// token signing) and only the log needs to know what was being attempted.
///
/// # Examples
///
/// ```rust,ignore
/// tokio::fs::create_dir_all(&dir)
///     .await
///     .with_context(|| format!("cannot create {}", dir.display()))?;
/// ```
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> AppResult<T>;

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;
    use actix_web::ResponseError;
    use mongodb::bson::{doc, from_document};
    use mongodb::error::{CommandError, InsertManyError, WriteError};

    fn body_of(error: &AppError) -> serde_json::Value {
        let bytes = error.error_response().into_body().try_into_bytes().unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn write_error(code: i32) -> mongodb::error::Error {
        let write_error: WriteError = from_document(doc! {
            "code": code,
            "errmsg": "E11000 duplicate key error collection: shop.coupons index: code_1",
        })
        .unwrap();
        mongodb::error::Error::from(ErrorKind::Write(WriteFailure::WriteError(write_error)))
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::ValidationError("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (AppError::ConflictError("dup".into()), StatusCode::CONFLICT),
            (AppError::AuthenticationError("who".into()), StatusCode::UNAUTHORIZED),
            (AppError::AuthorizationError("no".into()), StatusCode::FORBIDDEN),
            (
                AppError::RuleViolation { reason: "expired", message: "coupon has expired".into() },
                StatusCode::BAD_REQUEST,
            ),
            (AppError::DatabaseError("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::RedisError("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::ExternalServiceError("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::InternalError("oops".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.error_response().status(), expected, "{}", error);
        }
    }

    #[test]
    fn test_error_body_is_failure_envelope() {
        let body = body_of(&AppError::ConflictError("email is already registered".into()));

        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("already registered"));
        assert!(body.get("reason").is_none());
    }

    #[test]
    fn test_rule_violation_body_carries_reason() {
        let body = body_of(&AppError::RuleViolation {
            reason: "usage_limit_reached",
            message: "coupon usage limit has been reached".into(),
        });

        assert_eq!(body["success"], false);
        assert_eq!(body["reason"], "usage_limit_reached");
        assert_eq!(body["message"], "Validation error: coupon usage limit has been reached");
    }

    #[test]
    fn test_duplicate_write_error_is_conflict() {
        let error = AppError::from_mongo(write_error(11000), "coupon code already exists");

        assert!(matches!(error, AppError::ConflictError(ref msg) if msg == "coupon code already exists"));
    }

    #[test]
    fn test_duplicate_command_error_is_conflict() {
        let command_error: CommandError = from_document(doc! {
            "code": 11000,
            "codeName": "DuplicateKey",
            "errmsg": "E11000 duplicate key error",
        })
        .unwrap();
        let error = mongodb::error::Error::from(ErrorKind::Command(command_error));

        assert!(matches!(AppError::from_mongo(error, "dup"), AppError::ConflictError(_)));
    }

    #[test]
    fn test_duplicate_in_insert_many_is_conflict() {
        let insert_error: InsertManyError = from_document(doc! {
            "writeErrors": [
                { "index": 0, "code": 11000, "errmsg": "E11000 duplicate key error" },
            ],
        })
        .unwrap();
        let error = mongodb::error::Error::from(ErrorKind::InsertMany(insert_error));

        assert!(matches!(
            AppError::from_mongo(error, "sample already requested"),
            AppError::ConflictError(_)
        ));
    }

    #[test]
    fn test_other_write_failure_stays_database_error() {
        let error = AppError::from_mongo(write_error(121), "dup");

        assert!(matches!(error, AppError::DatabaseError(_)));
    }

    #[test]
    fn test_redis_failure_maps_to_redis_error() {
        let redis_error = redis::RedisError::from((redis::ErrorKind::IoError, "connection reset"));

        let error = AppError::from(redis_error);

        assert!(matches!(error, AppError::RedisError(ref msg) if msg.contains("connection reset")));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        match app_result {
            Err(AppError::InternalError(msg)) => {
                assert!(msg.contains("Additional context"));
                assert!(msg.contains("original error"));
            }
            other => panic!("Expected InternalError, got {:?}", other),
        }
    }
}
