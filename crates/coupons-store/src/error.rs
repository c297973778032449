//! Error types for coupons storage.
//!
//! Every store operation fails with one of three kinds: the key did not
//! resolve (`NotFound`), the database rejected the work (`CommitFailed`), or
//! a business rule refused it (`ValidationFailed`).

use coupons_core::Unavailable;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Record not found.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: &'static str,
        /// The key that did not resolve.
        key: String,
    },

    /// The database rejected the operation or could not be reached.
    #[error("{context}")]
    CommitFailed {
        /// Whether the failure is a constraint conflict or an infrastructure fault.
        reason: CommitFailure,
        /// What the store was trying to do.
        context: String,
        /// The underlying error.
        #[source]
        source: BoxError,
    },

    /// A business rule refused the operation.
    #[error("{message}")]
    ValidationFailed {
        /// Why the rule failed.
        reason: Unavailable,
        /// Human-readable description.
        message: String,
    },
}

/// Classification of a `CommitFailed` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitFailure {
    /// A unique, foreign-key, check or not-null constraint was violated.
    /// Retrying the same operation will fail again.
    Conflict,
    /// Any other store-level failure (I/O, pool, locking, corrupt row).
    Storage,
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub(crate) fn unavailable(code: &str, reason: Unavailable) -> Self {
        Self::ValidationFailed {
            reason,
            message: format!("coupon {code} is not available: {reason}"),
        }
    }

    /// Build a mapper turning a `sqlx` error into `CommitFailed` with `context`.
    pub(crate) fn commit(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |err| Self::CommitFailed {
            reason: classify(&err),
            context: context.to_string(),
            source: Box::new(err),
        }
    }

    /// A row read back from the database does not decode into a domain type.
    pub(crate) fn corrupt(entity: &'static str, err: impl Into<BoxError>) -> Self {
        Self::CommitFailed {
            reason: CommitFailure::Storage,
            context: format!("stored {entity} row is invalid"),
            source: err.into(),
        }
    }

    /// Whether retrying the whole operation could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CommitFailed {
                reason: CommitFailure::Storage,
                ..
            }
        )
    }
}

/// Primary result code shared by every SQLite constraint error.
const SQLITE_CONSTRAINT: i32 = 19;

fn classify(err: &sqlx::Error) -> CommitFailure {
    use sqlx::error::ErrorKind;

    match err {
        sqlx::Error::Database(db) => match db.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => CommitFailure::Conflict,
            // Extended codes sqlx leaves unmapped, e.g. 1811 for a RESTRICT action.
            _ if is_constraint_code(db.code().as_deref()) => CommitFailure::Conflict,
            _ => CommitFailure::Storage,
        },
        _ => CommitFailure::Storage,
    }
}

fn is_constraint_code(code: Option<&str>) -> bool {
    code.and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| code & 0xff == SQLITE_CONSTRAINT)
}
