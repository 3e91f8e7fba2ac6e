//! Translation from sqlx failures into the repository error taxonomy.

use sqlx::error::ErrorKind;

use crate::application::repos::RepoError;

/// Collapse a sqlx error into the `RepoError` the services match on.
///
/// Unique violations keep their constraint name so the social graph can
/// treat a duplicate follow edge as success. Check and not-null
/// violations (the no-self-edge guard, required columns) surface as
/// integrity errors; foreign-key violations mean the caller referenced a
/// row that is gone.
pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        sqlx::Error::Database(db) => match db.kind() {
            ErrorKind::UniqueViolation => RepoError::Duplicate {
                constraint: db.constraint().unwrap_or("unknown").to_string(),
            },
            ErrorKind::ForeignKeyViolation => RepoError::InvalidInput {
                message: db.message().to_string(),
            },
            ErrorKind::CheckViolation | ErrorKind::NotNullViolation => RepoError::Integrity {
                message: db.message().to_string(),
            },
            _ if db
                .message()
                .contains("canceling statement due to user request") =>
            {
                RepoError::Timeout
            }
            _ => RepoError::from_persistence(db.message()),
        },
        other => RepoError::from_persistence(other),
    }
}
