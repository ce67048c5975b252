// ABOUTME: Structured error types for database operations
// ABOUTME: Classifies sqlx failures into unique, foreign-key, and generic query errors

use super::{AppError, ErrorCode};

/// Database operation failures with the constraint context preserved
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// A UNIQUE constraint rejected the write
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation {
        /// Constraint description reported by the driver (e.g. `recipes.link`)
        constraint: String,
    },

    /// A FOREIGN KEY constraint rejected the write
    #[error("Foreign key constraint violated: {context}")]
    ForeignKeyViolation {
        /// Driver message
        context: String,
    },

    /// A CHECK constraint rejected the write
    #[error("Check constraint violated: {context}")]
    CheckViolation {
        /// Driver message
        context: String,
    },

    /// Any other query failure
    #[error("Database query failed: {context}")]
    QueryError {
        /// Driver message
        context: String,
    },
}

impl DatabaseError {
    /// Whether this is a unique violation touching the given `table.column`
    #[must_use]
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        matches!(self, Self::UniqueViolation { constraint } if constraint.contains(column))
    }

    /// Whether this is any unique violation
    #[must_use]
    pub const fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            let message = db_error.message().to_owned();
            if db_error.is_unique_violation() {
                return Self::UniqueViolation {
                    constraint: message,
                };
            }
            if db_error.is_foreign_key_violation() {
                return Self::ForeignKeyViolation { context: message };
            }
            if db_error.is_check_violation() {
                return Self::CheckViolation { context: message };
            }
        }
        Self::QueryError {
            context: error.to_string(),
        }
    }
}

impl From<DatabaseError> for AppError {
    fn from(error: DatabaseError) -> Self {
        let code = match &error {
            DatabaseError::UniqueViolation { .. } => ErrorCode::ResourceAlreadyExists,
            DatabaseError::ForeignKeyViolation { .. } | DatabaseError::CheckViolation { .. } => {
                ErrorCode::InvalidInput
            }
            DatabaseError::QueryError { .. } => ErrorCode::DatabaseError,
        };
        Self::new(code, error.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::from(error).into()
    }
}
