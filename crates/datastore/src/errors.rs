/// Ways a caller can misuse the data access API.
///
/// All of these are detected before any SQL runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum UsageError {
    #[error("Both where and values must be passed, or not passed both")]
    ClauseParamsMismatch,

    #[error("Cannot use find method because this class does not have any primary keys")]
    FindWithoutPrimaryKey,

    #[error("The number of primary keys and primary key values do not match")]
    PrimaryKeyCountMismatch { expected: usize, got: usize },

    #[error("The values of keys must be 1 or more")]
    EmptyKeyList,

    #[error("Cannot use this function with no primary key model")]
    NoPrimaryKey,

    #[error("An update must set at least one field")]
    EmptyUpdate,

    #[error("The record has no changed fields to update")]
    NothingToUpdate,

    #[error("Primary key field {0} changed; update it with an explicit clause instead")]
    PrimaryKeyChanged(String),

    #[error("A statement cannot mix positional and named parameters")]
    MixedParamStyles,

    #[error("Parameter {0} would be bound twice")]
    DuplicateParameter(String),
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("{}", _0)]
    Usage(#[from] UsageError),

    #[error("sqlite error: {}", _0)]
    Sqlite(#[from] rusqlite::Error),

    #[error("template error: {}", _0)]
    Template(#[from] tera::Error),

    #[error("invalid configuration: {}", _0)]
    Config(#[from] serde_json::Error),
}

impl Error {
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }

    pub fn as_usage(&self) -> Option<&UsageError> {
        match self {
            Error::Usage(u) => Some(u),
            _ => None,
        }
    }

    /// True if the engine rejected a statement because of a primary key, unique, not-null, check or foreign key
    /// constraint.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Error::Sqlite(rusqlite::Error::SqliteFailure(e, _)) => {
                e.code == rusqlite::ErrorCode::ConstraintViolation
            }
            _ => false,
        }
    }

    /// True if another connection held a lock this statement needed, past the busy timeout.
    pub fn is_busy(&self) -> bool {
        match self {
            Error::Sqlite(rusqlite::Error::SqliteFailure(e, _)) => e.code == rusqlite::ErrorCode::DatabaseBusy,
            _ => false,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_messages_are_passed_through() {
        let e: Error = UsageError::ClauseParamsMismatch.into();
        assert!(e.is_usage());
        assert_eq!(
            e.to_string(),
            "Both where and values must be passed, or not passed both"
        );
        assert_eq!(e.as_usage(), Some(&UsageError::ClauseParamsMismatch));
        assert!(!e.is_constraint_violation());
    }

    #[test]
    fn engine_errors_are_not_usage_errors() {
        let e: Error = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(!e.is_usage());
        assert!(e.as_usage().is_none());
    }
}
