use thiserror::Error;

/// Reasons a movie payload is rejected before anything is written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Field '{0}' is required but was empty")]
    EmptyField(&'static str),

    #[error("Invalid payload: {0}")]
    InvalidType(String),

    #[error("Actor name '{name}' contains forbidden character '{character}'")]
    ForbiddenCharacter { name: String, character: char },

    #[error("Referenced {entity} with id {id} does not exist")]
    UnknownReference { entity: &'static str, id: i64 },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{entity} {key} already exists")]
    Conflict { entity: &'static str, key: String },
}

/// Caller-visible outcome of a failed movie operation.
#[derive(Debug, Error)]
pub enum MovieError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Movie with id {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<rusqlite::Error> for MovieError {
    fn from(err: rusqlite::Error) -> Self {
        MovieError::Store(StoreError::Sqlite(err))
    }
}

/// True when SQLite refused a write because a UNIQUE or PRIMARY KEY
/// constraint already holds the value.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == rusqlite::ErrorCode::ConstraintViolation
                && (failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        }
        _ => false,
    }
}
