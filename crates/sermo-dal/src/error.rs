use sermo_types::FieldErrors;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Record not found: {0}")]
    RecordNotFound(String),
}

/// Outcome of a failed create or update through the serializer.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Invalid(#[from] FieldErrors),

    #[error(transparent)]
    Persistence(#[from] Error),
}

impl SaveError {
    pub fn validation_errors(&self) -> Option<&FieldErrors> {
        match self {
            SaveError::Invalid(errors) => Some(errors),
            SaveError::Persistence(_) => None,
        }
    }
}
