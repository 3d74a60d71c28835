use crate::models::Id;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ClinicError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Id },
    #[error("{entity} '{key}' already exists")]
    Duplicate { entity: &'static str, key: String },
    #[error("{0} store lock poisoned")]
    LockPoisoned(&'static str),
}

impl From<clinic_types::TextError> for ClinicError {
    fn from(err: clinic_types::TextError) -> Self {
        ClinicError::InvalidInput(err.to_string())
    }
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;
