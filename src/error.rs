use thiserror::Error;

use crate::schema::ValidationError;

/// Failures a collection service reports back to its caller
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Payload rejected before any mutation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },
}

impl ServiceError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
