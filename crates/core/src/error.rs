use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The lot has no free spot left.
    #[error("Capacity exhausted: {0}")]
    Capacity(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for CoreError {
    /// Collapse field-level validation failures into a single message naming
    /// the offending fields in a stable order.
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        CoreError::Validation(format!("Invalid fields: {}", fields.join(", ")))
    }
}
