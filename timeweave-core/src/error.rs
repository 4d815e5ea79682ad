use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by a host-supplied collaborator (rotation comparer,
/// name assigner, source catalog).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CollaboratorError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Why a rebuild did not complete. The previously published snapshot stays
/// in place whenever one of these is returned.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("source catalog failed")]
    Catalog(#[source] CollaboratorError),

    #[error("rotation comparer failed")]
    Rotation(#[source] CollaboratorError),

    #[error("name assignment failed")]
    NameAssignment(#[source] CollaboratorError),
}
