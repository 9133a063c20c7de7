use thiserror::Error;

pub type CloudResult<T> = std::result::Result<T, CloudError>;

/// Provider error taxonomy.
///
/// Call sites that create resources treat `AlreadyExists` as success.
/// `Transient` covers throttling and provider-side 5xx conditions and is
/// the only variant a retry policy will retry.
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("{resource} already exists")]
    AlreadyExists { resource: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("transient provider error for {resource}: {message}")]
    Transient { resource: String, message: String },

    #[error("provider error for {resource} ({code}): {message}")]
    Provider { resource: String, code: String, message: String },

    #[error("{0}")]
    Other(String),
}

impl CloudError {
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}
