use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Form is not valid: {0}")]
    InvalidForm(String),

    #[error("No service identifier was submitted")]
    MissingServiceId,

    #[error("Service '{0}' is not among the checked registries")]
    UnknownService(String),

    #[error("Invalid page number {0} (pages start at 1)")]
    InvalidPage(usize),

    #[error("Record request rejected: {0}")]
    RequestRejected(String),

    #[error("Malformed record response: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
