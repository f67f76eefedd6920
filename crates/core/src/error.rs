#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read taxonomy file: {0}")]
    FileRead(std::io::Error),
    #[error("taxonomy error: {0}")]
    Taxonomy(#[from] body_sites::TaxonomyError),
    #[error("navigation error: {0}")]
    Navigation(#[from] NavigationError),
}

pub type IpcResult<T> = std::result::Result<T, IpcError>;

/// Input errors raised when a text or HTTP caller names a node by id.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("'{0}' is not one of the body sites currently offered")]
    NotOffered(String),
}
