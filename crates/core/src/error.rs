#[derive(Debug, thiserror::Error)]
pub enum LabError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("catalog error: {0}")]
    Catalog(#[from] lab_catalog::CatalogError),
}

pub type LabResult<T> = std::result::Result<T, LabError>;
