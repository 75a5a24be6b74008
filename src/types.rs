// Error taxonomy shared across the crate

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog entry: {0}")]
    Catalog(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
