use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, TreemarkError>;

#[derive(Debug, thiserror::Error)]
pub enum TreemarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Path '{}' is not a valid directory", .0.display())]
    InvalidRoot(PathBuf),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Error: {0}")]
    Generic(String),
}

impl From<String> for TreemarkError {
    fn from(error: String) -> Self {
        TreemarkError::Generic(error)
    }
}

impl From<&str> for TreemarkError {
    fn from(error: &str) -> Self {
        TreemarkError::Generic(error.to_string())
    }
}
