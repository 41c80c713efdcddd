use thiserror::Error;

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while producing an artifact
#[derive(Error, Debug, Clone)]
pub enum RenderError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}
