use thiserror::Error;

#[derive(Debug, Error)]
pub enum RagError {
    #[error("unsupported format: {0} (expected one of pdf, docx, txt, csv, json)")]
    UnsupportedFormat(String),

    #[error("index is empty; prepare the document before asking")]
    EmptyIndex,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("extraction failed ({format}): {message}")]
    Extraction { format: String, message: String },

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("document is too long to summarize: {len} characters (max {max})")]
    OverLengthInput { len: usize, max: usize },

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("no document loaded")]
    NoDocument,

    #[error("{0}")]
    Http(String),

    #[error("request to {0} timed out")]
    Timeout(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RagError {
    /// Tags a model call failure as a generation failure, once.
    pub(crate) fn into_generation(self) -> Self {
        match self {
            RagError::Generation(_) => self,
            other => RagError::Generation(other.to_string()),
        }
    }

    pub(crate) fn extraction(format: impl Into<String>, message: impl ToString) -> Self {
        RagError::Extraction {
            format: format.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RagError>;
