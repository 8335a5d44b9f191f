use thiserror::Error;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image fetch error: {0}")]
    Fetch(String),

    #[error("Export storage error: {0}")]
    Storage(String),

    #[error("Required export {file} missing for report {report_id}")]
    MissingExport { report_id: u64, file: String },

    #[error("Report {0} not found")]
    ReportNotFound(u64),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ReportError {
    /// Transient infrastructure failures are worth retrying; everything else
    /// aborts the current report.
    pub fn is_transient(&self) -> bool {
        matches!(self, ReportError::Fetch(_) | ReportError::Storage(_))
    }

    /// Structural failures abort one report but never the whole run.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ReportError::MissingExport { .. } | ReportError::ReportNotFound(_)
        )
    }
}
