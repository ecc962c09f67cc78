//! Error handling

use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

/// Dashboard errors. None of them is fatal to the polling loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// Network failure, timeout, non-2xx status or unreadable body from `/predict`
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Event rejected before touching any dashboard view
    #[error("Malformed event: {0}")]
    MalformedEvent(String),
}

impl DashboardError {
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, DashboardError::SourceUnavailable(_))
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DashboardError::SourceUnavailable(format!("request timed out: {}", err))
        } else if let Some(status) = err.status() {
            DashboardError::SourceUnavailable(format!("server error: {}", status.as_u16()))
        } else {
            DashboardError::SourceUnavailable(err.to_string())
        }
    }
}
