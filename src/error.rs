use thiserror::Error;

/// Pipeline-wide error type, one variant per failing stage
#[derive(Error, Debug)]
pub enum ReportError {
    /// Credential exchange did not yield a usable access token
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Metrics API returned a non-success status
    #[error("Search Console API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// Fewer rows than the 29 needed for a four-week weekday comparison
    #[error("Insufficient data: need at least 29 days, received {rows}")]
    InsufficientData { rows: usize },

    /// Chart rendering service failed
    #[error("Chart rendering failed: {0}")]
    Render(String),

    /// Message transport returned a non-success response
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Configuration issues (missing file, bad timezone, bad key material)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    /// Stable identifier for the failure stage, used in log output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "authentication",
            Self::Upstream { .. } => "upstream",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::Render(_) => "render",
            Self::Delivery(_) => "delivery",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
