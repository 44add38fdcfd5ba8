//! Domain error types.

/// Top-level error type for signalscan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {code}")]
    NoData { code: String },

    #[error("insufficient data for {code}: have {bars} bars, need {minimum}")]
    InsufficientData {
        code: String,
        bars: usize,
        minimum: usize,
    },

    #[error("invalid price series for {code}: {reason}")]
    InvalidSeries { code: String, reason: String },

    #[error("computation error at row {index}: {reason}")]
    Computation { index: usize, reason: String },

    #[error("notification failed: {reason}")]
    Notify { reason: String },

    #[error("sheet logging failed: {reason}")]
    Sheet { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ScanError> for std::process::ExitCode {
    fn from(err: &ScanError) -> Self {
        let code: u8 = match err {
            ScanError::Io(_) => 1,
            ScanError::ConfigParse { .. }
            | ScanError::ConfigMissing { .. }
            | ScanError::ConfigInvalid { .. } => 2,
            ScanError::Data { .. }
            | ScanError::Notify { .. }
            | ScanError::Sheet { .. }
            | ScanError::Computation { .. } => 3,
            ScanError::NoData { .. }
            | ScanError::InsufficientData { .. }
            | ScanError::InvalidSeries { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
