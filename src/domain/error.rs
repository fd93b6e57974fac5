//! Domain error types.

/// Top-level error type for tascreen.
#[derive(Debug, thiserror::Error)]
pub enum TascreenError {
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

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("no data for {code} on {exchange}")]
    NoData { code: String, exchange: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TascreenError> for std::process::ExitCode {
    fn from(err: &TascreenError) -> Self {
        let code: u8 = match err {
            TascreenError::Io(_) => 1,
            TascreenError::ConfigParse { .. }
            | TascreenError::ConfigMissing { .. }
            | TascreenError::ConfigInvalid { .. } => 2,
            TascreenError::Data { .. } => 3,
            TascreenError::InvalidInput { .. } => 4,
            TascreenError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
