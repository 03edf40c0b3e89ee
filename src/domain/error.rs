//! Domain error types.
//!
//! Only data loading and configuration problems are errors. Missing warm-up
//! history, unknown strategies and blocked trades are encoded in the decision
//! log instead.

/// Top-level error type for sigdash.
#[derive(Debug, thiserror::Error)]
pub enum SigdashError {
    #[error("no data for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SigdashError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        SigdashError::MalformedInput {
            reason: reason.into(),
        }
    }

    pub fn no_data(symbol: &str, reason: impl Into<String>) -> Self {
        SigdashError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        SigdashError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            SigdashError::Io(_) | SigdashError::Csv(_) => 1,
            SigdashError::ConfigParse { .. } | SigdashError::ConfigInvalid { .. } => 2,
            SigdashError::MalformedInput { .. } => 3,
            SigdashError::DataUnavailable { .. } => 5,
        }
    }
}

impl From<&SigdashError> for std::process::ExitCode {
    fn from(err: &SigdashError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_data_unavailable() {
        let err = SigdashError::no_data("AAPL", "empty response");
        assert_eq!(err.to_string(), "no data for AAPL: empty response");
    }

    #[test]
    fn display_config_invalid() {
        let err = SigdashError::invalid("simple", "buy", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid config value [simple] buy: must be positive"
        );
    }

    #[test]
    fn exit_status_by_category() {
        let cases = [
            (SigdashError::malformed("x"), 3),
            (SigdashError::no_data("X", "y"), 5),
            (SigdashError::invalid("a", "b", "c"), 2),
            (SigdashError::Io(std::io::Error::other("disk")), 1),
        ];
        for (err, expected) in cases {
            assert_eq!(err.exit_status(), expected, "{err}");
        }
    }
}
