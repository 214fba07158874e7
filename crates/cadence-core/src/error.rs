use std::path::PathBuf;

/// Errors that can occur across the Cadence workspace.
///
/// Only missing or malformed inputs surface as errors. Degenerate data
/// (empty commit sets, zero denominators, single data points) is handled
/// by the analytics engine with neutral defaults and never reaches here.
///
/// # Examples
///
/// ```
/// use cadence_core::CadenceError;
///
/// let err = CadenceError::Config("duplicate alias".into());
/// assert!(err.to_string().contains("duplicate alias"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum CadenceError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    #[diagnostic(code(cadence::io))]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    #[diagnostic(code(cadence::config))]
    Config(String),

    /// A request was rejected before computation started.
    #[error("invalid input: {0}")]
    #[diagnostic(code(cadence::input))]
    InvalidInput(String),

    /// Commit log or stat summary could not be parsed.
    #[error("parse error: {0}")]
    #[diagnostic(code(cadence::parse))]
    Parse(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    #[diagnostic(code(cadence::serialization))]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(cadence::toml))]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    #[diagnostic(
        code(cadence::file_not_found),
        help("export the commit log as a JSON array of commit records first")
    )]
    FileNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CadenceError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = CadenceError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn invalid_input_displays_message() {
        let err = CadenceError::InvalidInput("repository name is empty".into());
        assert_eq!(err.to_string(), "invalid input: repository name is empty");
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = CadenceError::FileNotFound(PathBuf::from("/tmp/commits.json"));
        assert!(err.to_string().contains("/tmp/commits.json"));
    }
}
