use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from terminal or config handling.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// HTTP client construction errors.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server URL given at startup could not be parsed.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// A listing request failed: transport error, non-2xx status, or a
    /// response body that does not parse as a listing.
    #[error("Listing failed for \"{path}\": {reason}")]
    List { path: String, reason: String },

    /// An open request failed, scoped to the file that triggered it.
    #[error("Open failed for \"{path}\": {reason}")]
    Open { path: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn terminal_error_display() {
        let err = AppError::Terminal("failed to enter raw mode".into());
        assert_eq!(err.to_string(), "Terminal error: failed to enter raw mode");
    }

    #[test]
    fn list_error_names_the_path() {
        let err = AppError::List {
            path: "docs/guides".into(),
            reason: "500 Internal Server Error".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("docs/guides"));
        assert!(msg.contains("500 Internal Server Error"));
    }

    #[test]
    fn open_error_names_the_path() {
        let err = AppError::Open {
            path: "readme.txt".into(),
            reason: "connection refused".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Open failed"));
        assert!(msg.contains("readme.txt"));
    }

    #[test]
    fn invalid_url_display() {
        let err = AppError::InvalidUrl("not a url".into());
        assert_eq!(err.to_string(), "Invalid server URL: not a url");
    }
}
