/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Debug)]
pub enum Error {
    /// Reading the schema input or writing the document output failed
    IoError(std::io::Error),
    /// The input bytes are not a valid schema document
    DecodeError(String),
    /// The assembled document could not be rendered in the requested format
    SerializationError(String),
    /// The embedded base document could not be loaded
    InvalidSeed(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::DecodeError(msg) => write!(f, "failed to decode schema: {}", msg),
            Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
            Error::InvalidSeed(msg) => write!(f, "invalid base document: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_io_error_has_source() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(err.source().is_some());
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_decode_error_display() {
        let err = Error::DecodeError("expected value at line 1 column 1".to_string());
        assert_eq!(
            err.to_string(),
            "failed to decode schema: expected value at line 1 column 1"
        );
        assert!(err.source().is_none());
    }
}
