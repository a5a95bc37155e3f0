//! Error conversion implementations.
//!
//! From implementations that fold third-party error types into the unified
//! Error type.

use super::types::Error;

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            other => Error::Zip(other.to_string()),
        }
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::Xml(format!("XML write error: {}", err))
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::InvalidFormat(format!("invalid UTF-8: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_io_error_is_unwrapped() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = zip::result::ZipError::Io(io).into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_zip_other_error_is_wrapped() {
        let err: Error = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, Error::Zip(_)));
    }
}
