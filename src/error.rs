use std::io;
use thiserror::Error;

/// Error type for the display crate
#[derive(Error, Debug)]
pub enum Error {
    /// Video subsystem unavailable or backend failure
    #[error("video subsystem error: {0}")]
    Subsystem(String),

    /// Window creation failed
    #[error("window could not be created: {0}")]
    WindowCreation(String),

    /// Drawing surface update or present failed
    #[error("render surface error: {0}")]
    Surface(String),

    /// Unsupported window scale factor; the display falls back to 1:1
    #[error("unsupported scale factor {0}, falling back to 1:1")]
    ScaleHint(u32),

    /// Operation on a display that has not been initialized or was torn down
    #[error("display surface is not live")]
    NotLive,

    /// Teardown of an already closed display
    #[error("display already closed")]
    AlreadyClosed,

    /// IO error
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// Configuration parse error
    #[error("config error: {0}")]
    Config(String),
}

impl From<minifb::Error> for Error {
    fn from(err: minifb::Error) -> Self {
        match err {
            minifb::Error::WindowCreate(msg) => Error::WindowCreation(msg),
            minifb::Error::UpdateFailed(msg) => Error::Surface(msg),
            other => Error::Subsystem(other.to_string()),
        }
    }
}

/// Display result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minifb_error_mapping() {
        let err = Error::from(minifb::Error::WindowCreate("no display".to_string()));
        assert!(matches!(err, Error::WindowCreation(_)));

        let err = Error::from(minifb::Error::UpdateFailed("lost surface".to_string()));
        assert!(matches!(err, Error::Surface(_)));

        let err = Error::from(minifb::Error::MenusNotSupported);
        assert!(matches!(err, Error::Subsystem(_)));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(Error::NotLive.to_string(), "display surface is not live");
        assert_eq!(Error::AlreadyClosed.to_string(), "display already closed");
        assert_eq!(
            Error::ScaleHint(3).to_string(),
            "unsupported scale factor 3, falling back to 1:1"
        );
    }
}
