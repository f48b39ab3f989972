use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// A path, header, or body value failed validation.
    InvalidInput(String),
    /// A caller violated an API precondition.
    InvalidArgument(String),
    /// The requested record does not exist.
    NotFound(String),
    /// A record with the same identifier already exists.
    Conflict(String),
    /// A persistence layer error (database, file system, etc.).
    Persistence(String),
    /// A configuration error occurred.
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            Error::NotFound(msg) => write!(f, "Not found: {msg}"),
            Error::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Error::Persistence(msg) => write!(f, "Persistence error: {msg}"),
            Error::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        Error::Persistence(value.to_string())
    }
}
