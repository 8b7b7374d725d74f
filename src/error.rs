//! All the different backend errors that reeldice can experience, meant to be displayed in the
//! frontend.
use core::fmt;

use camino::Utf8PathBuf;

/// A list of all the handled reeldice errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Tried to register a username that is already in the credential store.
    DuplicateUserError(String),
    /// Tried to register a username that can't be stored.
    InvalidUsernameError(String, String),
    /// A stored password hash could not be decoded.
    MalformedCredentialError(String),
    /// A reference table is missing a required column.
    MalformedTableError(String, String),
    /// Reading or writing a store file failed.
    StoreIoError(Utf8PathBuf, String),
}
impl Error {
    /// Wrap an [std::io::Error] that occurred while touching the file at `path`.
    pub fn store_io<P>(path: P, err: std::io::Error) -> Self
    where
        P: Into<Utf8PathBuf>,
    {
        Error::StoreIoError(path.into(), err.to_string())
    }
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let message = match self {
            Error::DuplicateUserError(username) => {
                format!("DuplicateUserError: Account \"{username}\" already exists.")
            }
            Error::InvalidUsernameError(username, reason) => {
                format!("InvalidUsernameError: Username \"{username}\" is invalid: {reason}")
            }
            Error::MalformedCredentialError(username) => {
                format!(
                    "MalformedCredentialError: Stored password hash for \"{username}\" could not be decoded."
                )
            }
            Error::MalformedTableError(table, reason) => {
                format!("MalformedTableError: Table \"{table}\" is malformed: {reason}")
            }
            Error::StoreIoError(path, error_as_string) => {
                format!("StoreIoError: \"{path}\": {error_as_string}")
            }
        };
        write!(f, "{}", message)
    }
}
impl std::error::Error for Error {}
