//! Functionality for individual reeldice user accounts.
use tracing::warn;

use super::hashing::hashed::{constant_time_eq, IntoHashed, PasswordHash};
use crate::error::Error;

/// A `reeldice` account: a username and its stored password hash.
///
/// ### The stored password
///
/// - At registration the password is run through PBKDF2-HMAC-SHA256 under a fresh 32-byte salt.
///
/// - The stored form is the lowercase hex of `salt || derived key`. It is kept exactly as read
///     from the credential file, so a row that can't be decoded survives a load/save cycle
///     untouched and simply never verifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    username: String,
    encoded_password: String,
}
impl Account {
    /// Create a new [Account] from a username and a password.
    pub fn new(username: &str, password: &str) -> Self {
        let hashed_password: PasswordHash = password.into_hashed_rand_salt();
        Self {
            username: username.to_owned(),
            encoded_password: hashed_password.to_hex(),
        }
    }

    /// Create an [Account] from its fields.
    pub fn from_fields(username: String, encoded_password: String) -> Self {
        Self {
            username,
            encoded_password,
        }
    }

    /// Parse one `username,encoded` row of the credential file.
    ///
    /// Return [None] if the row has no separator or an empty username.
    pub fn from_row(row: &str) -> Option<Self> {
        let (username, encoded_password) = row.split_once(',')?;
        if username.is_empty() {
            return None;
        }
        Some(Self::from_fields(
            username.to_owned(),
            encoded_password.to_owned(),
        ))
    }

    /// Format this [Account] as one row of the credential file, without the line terminator.
    pub fn to_row(&self) -> String {
        format!("{},{}", self.username, self.encoded_password)
    }

    /// Get the `username` of this [Account].
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Get the stored hex encoding of this [Account]'s password hash.
    pub fn encoded_password(&self) -> &str {
        &self.encoded_password
    }

    /// Decode the stored password hash.
    ///
    /// Return [Error::MalformedCredentialError] if the stored string isn't a canonical-length hex
    /// encoding.
    pub fn password_hash(&self) -> Result<PasswordHash, Error> {
        PasswordHash::from_hex(&self.encoded_password)
            .ok_or_else(|| Error::MalformedCredentialError(self.username.clone()))
    }

    /// Check whether `password` is this account's password.
    ///
    /// Fails closed: a stored hash that can't be decoded never matches.
    pub fn check_password_match(&self, password: &str) -> bool {
        let stored = match self.password_hash() {
            Ok(stored) => stored,
            Err(err) => {
                warn!(username = self.username.as_str(), "refusing login: {err}");
                return false;
            }
        };
        let candidate: PasswordHash = password.into_hashed_with_salt(*stored.salt());
        constant_time_eq(
            candidate.to_hex().as_bytes(),
            self.encoded_password.as_bytes(),
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::{assert_eq, assert_ne};

    use super::*;

    const TEST_USERNAME: &str = "Mister Test";
    const TEST_PASSWORD: &str = "I'm the great Mister Test, I don't need a password!";

    #[test]
    fn new_account_matches_password() {
        let account = Account::new(TEST_USERNAME, TEST_PASSWORD);

        assert_eq!(account.username(), TEST_USERNAME);
        assert_eq!(account.encoded_password().len(), PasswordHash::HEX_LEN);
        assert!(account.check_password_match(TEST_PASSWORD));
        assert!(!account.check_password_match("I'm the great Mister Test"));
        assert!(!account.check_password_match(""));
    }

    #[test]
    fn same_password_different_encoding() {
        let account_1 = Account::new(TEST_USERNAME, TEST_PASSWORD);
        let account_2 = Account::new(TEST_USERNAME, TEST_PASSWORD);

        assert_ne!(account_1.encoded_password(), account_2.encoded_password());
        assert!(account_1.check_password_match(TEST_PASSWORD));
        assert!(account_2.check_password_match(TEST_PASSWORD));
    }

    #[test]
    fn empty_password_is_hashed() {
        let account = Account::new(TEST_USERNAME, "");
        assert!(account.check_password_match(""));
        assert!(!account.check_password_match(" "));
    }

    #[test]
    fn row_round_trip() {
        let account = Account::new(TEST_USERNAME, TEST_PASSWORD);
        let loaded = Account::from_row(&account.to_row()).unwrap();
        assert_eq!(account, loaded);
        assert!(loaded.check_password_match(TEST_PASSWORD));
    }

    #[test]
    fn from_row_rejects_bad_rows() {
        assert_eq!(Account::from_row("no separator here"), None);
        assert_eq!(Account::from_row(",deadbeef"), None);
    }

    #[test]
    fn legacy_plaintext_fails_closed() {
        let legacy = Account::from_row("old_timer,hunter2").unwrap();
        assert_eq!(
            legacy.password_hash(),
            Err(Error::MalformedCredentialError(String::from("old_timer")))
        );
        assert!(!legacy.check_password_match("hunter2"));

        let too_short = Account::from_row(&format!("short,{}", "ab".repeat(63))).unwrap();
        assert!(!too_short.check_password_match(""));
    }

    #[test]
    fn uppercase_hex_is_not_canonical() {
        let account = Account::new(TEST_USERNAME, TEST_PASSWORD);
        let shouted = Account::from_fields(
            TEST_USERNAME.to_owned(),
            account.encoded_password().to_uppercase(),
        );
        assert!(shouted.password_hash().is_ok());
        assert!(!shouted.check_password_match(TEST_PASSWORD));
    }
}
