//! Different helpers and consts for user input validation.
use crate::error::Error;

/// Longest username, in bytes, accepted at registration.
pub const USERNAME_MAX_LEN: usize = 64;

/// Characters that would break a row of a comma-delimited store file.
pub const USERNAME_FORBIDDEN_CHARS: &str = ",\r\n";

/// Ensure that the given input satisfies the given restrictions.
///
/// On failure, return a human-readable reason.
pub fn validate_input(
    input: &str,
    min_len: usize,
    max_len: usize,
    forbidden_chars: &str,
) -> Result<(), String> {
    if input.len() < min_len {
        Err(format!(
            "Input length {} is less than minimum length {}.",
            input.len(),
            min_len
        ))
    } else if input.len() > max_len {
        Err(format!(
            "Input length {} is greater than maximum length {}.",
            input.len(),
            max_len
        ))
    } else if let Some(f_char) = input.chars().find(|c| forbidden_chars.contains(*c)) {
        Err(format!("Input cannot contain character {:?}.", f_char))
    } else {
        Ok(())
    }
}

/// Ensure that the given username can be stored.
///
/// Passwords are deliberately not validated: any string, including an empty one, is hashed.
pub fn validate_username(username: &str) -> Result<(), Error> {
    validate_input(username, 1, USERNAME_MAX_LEN, USERNAME_FORBIDDEN_CHARS)
        .map_err(|reason| Error::InvalidUsernameError(username.to_owned(), reason))
}
