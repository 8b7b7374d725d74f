//! The credential file: one row per [Account], behind a `Username,Password` header.
use std::collections::{btree_map::Entry, BTreeMap};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};

use super::{
    account::Account,
    filesystem,
    hashing::hashed::{rand_salt, PasswordHash},
};
use crate::{error::Error, input_validation::validate_username};

/// Header row of the credential file.
pub const CREDENTIALS_HEADER: &str = "Username,Password";

/// Idempotently create the credential file at `path`, header included.
///
/// An existing, non-empty file is never touched.
pub fn ensure_store<P>(path: P) -> Result<(), Error>
where
    P: AsRef<Utf8Path>,
{
    let path = path.as_ref();
    filesystem::ensure_parent_dir(path)?;
    if filesystem::create_with_contents(path, format!("{CREDENTIALS_HEADER}\n"))? {
        info!(path = path.as_str(), "created credential store");
    }
    Ok(())
}

/// The [CredentialStore] owns the in-memory index of every [Account] in the credential file. The
/// index only ever changes after the file itself has been successfully written, so the two stay
/// consistent.
///
/// Not safe for concurrent writers: two processes registering at once can both pass the
/// duplicate check.
#[derive(Debug)]
pub struct CredentialStore {
    path: Utf8PathBuf,
    accounts: BTreeMap<String, Account>,
}
impl CredentialStore {
    /// Open the credential file at `path`, creating it if it doesn't exist, and load it.
    pub fn open<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Utf8Path>,
    {
        ensure_store(path.as_ref())?;
        let mut store = Self {
            path: path.as_ref().to_path_buf(),
            accounts: BTreeMap::new(),
        };
        store.reload()?;
        Ok(store)
    }

    /// Re-read the credential file, replacing the in-memory index.
    pub fn reload(&mut self) -> Result<(), Error> {
        let contents = filesystem::read_if_exists(&self.path)?
            .ok_or_else(|| Error::StoreIoError(self.path.clone(), String::from("not found")))?;
        self.accounts = parse_accounts(&contents);
        debug!(
            path = self.path.as_str(),
            accounts = self.accounts.len(),
            "loaded credential store"
        );
        Ok(())
    }

    /// Register a new account.
    ///
    /// The file is re-read first so the duplicate check sees every persisted username. Matching is
    /// exact and case-sensitive.
    pub fn register(&mut self, username: &str, password: &str) -> Result<(), Error> {
        validate_username(username)?;
        ensure_store(&self.path)?;
        self.reload()?;
        if self.contains(username) {
            info!(username, "registration refused: username taken");
            return Err(Error::DuplicateUserError(username.to_owned()));
        }

        let account = Account::new(username, password);
        filesystem::append_line(&self.path, &account.to_row())?;
        self.accounts.insert(username.to_owned(), account);
        info!(username, "registered account");
        Ok(())
    }

    /// Check a username and password. `false` if the account doesn't exist, if its stored hash is
    /// malformed, or if the password is wrong.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        match self.accounts.get(username) {
            Some(account) => {
                let matched = account.check_password_match(password);
                if !matched {
                    debug!(username, "password mismatch");
                }
                matched
            }
            None => {
                // Burn the same work as a real check so absent users aren't distinguishable by
                // response time.
                let _ = PasswordHash::hash_with_salt(password.as_bytes(), rand_salt());
                debug!(username, "no such account");
                false
            }
        }
    }

    /// Whether an account named exactly `username` is loaded.
    pub fn contains(&self, username: &str) -> bool {
        self.accounts.contains_key(username)
    }

    /// Get a loaded [Account].
    pub fn account(&self, username: &str) -> Option<&Account> {
        self.accounts.get(username)
    }

    /// All loaded usernames, in sorted order.
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.accounts.keys().map(String::as_str)
    }

    /// Number of loaded accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether no accounts are loaded.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Path of the backing credential file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

fn parse_accounts(contents: &str) -> BTreeMap<String, Account> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
    let mut accounts = BTreeMap::new();
    let mut header_checked = false;
    for (line_number, line) in contents.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        // Only the first non-blank line can be the header.
        if !header_checked {
            header_checked = true;
            if line == CREDENTIALS_HEADER {
                continue;
            }
        }
        let Some(account) = Account::from_row(line) else {
            warn!(line = line_number + 1, "skipping malformed credential row");
            continue;
        };
        match accounts.entry(account.username().to_owned()) {
            Entry::Vacant(entry) => {
                entry.insert(account);
            }
            Entry::Occupied(entry) => {
                warn!(
                    line = line_number + 1,
                    username = entry.key().as_str(),
                    "ignoring repeated credential row"
                );
            }
        }
    }
    accounts
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn test_store_path(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join("user_credentials.csv")).unwrap()
    }

    #[test]
    fn ensure_store_writes_header_once() {
        let dir = TempDir::new().unwrap();
        let path = test_store_path(&dir);

        ensure_store(&path).unwrap();
        ensure_store(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Username,Password\n");
    }

    #[test]
    fn ensure_store_keeps_existing_rows() {
        let dir = TempDir::new().unwrap();
        let path = test_store_path(&dir);
        fs::write(&path, "Username,Password\nangler,abcd\n").unwrap();

        ensure_store(&path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Username,Password\nangler,abcd\n"
        );
    }

    #[test]
    fn register_then_verify() {
        let dir = TempDir::new().unwrap();
        let mut store = CredentialStore::open(test_store_path(&dir)).unwrap();
        assert!(store.is_empty());

        store.register("angler", "fishy").unwrap();
        assert!(store.verify("angler", "fishy"));
        assert!(!store.verify("angler", "Fishy"));
        assert!(!store.verify("Angler", "fishy"));
        assert!(!store.verify("nobody", "fishy"));
    }

    #[test]
    fn duplicate_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        let mut store = CredentialStore::open(test_store_path(&dir)).unwrap();

        store.register("angler", "one").unwrap();
        assert_eq!(
            store.register("angler", "two"),
            Err(Error::DuplicateUserError(String::from("angler")))
        );
        store.register("Angler", "two").unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.verify("angler", "one"));
        assert!(!store.verify("angler", "two"));
        assert!(store.verify("Angler", "two"));
    }

    #[test]
    fn invalid_username_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = test_store_path(&dir);
        let mut store = CredentialStore::open(&path).unwrap();

        let err = store.register("bad,name", "pw").unwrap_err();
        assert!(matches!(err, Error::InvalidUsernameError(..)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "Username,Password\n");
        assert!(store.is_empty());
    }

    #[test]
    fn parse_skips_header_and_bad_rows() {
        let contents = "Username,Password\r\nangler,00ff\r\n\nno-separator\nangler,second\n,empty\n";
        let accounts = parse_accounts(contents);

        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts["angler"].encoded_password(), "00ff");
    }

    #[test]
    fn parse_finds_header_after_bom_and_blank_lines() {
        let contents = "\u{feff}\r\n\nUsername,Password\nangler,00ff\nUsername,Password\n";
        let accounts = parse_accounts(contents);

        assert_eq!(
            accounts.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["Username", "angler"]
        );
        assert_eq!(accounts["Username"].encoded_password(), "Password");
        assert!(parse_accounts("\u{feff}Username,Password\n").is_empty());
    }

    #[test]
    fn register_after_unterminated_header() {
        let dir = TempDir::new().unwrap();
        let path = test_store_path(&dir);
        fs::write(&path, CREDENTIALS_HEADER).unwrap();

        let mut store = CredentialStore::open(&path).unwrap();
        store.register("angler", "fishy").unwrap();
        assert!(store.verify("angler", "fishy"));

        let reopened = CredentialStore::open(&path).unwrap();
        assert_eq!(reopened.usernames().collect::<Vec<_>>(), vec!["angler"]);
        assert!(reopened.verify("angler", "fishy"));
    }

    #[test]
    fn register_sees_rows_written_elsewhere() {
        let dir = TempDir::new().unwrap();
        let path = test_store_path(&dir);
        let mut store = CredentialStore::open(&path).unwrap();

        let outsider = Account::new("outsider", "pw");
        filesystem::append_line(&path, &outsider.to_row()).unwrap();

        assert_eq!(
            store.register("outsider", "other"),
            Err(Error::DuplicateUserError(String::from("outsider")))
        );
        assert!(store.verify("outsider", "pw"));
    }
}
