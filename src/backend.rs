//! All backend functionality.
mod account;
mod credential_store;
mod filesystem;
mod hashing;
mod round;
mod score_store;
mod session;
mod tables;

// Re-imports.
pub use account::Account;
pub use credential_store::{ensure_store, CredentialStore, CREDENTIALS_HEADER};
pub use hashing::hashed::{
    constant_time_eq, Hash, Hashed, IntoHashed, PasswordHash, Salt, KEY_LEN, SALT_LEN,
};
pub use round::{DecisionProvider, RoundDraw, RoundEngine, RoundResult, DICE_FACES};
pub use score_store::{MergeOutcome, ScoreStore};
pub use session::Session;
pub use tables::{is_auto_keep, FishInfo, LookupTables, AUTO_KEEP_CATCHES, UNKNOWN_CATCH};
