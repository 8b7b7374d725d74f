//! Modules utilised by `reeldice`: a dice-based fishing game with salted-password accounts and a
//! persisted high-score table.
#![warn(missing_docs)]

/// Backend code for `reeldice`.
pub mod backend;
/// Command line argument parsing.
pub mod cli;
/// User configuration.
pub mod config;
/// `reeldice`-specific errors.
pub mod error;
/// Username validation.
pub mod input_validation;
/// General utilities.
pub mod utils;
