//! Parse command-line arguments for `reeldice`.
use clap::{Parser, Subcommand};

use crate::utils;

/// The command-line interface argument parser.
#[derive(Parser, Debug)]
#[command(name = "reeldice")]
#[command(version = utils::info())]
#[command(about = "Roll the dice, land a fish, beat your high score.")]
pub struct Cli {
    /// All the possible commands the user can give `reeldice`.
    #[command(subcommand)]
    pub command: Command,
}

/// All the possible commands the user can give `reeldice`.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new account.
    #[command(alias = "r")]
    Register {
        /// Account username.
        username: String,
    },
    /// Log in and go fishing.
    #[command(alias = "p")]
    Play {
        /// Account username.
        username: String,
        /// Seed the die for a reproducible session.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show the high-score table.
    #[command(alias = "s")]
    #[command(alias = "leaderboard")]
    Scores,
}
