//! Route arguments to different functions.
use camino::Utf8Path;
use color_eyre::eyre;

use super::{
    arg_parser::{Cli, Command},
    processes::*,
};
use crate::config::Config;

/// This statement matches the CLI arguments with its proper functionality in `processes`.
pub fn match_args(args: Cli, config: &Config, data_dir: &Utf8Path) -> eyre::Result<()> {
    match args.command {
        Command::Register { username } => new_account(config, data_dir, username),
        Command::Play { username, seed } => play(config, data_dir, username, seed),
        Command::Scores => show_scores(config, data_dir),
    }
}
