//! The `reeldice` command-line game.
use clap::Parser;
use color_eyre::eyre;

use reeldice::{cli::arg_matcher::match_args, cli::arg_parser::Cli, config::Config, utils};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();
    let config = Config::load()?;
    let data_dir = utils::data_dir()?;
    utils::init_logging(&data_dir, &config.logging.level)?;
    match_args(args, &config, &data_dir)
}
