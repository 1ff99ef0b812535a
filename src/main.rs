//! bkptlist - edit Xcode breakpoint lists from the command line
//!
//! Entries the tool does not understand are preserved on every write.

use bkptlist::common::{config::Config, logging};
use bkptlist::{cli, commands::Commands};
use clap::Parser;

#[derive(Parser)]
#[command(name = "bkptlist", about = "Edit Xcode breakpoint lists without losing entries")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    let result = Config::load().and_then(|config| cli::dispatch(cli.command, &config));

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
