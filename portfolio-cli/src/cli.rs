use crate::commands::Commands;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "portfolio-cli")]
#[clap(about = "Run the portfolio backend and inspect Discord avatars", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
