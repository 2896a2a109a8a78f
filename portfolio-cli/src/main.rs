use clap::Parser;

use crate::cli::Cli;
use crate::commands::Commands;
pub use crate::error::AppError;

mod cli;
mod commands;
mod error;

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = Cli::parse();

    let result = match &args.command {
        Commands::Serve(serve) => serve.run().await,
        Commands::Avatar(avatar) => avatar.run().await,
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
