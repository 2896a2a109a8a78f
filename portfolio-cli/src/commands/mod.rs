use clap::Subcommand;

mod avatar;
mod serve;

#[derive(Debug, Subcommand)]
pub enum Commands {
    Serve(serve::Serve),
    Avatar(avatar::Avatar),
}
