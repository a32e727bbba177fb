use clap::{Parser, Subcommand};

use self::{default_config::DefaultConfigArg, demo::DemoArg, train::TrainArg};

mod default_config;
mod demo;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve tic-tac-toe players by tournament selection
    Train(#[clap(flatten)] TrainArg),
    /// Print the default configuration file
    DefaultConfig(#[clap(flatten)] DefaultConfigArg),
    /// Play one match between two freshly initialized networks
    Demo(#[clap(flatten)] DemoArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::DefaultConfig(arg) => default_config::run(&arg)?,
        Mode::Demo(arg) => demo::run(&arg)?,
    }
    Ok(())
}
