use std::path::PathBuf;

use crate::{model::config::ConfigFile, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DefaultConfigArg {
    /// Output file path
    #[arg(long, short)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DefaultConfigArg) -> anyhow::Result<()> {
    Output::save_json(&ConfigFile::default(), arg.output.clone())
}
