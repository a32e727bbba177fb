//! Network checkpoint files.
//!
//! No file format is defined yet, so both directions refuse loudly instead of
//! pretending to succeed.

use std::path::{Path, PathBuf};

use xoevo_nn::Network;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CheckpointError {
    #[display("network checkpoints are not supported: {}", path.display())]
    Unsupported { path: PathBuf },
}

pub fn save_network(path: &Path, _network: &Network) -> Result<(), CheckpointError> {
    Err(CheckpointError::Unsupported {
        path: path.to_owned(),
    })
}

pub fn load_network(path: &Path) -> Result<Network, CheckpointError> {
    Err(CheckpointError::Unsupported {
        path: path.to_owned(),
    })
}
