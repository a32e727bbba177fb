use xoevo_arena::RewardTable;
use xoevo_training::TrainingConfig;

/// Contents of a configuration file.
///
/// Both sections are optional; missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub training: TrainingConfig,
    pub rewards: RewardTable,
}
