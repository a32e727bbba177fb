use xoevo_nn::Activation;

use crate::{MutationSchedule, Selection};

/// Every tunable parameter of a training run.
///
/// Missing fields take their default when deserialized, so a configuration
/// file only needs the values it changes.
///
/// ```
/// use xoevo_training::TrainingConfig;
///
/// let config: TrainingConfig =
///     serde_json::from_str(r#"{ "population_size": 500, "schedule": { "decay_interval": 100 } }"#)
///         .unwrap();
/// assert_eq!(config.population_size, 500);
/// assert_eq!(config.schedule.decay_interval, 100);
/// assert_eq!(config.rounds, 30);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub population_size: usize,
    /// Tournament rounds per generation.
    pub rounds: usize,
    pub hidden_layers: Vec<usize>,
    pub activation: Activation,
    /// Seed of the master RNG. A random seed is drawn when absent.
    pub seed: Option<u64>,
    /// Amplitude of the unconditional jitter used to seed the population.
    pub initial_amplitude: f64,
    pub selection: Selection,
    pub schedule: MutationSchedule,
    /// Generations between progress reports.
    pub report_interval: usize,
    /// Number of fitness values listed in reports.
    pub leaderboard_size: usize,
    /// Stop after this many generations. Runs until interrupted when absent.
    pub max_generations: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            population_size: 10_000,
            rounds: 30,
            hidden_layers: vec![36, 18],
            activation: Activation::Tanh,
            seed: None,
            initial_amplitude: 1.0,
            selection: Selection::default(),
            schedule: MutationSchedule::default(),
            report_interval: 10,
            leaderboard_size: 10,
            max_generations: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be at least 2, got {size}")]
    PopulationTooSmall { size: usize },
    #[display("at least one tournament round is required")]
    NoRounds,
    #[display("hidden layer {index} has no neurons")]
    EmptyHiddenLayer { index: usize },
    #[display("elite divisor must be positive")]
    ZeroEliteDivisor,
    #[display("mutation decay interval must be positive")]
    ZeroDecayInterval,
    #[display("report interval must be positive")]
    ZeroReportInterval,
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall {
                size: self.population_size,
            });
        }
        if self.rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        if let Some(index) = self.hidden_layers.iter().position(|&size| size == 0) {
            return Err(ConfigError::EmptyHiddenLayer { index });
        }
        if self.selection.elite_divisor == 0 {
            return Err(ConfigError::ZeroEliteDivisor);
        }
        if self.schedule.decay_interval == 0 {
            return Err(ConfigError::ZeroDecayInterval);
        }
        if self.report_interval == 0 {
            return Err(ConfigError::ZeroReportInterval);
        }
        Ok(())
    }
}
