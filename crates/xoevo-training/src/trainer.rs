use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64;
use xoevo_arena::{FitnessEnvironment, MatchResult};
use xoevo_nn::{MutationPolicy, Network, NetworkShape, ShapeError};

use crate::{
    ConfigError, MutationSchedule, Population, SelectionSummary, Tournament, TournamentSummary,
    TrainingConfig,
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TrainerError {
    #[display("invalid configuration: {_0}")]
    Config(ConfigError),
    #[display("network does not fit the environment: {_0}")]
    Shape(ShapeError),
}

/// Spread of fitness values in a population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl FitnessSummary {
    /// Returns `None` for an empty dataset.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        let min = *values.first()?;
        let max = *values.last()?;
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let median = values[values.len() / 2];
        Some(Self {
            min,
            max,
            mean,
            median,
        })
    }
}

/// What happened during one generation.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub generation: usize,
    pub tournament: TournamentSummary,
    pub selection: SelectionSummary,
    /// Mutation chance used for reproduction.
    pub chance: f64,
    /// Mutation amplitude used for reproduction.
    pub amplitude: f64,
    /// Fitness spread after the tournament, before reproduction.
    pub fitness: FitnessSummary,
    /// Best fitness values after the tournament, best first.
    pub top_fitness: Vec<f64>,
}

/// The whole mutable state of a training run.
///
/// A trainer owns the population, the mutation schedule, the master RNG and
/// the generation counter. There is no global state: two trainers with the
/// same configuration and seed evolve identically.
#[derive(Debug)]
pub struct Trainer {
    config: TrainingConfig,
    tournament: Tournament,
    population: Population,
    schedule: MutationSchedule,
    rng: Pcg64,
    seed: u64,
    generation: usize,
}

impl Trainer {
    /// Creates a trainer with a random base network sized for `env`.
    pub fn new<E>(config: TrainingConfig, env: &E) -> Result<Self, TrainerError>
    where
        E: FitnessEnvironment + ?Sized,
    {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = Pcg64::seed_from_u64(seed);
        let shape = NetworkShape::new(
            env.state_vector_size(),
            env.action_space_size(),
            config.hidden_layers.clone(),
        );
        let base = Network::random(&mut rng, &shape, config.activation.function())?;
        Self::build(config, env, base, rng, seed)
    }

    /// Creates a trainer whose population descends from `base`.
    pub fn with_base<E>(
        config: TrainingConfig,
        env: &E,
        base: &Network,
    ) -> Result<Self, TrainerError>
    where
        E: FitnessEnvironment + ?Sized,
    {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let rng = Pcg64::seed_from_u64(seed);
        Self::build(config, env, base.clone(), rng, seed)
    }

    fn build<E>(
        config: TrainingConfig,
        env: &E,
        base: Network,
        mut rng: Pcg64,
        seed: u64,
    ) -> Result<Self, TrainerError>
    where
        E: FitnessEnvironment + ?Sized,
    {
        env.check_agent(&base)?;
        let population = Population::seeded(
            &base,
            config.population_size,
            &mut rng,
            &MutationPolicy::unconditional(config.initial_amplitude),
        );
        log::debug!(
            "seeded {} networks of shape {:?} (seed {seed})",
            population.len(),
            base.shape()
        );
        Ok(Self {
            tournament: Tournament::new(config.rounds),
            schedule: config.schedule,
            config,
            population,
            rng,
            seed,
            generation: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn schedule(&self) -> &MutationSchedule {
        &self.schedule
    }

    /// Seed of the master RNG, either configured or drawn at construction.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of generations completed so far.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Runs one generation: tournament, annealing, then reproduction.
    pub fn step<E>(&mut self, env: &E) -> GenerationReport
    where
        E: FitnessEnvironment + ?Sized,
    {
        let tournament = self.tournament.run(&mut self.population, env);
        let fitness = self.fitness_summary();
        let top_fitness = self.population.top_fitness(self.config.leaderboard_size);

        if self.schedule.advance(self.generation) {
            log::info!(
                "generation {}: mutation chance {:.4}, amplitude {:.4}",
                self.generation,
                self.schedule.chance,
                self.schedule.amplitude
            );
        }
        let selection = self.config.selection.reproduce(
            &mut self.population,
            &self.schedule.policy(),
            &mut self.rng,
        );

        let report = GenerationReport {
            generation: self.generation,
            tournament,
            selection,
            chance: self.schedule.chance,
            amplitude: self.schedule.amplitude,
            fitness,
            top_fitness,
        };
        self.generation += 1;
        report
    }

    /// Plays a tournament without reproduction and returns the ranked fitness values.
    ///
    /// Afterwards the population is sorted, best first.
    pub fn final_ranking<E>(&mut self, env: &E) -> Vec<f64>
    where
        E: FitnessEnvironment + ?Sized,
    {
        self.tournament.run(&mut self.population, env);
        self.population.top_fitness(self.config.leaderboard_size)
    }

    /// Plays the first two networks against each other on copies.
    ///
    /// The population's fitness is not affected.
    pub fn demo_match<E>(&self, env: &E) -> Result<MatchResult, ShapeError>
    where
        E: FitnessEnvironment + ?Sized,
    {
        let [first, second, ..] = self.population.networks() else {
            unreachable!("population has at least two networks");
        };
        env.play_match(&mut first.clone(), &mut second.clone())
    }

    fn fitness_summary(&self) -> FitnessSummary {
        FitnessSummary::new(self.population.networks().iter().map(Network::fitness))
            .unwrap_or(FitnessSummary {
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                median: 0.0,
            })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use xoevo_arena::TicTacToe;
    use xoevo_nn::Activation;

    use super::*;
    use crate::Selection;

    fn small_config(seed: u64) -> TrainingConfig {
        TrainingConfig {
            population_size: 40,
            rounds: 3,
            hidden_layers: vec![6],
            seed: Some(seed),
            selection: Selection {
                elite_divisor: 5,
                ..Selection::default()
            },
            ..TrainingConfig::default()
        }
    }

    fn parameters(trainer: &Trainer) -> Vec<Vec<u64>> {
        trainer
            .population()
            .networks()
            .iter()
            .map(|n| n.parameters().map(f64::to_bits).collect())
            .collect()
    }

    #[test]
    fn test_step_keeps_population_size() {
        let env = TicTacToe::default();
        let mut trainer = Trainer::new(small_config(1), &env).unwrap();
        for generation in 0..3 {
            let report = trainer.step(&env);
            assert_eq!(report.generation, generation);
            assert_eq!(report.tournament.matches, 3 * 39);
            assert_eq!(report.tournament.aborted, 0);
            assert_eq!(
                report.selection.elite_count + report.selection.replaced,
                40
            );
            assert!(report.top_fitness.len() <= 10);
            assert!(report.top_fitness.is_sorted_by(|a, b| a >= b));
            assert_eq!(trainer.population().len(), 40);
        }
        assert_eq!(trainer.generation(), 3);
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let env = TicTacToe::default();
        let mut a = Trainer::new(small_config(7), &env).unwrap();
        let mut b = Trainer::new(small_config(7), &env).unwrap();
        for _ in 0..2 {
            let ra = a.step(&env);
            let rb = b.step(&env);
            assert_eq!(ra.top_fitness, rb.top_fitness);
        }
        assert_eq!(parameters(&a), parameters(&b));
        assert_eq!(a.seed(), 7);
    }

    #[test]
    fn test_schedule_decays() {
        let env = TicTacToe::default();
        let mut config = small_config(3);
        config.schedule.decay_interval = 2;
        let mut trainer = Trainer::new(config, &env).unwrap();
        let reports = (0..3).map(|_| trainer.step(&env)).collect::<Vec<_>>();
        assert_eq!(reports[0].amplitude, 0.25);
        assert_eq!(reports[1].amplitude, 0.25);
        assert_eq!(reports[2].amplitude, 0.125);
        assert_eq!(reports[2].chance, 0.5);
    }

    #[test]
    fn test_final_ranking_and_demo() {
        let env = TicTacToe::default();
        let mut trainer = Trainer::new(small_config(5), &env).unwrap();
        trainer.step(&env);
        let ranking = trainer.final_ranking(&env);
        assert_eq!(ranking.len(), 10);
        assert!(trainer.population().is_sorted_by_fitness());

        let before = trainer.population().top_fitness(2);
        let demo = trainer.demo_match(&env).unwrap();
        assert!(!demo.log.moves().is_empty());
        assert_eq!(trainer.population().top_fitness(2), before);
    }

    #[test]
    fn test_invalid_config() {
        let env = TicTacToe::default();
        let config = TrainingConfig {
            population_size: 1,
            ..TrainingConfig::default()
        };
        assert!(matches!(
            Trainer::new(config, &env),
            Err(TrainerError::Config(ConfigError::PopulationTooSmall { size: 1 }))
        ));
    }

    #[test]
    fn test_base_must_fit_environment() {
        let env = TicTacToe::default();
        let mut rng = Pcg64::seed_from_u64(0);
        let shape = NetworkShape::new(4, 9, vec![]);
        let base = Network::random(&mut rng, &shape, Activation::Tanh.function()).unwrap();
        assert!(matches!(
            Trainer::with_base(small_config(0), &env, &base),
            Err(TrainerError::Shape(_))
        ));
    }

    #[test]
    fn test_fitness_summary() {
        let summary = FitnessSummary::new([0.5, -1.0, 2.0, 0.5]).unwrap();
        assert_eq!(summary.min, -1.0);
        assert_eq!(summary.max, 2.0);
        assert_eq!(summary.mean, 0.5);
        assert_eq!(summary.median, 0.5);
        assert!(FitnessSummary::new([]).is_none());
    }
}
