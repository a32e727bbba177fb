//! Evolutionary training of networks through self-play.
//!
//! This crate evolves a fixed-size population of [`Network`](xoevo_nn::Network)s
//! with a mutation-only genetic algorithm. Fitness comes from matches played
//! in a [`FitnessEnvironment`](xoevo_arena::FitnessEnvironment).
//!
//! # How Training Works
//!
//! 1. **Seeding** - One random base network is cloned and mutated into the
//!    initial population ([`Population::seeded`])
//! 2. **Tournament** - Fitness is reset, then several rounds of matches are
//!    played between neighbours in the ranking ([`Tournament`])
//! 3. **Selection** - The strongest networks are kept unchanged as the elite
//!    ([`Selection`])
//! 4. **Reproduction** - Every other slot is overwritten with a mutated clone
//!    of an elite network; strong donors get gentler mutation
//! 5. **Annealing** - The mutation chance and amplitude shrink over time
//!    ([`MutationSchedule`])
//! 6. **Repeat** - [`Trainer::step`] runs steps 2-5 once per generation
//!
//! # Architecture
//!
//! ```text
//! Trainer (generation counter, master RNG, schedule)
//!     ├── Tournament ──plays──> FitnessEnvironment
//!     ├── Selection  ──clones and mutates──> Population
//!     └── MutationSchedule
//! ```
//!
//! There is no crossover anywhere: offspring are always clones of a single
//! elite donor.
//!
//! # Parallelism
//!
//! Matches and reproduction run on the rayon thread pool. Each phase joins
//! before the next starts, so sorting and selection always observe finished
//! fitness values. Tasks never share a network:
//!
//! - Matches of a round are played in two phases, pairs starting at even
//!   indices and then pairs starting at odd indices. Within a phase the pairs
//!   are disjoint slices of the population.
//! - Reproduction splits the population into an immutable elite prefix and
//!   the mutable remainder.
//!
//! Every task gets its own RNG seeded from the trainer's master RNG, so a
//! seeded run gives the same result regardless of thread scheduling.
//!
//! # Example
//!
//! ```rust,no_run
//! use xoevo_arena::TicTacToe;
//! use xoevo_training::{Trainer, TrainingConfig};
//!
//! let env = TicTacToe::default();
//! let config = TrainingConfig {
//!     population_size: 100,
//!     seed: Some(1),
//!     ..TrainingConfig::default()
//! };
//! let mut trainer = Trainer::new(config, &env).unwrap();
//! for _ in 0..10 {
//!     let report = trainer.step(&env);
//!     println!("{}: best {:?}", report.generation, report.top_fitness.first());
//! }
//! ```

pub use self::{config::*, population::*, schedule::*, selection::*, tournament::*, trainer::*};

mod config;
mod population;
mod schedule;
mod selection;
mod tournament;
mod trainer;

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;

/// Draws one independent RNG per parallel task from `rng`.
fn task_rngs<R>(rng: &mut R, count: usize) -> Vec<Pcg32>
where
    R: Rng + ?Sized,
{
    (0..count)
        .map(|_| Pcg32::seed_from_u64(rng.random()))
        .collect()
}
