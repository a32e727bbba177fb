use std::time::{Duration, Instant};

use rayon::prelude::*;
use xoevo_arena::FitnessEnvironment;
use xoevo_nn::Network;

use crate::Population;

/// Plays a generation's worth of matches and ranks the population.
///
/// Each round pairs every network with its neighbour in the current ranking,
/// `N - 1` matches for a population of `N`, then re-sorts by descending
/// fitness. Later rounds therefore match networks of similar strength.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Tournament {
    pub rounds: usize,
}

/// Counters of one tournament.
#[derive(Debug, Clone, Copy, Default)]
pub struct TournamentSummary {
    pub matches: usize,
    /// Matches aborted because an agent did not fit the environment.
    pub aborted: usize,
    pub elapsed: Duration,
}

impl Tournament {
    #[must_use]
    pub const fn new(rounds: usize) -> Self {
        Self { rounds }
    }

    /// Resets fitness, plays all rounds and leaves the population sorted.
    pub fn run<E>(&self, population: &mut Population, env: &E) -> TournamentSummary
    where
        E: FitnessEnvironment + ?Sized,
    {
        let start = Instant::now();
        let mut summary = TournamentSummary::default();
        population.reset_fitness();

        for round in 0..self.rounds {
            // Two phases keep every network in at most one running match:
            // (0,1) (2,3) ... then (1,2) (3,4) ...
            for offset in [0, 1] {
                if let Some(networks) = population.networks.get_mut(offset..) {
                    let (matches, aborted) = play_pairs(networks, env);
                    summary.matches += matches;
                    summary.aborted += aborted;
                }
            }
            population.sort_by_fitness();
            log::debug!(
                "round {round}: best fitness {:.3}",
                population.best().map_or(0.0, Network::fitness)
            );
        }

        summary.elapsed = start.elapsed();
        summary
    }
}

/// Plays `networks[0]` vs `networks[1]`, `networks[2]` vs `networks[3]`, ... in parallel.
///
/// Returns the number of matches played and aborted.
fn play_pairs<E>(networks: &mut [Network], env: &E) -> (usize, usize)
where
    E: FitnessEnvironment + ?Sized,
{
    networks
        .par_chunks_exact_mut(2)
        .map(|pair| {
            let [a, b] = pair else {
                unreachable!("chunks have exactly two networks")
            };
            match env.play_match(a, b) {
                Ok(result) => {
                    result.apply(a, b);
                    (1, 0)
                }
                Err(e) => {
                    log::warn!("match aborted: {e}");
                    (1, 1)
                }
            }
        })
        .reduce(|| (0, 0), |x, y| (x.0 + y.0, x.1 + y.1))
}
