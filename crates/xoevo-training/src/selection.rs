use std::time::{Duration, Instant};

use rand::Rng;
use rayon::prelude::*;
use xoevo_nn::MutationPolicy;

use crate::Population;

/// Elitist selection with inverse-fitness-scaled mutation.
///
/// After a tournament the population is split in two:
///
/// - **Elite** - the first `max(1, fit_count / elite_divisor)` networks, where
///   `fit_count` is the number of networks with fitness above
///   `fit_threshold`. Elite networks survive unchanged.
/// - **Offspring** - every other slot `i` is overwritten by a clone of elite
///   network `(i - elite_count) % elite_count`, mutated with the generation's
///   policy scaled by `1 / donor_fitness`. Strong donors produce offspring
///   close to themselves; weak donors produce more varied offspring.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Selection {
    pub fit_threshold: f64,
    pub elite_divisor: usize,
    /// Donor fitness is raised to this value before inverting it.
    pub min_donor_fitness: f64,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            fit_threshold: 0.1,
            elite_divisor: 50,
            min_donor_fitness: 0.01,
        }
    }
}

/// Counters of one reproduction phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionSummary {
    pub fit_count: usize,
    pub elite_count: usize,
    pub replaced: usize,
    pub elapsed: Duration,
}

impl Selection {
    /// Returns the elite size for `fit_count` fit networks out of `population_len`.
    #[must_use]
    pub fn elite_count(&self, fit_count: usize, population_len: usize) -> usize {
        (fit_count / self.elite_divisor).max(1).min(population_len)
    }

    /// Replaces every non-elite network with a mutated clone of an elite one.
    ///
    /// The population must be sorted by descending fitness.
    pub fn reproduce<R>(
        &self,
        population: &mut Population,
        policy: &MutationPolicy,
        rng: &mut R,
    ) -> SelectionSummary
    where
        R: Rng + ?Sized,
    {
        debug_assert!(population.is_sorted_by_fitness());
        let start = Instant::now();

        let fit_count = population.count_fit(self.fit_threshold);
        let elite_count = self.elite_count(fit_count, population.len());
        let (elite, offspring) = population.networks.split_at_mut(elite_count);
        let rngs = crate::task_rngs(rng, offspring.len());
        let replaced = offspring.len();

        offspring
            .par_iter_mut()
            .zip(rngs)
            .enumerate()
            .for_each(|(i, (slot, mut rng))| {
                let donor = &elite[i % elite_count];
                let multiplier = 1.0 / donor.fitness().max(self.min_donor_fitness);
                slot.clone_from(donor);
                slot.mutate(&mut rng, &policy.scaled(multiplier));
            });

        SelectionSummary {
            fit_count,
            elite_count,
            replaced,
            elapsed: start.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;
    use xoevo_nn::{Activation, Network, NetworkShape};

    use super::*;

    fn population(fitness: &[f64]) -> Population {
        let mut rng = Pcg32::seed_from_u64(31);
        let shape = NetworkShape::new(4, 2, vec![3]);
        let base = Network::random(&mut rng, &shape, Activation::Tanh.function()).unwrap();
        let mut population = Population::seeded(
            &base,
            fitness.len(),
            &mut rng,
            &MutationPolicy::unconditional(1.0),
        );
        for (network, &f) in population.networks.iter_mut().zip(fitness) {
            network.add_fitness(f);
        }
        population.sort_by_fitness();
        population
    }

    fn parameters(network: &Network) -> Vec<u64> {
        network.parameters().map(f64::to_bits).collect()
    }

    #[test]
    fn test_elite_count() {
        let selection = Selection::default();
        assert_eq!(selection.elite_count(0, 10_000), 1);
        assert_eq!(selection.elite_count(49, 10_000), 1);
        assert_eq!(selection.elite_count(100, 10_000), 2);
        assert_eq!(selection.elite_count(9_999, 10_000), 199);
        let selection = Selection {
            elite_divisor: 1,
            ..Selection::default()
        };
        assert_eq!(selection.elite_count(10, 4), 4);
    }

    #[test]
    fn test_elite_survives_unchanged() {
        let selection = Selection {
            elite_divisor: 2,
            ..Selection::default()
        };
        let mut population = population(&[1.0, 0.8, 0.5, 0.4, 0.05, 0.0, -0.2, 0.3]);
        let before = population.clone();
        let mut rng = Pcg32::seed_from_u64(32);

        let summary = selection.reproduce(
            &mut population,
            &MutationPolicy::probabilistic(1.0, 0.25),
            &mut rng,
        );
        assert_eq!(summary.fit_count, 5);
        assert_eq!(summary.elite_count, 2);
        assert_eq!(summary.replaced, 6);
        assert_eq!(population.len(), before.len());

        for (after, before) in population.networks()[..2].iter().zip(before.networks()) {
            assert_eq!(parameters(after), parameters(before));
            assert_eq!(after.fitness().to_bits(), before.fitness().to_bits());
        }
        for offspring in &population.networks()[2..] {
            for elite in &population.networks()[..2] {
                assert_ne!(parameters(offspring), parameters(elite));
            }
        }
    }

    #[test]
    fn test_offspring_cycle_through_donors() {
        let selection = Selection {
            elite_divisor: 1,
            fit_threshold: 0.5,
            ..Selection::default()
        };
        let mut population = population(&[2.0, 1.0, 0.9, 0.0, 0.0, 0.0, 0.0]);
        let donors = population.networks()[..3].to_vec();
        let mut rng = Pcg32::seed_from_u64(33);

        // zero amplitude: offspring are exact copies of their donors
        let summary = selection.reproduce(
            &mut population,
            &MutationPolicy::probabilistic(1.0, 0.0),
            &mut rng,
        );
        assert_eq!(summary.elite_count, 3);
        for (i, offspring) in population.networks()[3..].iter().enumerate() {
            assert_eq!(parameters(offspring), parameters(&donors[i % 3]));
        }
    }

    #[test]
    fn test_non_positive_donor_fitness_is_clamped() {
        let selection = Selection::default();
        let mut population = population(&[0.0, -1.0, -2.0]);
        let mut rng = Pcg32::seed_from_u64(34);
        selection.reproduce(
            &mut population,
            &MutationPolicy::probabilistic(0.5, 0.01),
            &mut rng,
        );
        assert!(
            population
                .networks()
                .iter()
                .all(|n| n.parameters().all(f64::is_finite))
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "is_sorted_by_fitness")]
    fn test_unsorted_population_is_rejected() {
        let mut population = population(&[1.0, 0.5, 0.0]);
        population.networks[2].add_fitness(2.0);
        let mut rng = Pcg32::seed_from_u64(35);
        Selection::default().reproduce(
            &mut population,
            &MutationPolicy::probabilistic(0.5, 0.01),
            &mut rng,
        );
    }
}
