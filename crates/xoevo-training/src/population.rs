use rand::Rng;
use rayon::prelude::*;
use xoevo_nn::{MutationPolicy, Network};

/// A fixed-size, ordered collection of networks.
///
/// The population never grows or shrinks; slots are only overwritten.
#[derive(Debug, Clone)]
pub struct Population {
    pub(crate) networks: Vec<Network>,
}

impl Population {
    /// Creates `size` independent copies of `base`, each mutated once with `policy`.
    ///
    /// `base` itself is left untouched.
    pub fn seeded<R>(base: &Network, size: usize, rng: &mut R, policy: &MutationPolicy) -> Self
    where
        R: Rng + ?Sized,
    {
        let networks = crate::task_rngs(rng, size)
            .into_par_iter()
            .map(|mut rng| {
                let mut network = base.clone();
                network.mutate(&mut rng, policy);
                network
            })
            .collect();
        Self { networks }
    }

    #[must_use]
    pub fn from_networks(networks: Vec<Network>) -> Self {
        Self { networks }
    }

    #[must_use]
    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Returns the first-ranked network.
    #[must_use]
    pub fn best(&self) -> Option<&Network> {
        self.networks.first()
    }

    pub fn reset_fitness(&mut self) {
        for network in &mut self.networks {
            network.reset_fitness();
        }
    }

    /// Sorts by descending fitness. Ties keep their current order.
    pub fn sort_by_fitness(&mut self) {
        self.networks
            .sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
    }

    #[must_use]
    pub fn is_sorted_by_fitness(&self) -> bool {
        self.networks
            .is_sorted_by(|a, b| a.fitness().total_cmp(&b.fitness()).is_ge())
    }

    /// Counts networks whose fitness is strictly above `threshold`.
    #[must_use]
    pub fn count_fit(&self, threshold: f64) -> usize {
        self.networks
            .iter()
            .filter(|network| network.fitness() > threshold)
            .count()
    }

    /// Returns the fitness of the first `count` networks.
    #[must_use]
    pub fn top_fitness(&self, count: usize) -> Vec<f64> {
        self.networks
            .iter()
            .take(count)
            .map(Network::fitness)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;
    use xoevo_nn::{Activation, NetworkShape};

    use super::*;

    fn base(rng: &mut Pcg32) -> Network {
        let shape = NetworkShape::new(3, 2, vec![4]);
        Network::random(rng, &shape, Activation::Tanh.function()).unwrap()
    }

    fn parameters(network: &Network) -> Vec<f64> {
        network.parameters().collect()
    }

    #[test]
    fn test_seeded_copies_are_independent() {
        let mut rng = Pcg32::seed_from_u64(11);
        let base = base(&mut rng);
        let before = parameters(&base);
        let population =
            Population::seeded(&base, 8, &mut rng, &MutationPolicy::unconditional(1.0));

        assert_eq!(population.len(), 8);
        assert_eq!(parameters(&base), before);
        for (i, a) in population.networks().iter().enumerate() {
            assert_ne!(parameters(a), before);
            for b in &population.networks()[i + 1..] {
                assert_ne!(parameters(a), parameters(b));
            }
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let build = || {
            let mut rng = Pcg32::seed_from_u64(12);
            let base = base(&mut rng);
            Population::seeded(&base, 16, &mut rng, &MutationPolicy::unconditional(0.5))
        };
        let a = build();
        let b = build();
        for (x, y) in a.networks().iter().zip(b.networks()) {
            assert_eq!(parameters(x), parameters(y));
        }
    }

    #[test]
    fn test_sort_and_count() {
        let mut rng = Pcg32::seed_from_u64(13);
        let base = base(&mut rng);
        let mut population =
            Population::seeded(&base, 5, &mut rng, &MutationPolicy::unconditional(0.0));
        for (network, fitness) in population
            .networks
            .iter_mut()
            .zip([0.05, 0.3, -1.0, 0.3, 0.1])
        {
            network.add_fitness(fitness);
        }
        assert!(!population.is_sorted_by_fitness());
        population.sort_by_fitness();
        assert!(population.is_sorted_by_fitness());
        assert_eq!(population.top_fitness(10), [0.3, 0.3, 0.1, 0.05, -1.0]);
        assert_eq!(population.count_fit(0.1), 2);
        assert_eq!(population.best().map(Network::fitness), Some(0.3));

        population.reset_fitness();
        assert_eq!(population.top_fitness(2), [0.0, 0.0]);
    }
}
