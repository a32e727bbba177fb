//! Mutation policies for network parameters.
//!
//! A [`MutationPolicy`] is a small value describing how a single weight or bias
//! is perturbed. It is interpreted by [`Network::mutate`](crate::Network::mutate)
//! for every parameter, so it can be copied freely into parallel tasks.
//!
//! # Jitter
//!
//! Both policies use the same additive jitter:
//!
//! ```text
//! value' = value + (u - 0.5) * 2 * amplitude     where u ~ U[0, 1)
//! ```
//!
//! - **Unconditional** - every parameter receives jitter
//! - **Probabilistic** - a parameter receives jitter with probability `chance`,
//!   otherwise it is left untouched
//!
//! An amplitude of `0.0` makes the jitter term exactly zero.

use rand::Rng;

/// How a policy decides whether to perturb a parameter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Unconditional,
    Probabilistic,
}

/// Per-parameter mutation rule.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MutationPolicy {
    pub kind: MutationKind,
    /// Maximum absolute jitter added to a parameter.
    pub amplitude: f64,
    /// Probability of mutating a parameter. Ignored by unconditional policies.
    pub chance: f64,
}

impl MutationPolicy {
    /// Jitters every parameter by up to `amplitude`.
    #[must_use]
    pub const fn unconditional(amplitude: f64) -> Self {
        Self {
            kind: MutationKind::Unconditional,
            amplitude,
            chance: 1.0,
        }
    }

    /// Jitters each parameter by up to `amplitude` with probability `chance`.
    #[must_use]
    pub const fn probabilistic(chance: f64, amplitude: f64) -> Self {
        Self {
            kind: MutationKind::Probabilistic,
            amplitude,
            chance,
        }
    }

    /// Returns a policy with both chance and amplitude multiplied by `multiplier`.
    ///
    /// Used to mutate offspring of strong parents more gently than offspring
    /// of weak ones.
    #[must_use]
    pub fn scaled(self, multiplier: f64) -> Self {
        Self {
            amplitude: self.amplitude * multiplier,
            chance: self.chance * multiplier,
            ..self
        }
    }

    /// Returns the mutated version of `value`.
    pub fn apply<R>(&self, rng: &mut R, value: f64) -> f64
    where
        R: Rng + ?Sized,
    {
        match self.kind {
            MutationKind::Unconditional => value + jitter(rng, self.amplitude),
            MutationKind::Probabilistic => {
                // strict comparison: chance 0 must never mutate
                if rng.random::<f64>() < self.chance {
                    value + jitter(rng, self.amplitude)
                } else {
                    value
                }
            }
        }
    }
}

fn jitter<R>(rng: &mut R, amplitude: f64) -> f64
where
    R: Rng + ?Sized,
{
    (rng.random::<f64>() - 0.5) * 2.0 * amplitude
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_zero_amplitude_keeps_value() {
        let mut rng = Pcg32::seed_from_u64(1);
        let policy = MutationPolicy::probabilistic(1.0, 0.0);
        for value in [-3.5, 0.0, 0.25, 42.0] {
            assert_eq!(policy.apply(&mut rng, value), value);
        }
        let policy = MutationPolicy::unconditional(0.0);
        assert_eq!(policy.apply(&mut rng, 0.75), 0.75);
    }

    #[test]
    fn test_zero_chance_keeps_value() {
        let mut rng = Pcg32::seed_from_u64(2);
        let policy = MutationPolicy::probabilistic(0.0, 10.0);
        for _ in 0..1000 {
            assert_eq!(policy.apply(&mut rng, 0.5), 0.5);
        }
    }

    #[test]
    fn test_jitter_is_bounded_by_amplitude() {
        let mut rng = Pcg32::seed_from_u64(3);
        let policy = MutationPolicy::unconditional(0.25);
        for _ in 0..1000 {
            let mutated = policy.apply(&mut rng, 1.0);
            assert!((0.75..=1.25).contains(&mutated), "got {mutated}");
        }
    }

    #[test]
    fn test_scaled() {
        let policy = MutationPolicy::probabilistic(1.0, 0.25).scaled(0.5);
        assert_eq!(policy.kind, MutationKind::Probabilistic);
        assert_eq!(policy.chance, 0.5);
        assert_eq!(policy.amplitude, 0.125);
    }
}
