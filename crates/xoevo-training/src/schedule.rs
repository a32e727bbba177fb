use xoevo_nn::MutationPolicy;

/// Global mutation parameters, annealed over the generations.
///
/// Every `decay_interval` generations both `chance` and `amplitude` are
/// multiplied by `decay_factor`, so the search takes smaller steps as
/// training goes on.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MutationSchedule {
    pub chance: f64,
    pub amplitude: f64,
    pub decay_interval: usize,
    pub decay_factor: f64,
}

impl Default for MutationSchedule {
    fn default() -> Self {
        Self {
            chance: 1.0,
            amplitude: 0.25,
            decay_interval: 2500,
            decay_factor: 0.5,
        }
    }
}

impl MutationSchedule {
    /// Returns the probabilistic policy for the current parameters.
    #[must_use]
    pub fn policy(&self) -> MutationPolicy {
        MutationPolicy::probabilistic(self.chance, self.amplitude)
    }

    /// Applies the decay due at `generation`. Returns `true` if it decayed.
    ///
    /// Generation 0 never decays.
    pub fn advance(&mut self, generation: usize) -> bool {
        if generation == 0 || generation % self.decay_interval != 0 {
            return false;
        }
        self.chance *= self.decay_factor;
        self.amplitude *= self.decay_factor;
        true
    }
}
