//! Network representation, forward propagation and parameter mutation.

use std::iter;

use rand::Rng;

use crate::{ShapeError, activation::ActivationFunction, mutation::MutationPolicy};

/// A single connection weight towards one neuron of the next layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dendrite {
    weight: f64,
}

impl Dendrite {
    #[must_use]
    pub const fn new(weight: f64) -> Self {
        Self { weight }
    }

    #[must_use]
    pub const fn weight(self) -> f64 {
        self.weight
    }
}

impl From<f64> for Dendrite {
    fn from(weight: f64) -> Self {
        Self::new(weight)
    }
}

/// A neuron with its outgoing weights, its bias and its last computed value.
///
/// `dendrites[j]` connects this neuron to neuron `j` of the next layer. Neurons
/// of the output layer have no dendrites.
#[derive(Debug, Clone)]
pub struct Neuron {
    dendrites: Vec<Dendrite>,
    bias: f64,
    value: f64,
}

impl Neuron {
    /// Creates a neuron from explicit parameters.
    #[must_use]
    pub fn new<I>(weights: I, bias: f64) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self {
            dendrites: weights.into_iter().map(Dendrite::new).collect(),
            bias,
            value: 0.0,
        }
    }

    /// Creates a neuron with `dendrite_count` weights, bias and weights drawn from `U[0, 1)`.
    pub fn random<R>(rng: &mut R, dendrite_count: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        let bias = rng.random();
        let dendrites = iter::repeat_with(|| Dendrite::new(rng.random()))
            .take(dendrite_count)
            .collect();
        Self {
            dendrites,
            bias,
            value: 0.0,
        }
    }

    #[must_use]
    pub fn dendrites(&self) -> &[Dendrite] {
        &self.dendrites
    }

    #[must_use]
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Returns the value computed by the last forward pass.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    fn mutate<R>(&mut self, rng: &mut R, policy: &MutationPolicy)
    where
        R: Rng + ?Sized,
    {
        self.bias = policy.apply(rng, self.bias);
        for dendrite in &mut self.dendrites {
            dendrite.weight = policy.apply(rng, dendrite.weight);
        }
    }
}

/// An ordered, fixed-length group of neurons.
#[derive(Debug, Clone)]
pub struct Layer {
    neurons: Vec<Neuron>,
}

impl Layer {
    #[must_use]
    pub fn new(neurons: Vec<Neuron>) -> Self {
        Self { neurons }
    }

    fn random<R>(rng: &mut R, neuron_count: usize, dendrite_count: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        let neurons = iter::repeat_with(|| Neuron::random(rng, dendrite_count))
            .take(neuron_count)
            .collect();
        Self { neurons }
    }

    #[must_use]
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Computes the values of `next` from the values of this layer.
    fn feed(&self, next: &mut Layer, activation: &dyn ActivationFunction) {
        for (index, next_neuron) in next.neurons.iter_mut().enumerate() {
            let weighted_sum = self
                .neurons
                .iter()
                .map(|neuron| neuron.value * neuron.dendrites[index].weight)
                .sum::<f64>();
            next_neuron.value = activation.apply(weighted_sum + next_neuron.bias);
        }
    }
}

/// Layer sizes of a network.
///
/// The network has `hidden.len() + 2` layers: `inputs` neurons, then each
/// hidden size in order, then `outputs` neurons.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NetworkShape {
    pub inputs: usize,
    pub outputs: usize,
    pub hidden: Vec<usize>,
}

impl NetworkShape {
    #[must_use]
    pub fn new(inputs: usize, outputs: usize, hidden: Vec<usize>) -> Self {
        Self {
            inputs,
            outputs,
            hidden,
        }
    }

    /// Returns the neuron count of every layer, input layer first.
    pub fn layer_sizes(&self) -> impl Iterator<Item = usize> + '_ {
        iter::once(self.inputs)
            .chain(self.hidden.iter().copied())
            .chain(iter::once(self.outputs))
    }

    fn validate(&self) -> Result<(), ShapeError> {
        match self.layer_sizes().position(|size| size == 0) {
            Some(layer) => Err(ShapeError::EmptyLayer { layer }),
            None => Ok(()),
        }
    }
}

/// A dense feedforward network with a fitness accumulator.
///
/// Cloning a network deep-copies every weight and bias; only the (stateless)
/// activation function is shared.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    activation: &'static dyn ActivationFunction,
    fitness: f64,
}

impl Network {
    /// Creates a network with every weight and bias drawn from `U[0, 1)`.
    ///
    /// Parameters are drawn layer by layer, neuron by neuron, bias first.
    pub fn random<R>(
        rng: &mut R,
        shape: &NetworkShape,
        activation: &'static dyn ActivationFunction,
    ) -> Result<Self, ShapeError>
    where
        R: Rng + ?Sized,
    {
        shape.validate()?;
        let sizes = shape.layer_sizes().collect::<Vec<_>>();
        let layers = sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| {
                let dendrite_count = sizes.get(i + 1).copied().unwrap_or(0);
                Layer::random(rng, size, dendrite_count)
            })
            .collect();
        Ok(Self {
            layers,
            activation,
            fitness: 0.0,
        })
    }

    /// Creates a network from explicit layers.
    ///
    /// Every neuron of layer `i` must have exactly as many dendrites as layer
    /// `i + 1` has neurons, and neurons of the last layer must have none.
    pub fn from_layers(
        layers: Vec<Layer>,
        activation: &'static dyn ActivationFunction,
    ) -> Result<Self, ShapeError> {
        if layers.len() < 2 {
            return Err(ShapeError::TooFewLayers {
                count: layers.len(),
            });
        }
        for (layer_index, layer) in layers.iter().enumerate() {
            if layer.is_empty() {
                return Err(ShapeError::EmptyLayer { layer: layer_index });
            }
            let expected = layers.get(layer_index + 1).map_or(0, Layer::len);
            if let Some((neuron, n)) = layer
                .neurons
                .iter()
                .enumerate()
                .find(|(_, n)| n.dendrites.len() != expected)
            {
                return Err(ShapeError::Weights {
                    layer: layer_index,
                    neuron,
                    expected,
                    actual: n.dendrites.len(),
                });
            }
        }
        Ok(Self {
            layers,
            activation,
            fitness: 0.0,
        })
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[must_use]
    pub fn activation(&self) -> &'static dyn ActivationFunction {
        self.activation
    }

    #[must_use]
    pub fn input_size(&self) -> usize {
        self.layers[0].len()
    }

    #[must_use]
    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].len()
    }

    #[must_use]
    pub fn shape(&self) -> NetworkShape {
        let hidden = self.layers[1..self.layers.len() - 1]
            .iter()
            .map(Layer::len)
            .collect();
        NetworkShape::new(self.input_size(), self.output_size(), hidden)
    }

    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn reset_fitness(&mut self) {
        self.fitness = 0.0;
    }

    pub fn add_fitness(&mut self, delta: f64) {
        self.fitness += delta;
    }

    /// Iterates over every bias and weight, in the order [`Self::mutate`] visits them.
    pub fn parameters(&self) -> impl Iterator<Item = f64> + '_ {
        self.layers
            .iter()
            .flat_map(|layer| &layer.neurons)
            .flat_map(|neuron| {
                iter::once(neuron.bias).chain(neuron.dendrites.iter().map(|d| d.weight))
            })
    }

    /// Runs the network on `input` and writes the output layer values to `output`.
    ///
    /// Both slices must match the input and output layer sizes exactly;
    /// nothing is computed otherwise.
    pub fn forward(&mut self, input: &[f64], output: &mut [f64]) -> Result<(), ShapeError> {
        let expected = self.input_size();
        if input.len() != expected {
            return Err(ShapeError::Input {
                expected,
                actual: input.len(),
            });
        }
        let expected = self.output_size();
        if output.len() != expected {
            return Err(ShapeError::Output {
                expected,
                actual: output.len(),
            });
        }

        for (neuron, value) in iter::zip(&mut self.layers[0].neurons, input) {
            neuron.value = *value;
        }
        for index in 1..self.layers.len() {
            let (done, rest) = self.layers.split_at_mut(index);
            done[index - 1].feed(&mut rest[0], self.activation);
        }
        for (slot, neuron) in iter::zip(output, &self.layers[self.layers.len() - 1].neurons) {
            *slot = neuron.value;
        }
        Ok(())
    }

    /// Like [`Self::forward`], but allocates the output vector.
    pub fn forward_vec(&mut self, input: &[f64]) -> Result<Vec<f64>, ShapeError> {
        let mut output = vec![0.0; self.output_size()];
        self.forward(input, &mut output)?;
        Ok(output)
    }

    /// Replaces every bias and weight with `policy.apply(rng, value)`.
    pub fn mutate<R>(&mut self, rng: &mut R, policy: &MutationPolicy)
    where
        R: Rng + ?Sized,
    {
        for neuron in self.layers.iter_mut().flat_map(|layer| &mut layer.neurons) {
            neuron.mutate(rng, policy);
        }
    }
}
