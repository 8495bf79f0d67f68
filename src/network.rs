//! A fully connected [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network) trained by
//! per-example gradient descent.
//!
//! Every per-node buffer is a single flat vector indexed by the global node
//! index of a [`Layout`](../layout/struct.Layout.html); there are no per-layer
//! objects.
//!
//! # Example
//!
//! ```
//! # use backprop::activator::Activator;
//! # use backprop::cost::Cost;
//! # use backprop::network::Network;
//! let mut network = Network::builder(&[2, 3, 2])
//!     .activator(Activator::Sigmoid)
//!     .cost(Cost::SquaredError)
//!     .build()
//!     .unwrap();
//! network.randomize_seeded(7);
//!
//! let input = [1.0, 0.0];
//! let target = [0.0, 1.0];
//! let before = network.train_example(&input, &target, 0.1).unwrap();
//! let after = network.train_example(&input, &target, 0.1).unwrap();
//! assert!(after < before);
//! assert!(network.predict() < 2);
//! ```

use crate::activator::{Activation, Activator};
use crate::cost::{Cost, Loss};
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::params::{Initializer, Parameters};
use crate::utils::{argmax, ZeroOut};

use itertools::multizip;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// A feedforward network together with its forward and backward state.
///
/// The expected call sequence per training example is
/// `set_input`, `forward`, `backward`, `descend`; `total_cost` and `predict`
/// read the result of the last `forward`.
pub struct Network {
    layout: Layout,
    params: Parameters,
    /// Gradient of the loss with respect to every parameter.
    grads: Parameters,
    /// Pre-activation value of every node.
    sums: Vec<f64>,
    /// Post-activation value of every node; the input layer holds the input.
    values: Vec<f64>,
    /// Scratch for the backward sweep: `d loss / d value` per node.
    dp: Vec<f64>,
    /// One activation per non-input layer.
    activations: Vec<Box<dyn Activation>>,
    loss: Box<dyn Loss>,
}

impl Network {
    /// Creates a network with all parameters set to zero.
    ///
    /// Arguments:
    ///
    ///  * `layer_sizes` - the number of nodes in each layer, input first. Must
    ///                    contain at least two non-zero entries.
    ///  * `activations` - the activation of each non-input layer, so one fewer
    ///                    than `layer_sizes`.
    ///  * `loss` - the loss applied to each output node.
    pub fn new(
        layer_sizes: &[usize],
        activations: Vec<Box<dyn Activation>>,
        loss: Box<dyn Loss>,
    ) -> Result<Self> {
        let layout = Layout::new(layer_sizes)?;
        if activations.len() != layout.num_layers() - 1 {
            return Err(Error::ActivationCountMismatch {
                expected: layout.num_layers() - 1,
                actual: activations.len(),
            });
        }

        let nodes = layout.num_nodes();
        debug!(
            "created network with layers {:?} ({} nodes)",
            layout.sizes(),
            nodes
        );
        Ok(Network {
            params: Parameters::zeros(&layout),
            grads: Parameters::zeros(&layout),
            sums: vec![0.0; nodes],
            values: vec![0.0; nodes],
            dp: vec![0.0; nodes],
            layout,
            activations,
            loss,
        })
    }

    /// Starts building a network with the given layer sizes.
    pub fn builder(layer_sizes: &[usize]) -> Builder {
        Builder::new(layer_sizes)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Returns the size of the input layer.
    pub fn input_len(&self) -> usize {
        self.layout.input_len()
    }

    /// Returns the size of the output layer.
    pub fn output_len(&self) -> usize {
        self.layout.output_len()
    }

    /// Draws every weight and non-input bias from the default
    /// [`Initializer`](../params/struct.Initializer.html).
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        self.randomize_with(&Initializer::default(), rng);
    }

    pub fn randomize_with<R: Rng>(&mut self, init: &Initializer, rng: &mut R) {
        init.fill(&mut self.params, rng);
        debug!(
            "randomized {} parameters in [-{}, {}]",
            self.num_parameters(),
            init.radius,
            init.radius
        );
    }

    /// Randomizes from a generator seeded with `seed`.
    pub fn randomize_seeded(&mut self, seed: u64) {
        self.randomize(&mut StdRng::seed_from_u64(seed));
    }

    /// The number of trainable values.
    pub fn num_parameters(&self) -> usize {
        (1..self.layout.num_layers())
            .map(|l| self.layout.size(l) * (self.layout.size(l - 1) + 1))
            .sum()
    }

    /// Copies `input` into the input layer.
    pub fn set_input(&mut self, input: &[f64]) -> Result<()> {
        let expected = self.layout.input_len();
        if input.len() != expected {
            return Err(Error::InputSizeMismatch {
                expected,
                actual: input.len(),
            });
        }
        self.values[..expected].copy_from_slice(input);
        Ok(())
    }

    /// Feeds the current input through the network, layer by layer.
    pub fn forward(&mut self) {
        for layer in 1..self.layout.num_layers() {
            let activation = &self.activations[layer - 1];
            let current = self.layout.offset(layer);
            let (before, after) = self.values.split_at_mut(current);
            let inputs = &before[self.layout.offset(layer - 1)..];

            for i in self.layout.range(layer) {
                let mut sum = self.params.biases[i];
                for (w, x) in self.params.weights[i].iter().zip(inputs) {
                    sum += w * x;
                }
                self.sums[i] = sum;
                after[i - current] = activation.f(sum);
            }
        }
    }

    /// Computes the gradient of the loss against `target` for every
    /// parameter.
    ///
    /// Must follow a `forward` on the input the target belongs to; the result
    /// is meaningless otherwise.
    pub fn backward(&mut self, target: &[f64]) -> Result<()> {
        self.check_target(target)?;

        self.dp.zero_out();
        for (i, &t) in self.layout.output_range().zip(target) {
            self.dp[i] = self.loss.derivative(self.values[i], t);
        }

        // Walking from the output back, every downstream consumer of a layer
        // has already pushed its share into that layer's `dp` by the time the
        // layer is reached.
        for layer in (1..self.layout.num_layers()).rev() {
            let activation = &self.activations[layer - 1];
            let upstream = self.layout.offset(layer - 1);
            let current = self.layout.offset(layer);
            let inputs = &self.values[upstream..current];
            let (before, after) = self.dp.split_at_mut(current);
            let upstream_dp = &mut before[upstream..];
            let propagate = layer > 1;

            for i in self.layout.range(layer) {
                let delta = after[i - current] * activation.fprime(self.sums[i]);
                self.grads.biases[i] = delta;
                for (dw, &w, &x, up) in multizip((
                    self.grads.weights[i].iter_mut(),
                    self.params.weights[i].iter(),
                    inputs.iter(),
                    upstream_dp.iter_mut(),
                )) {
                    *dw = delta * x;
                    if propagate {
                        *up += delta * w;
                    }
                }
            }
        }
        Ok(())
    }

    /// Takes one gradient descent step of size `rate` using the gradients
    /// from the last `backward`.
    pub fn descend(&mut self, rate: f64) {
        for i in self.layout.offset(1)..self.layout.num_nodes() {
            self.params.biases[i] -= rate * self.grads.biases[i];
            for (w, dw) in self.params.weights[i].iter_mut().zip(&self.grads.weights[i]) {
                *w -= rate * dw;
            }
        }
    }

    /// Sums the loss of every output node against `target`.
    pub fn total_cost(&self, target: &[f64]) -> Result<f64> {
        self.check_target(target)?;
        Ok(self
            .output()
            .iter()
            .zip(target)
            .map(|(&y, &t)| self.loss.loss(y, t))
            .sum())
    }

    /// Returns the index of the largest output, the lowest one on ties.
    pub fn predict(&self) -> usize {
        argmax(self.output())
    }

    /// The output layer's values from the last `forward`.
    pub fn output(&self) -> &[f64] {
        &self.values[self.layout.output_range()]
    }

    /// Runs `set_input`, `forward`, `backward` and `descend` on one example.
    ///
    /// Returns the cost of the prediction made before the step.
    pub fn train_example(&mut self, input: &[f64], target: &[f64], rate: f64) -> Result<f64> {
        self.check_target(target)?;
        self.set_input(input)?;
        self.forward();
        self.backward(target)?;
        self.descend(rate);
        self.total_cost(target)
    }

    /// Feeds `input` forward and returns the predicted class.
    pub fn classify(&mut self, input: &[f64]) -> Result<usize> {
        self.set_input(input)?;
        self.forward();
        Ok(self.predict())
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Replaces every parameter, checking that `params` has this network's
    /// shape.
    pub fn load_parameters(&mut self, params: Parameters) -> Result<()> {
        if params.layout != self.layout {
            return Err(Error::ParameterShapeMismatch {
                expected: self.layout.sizes().to_vec(),
                actual: params.layout.sizes().to_vec(),
            });
        }
        params.check_consistent()?;
        self.params = params;
        Ok(())
    }

    /// The weight into node `node` of `layer` from node `input` of the
    /// previous layer.
    ///
    /// Panics if the coordinates are outside the network; the same holds for
    /// the other per-parameter accessors.
    pub fn weight(&self, layer: usize, node: usize, input: usize) -> f64 {
        self.params.weights[self.node_index(layer, node)][input]
    }

    pub fn set_weight(&mut self, layer: usize, node: usize, input: usize, value: f64) {
        let i = self.node_index(layer, node);
        self.params.weights[i][input] = value;
    }

    pub fn bias(&self, layer: usize, node: usize) -> f64 {
        self.params.biases[self.node_index(layer, node)]
    }

    pub fn set_bias(&mut self, layer: usize, node: usize, value: f64) {
        let i = self.node_index(layer, node);
        self.params.biases[i] = value;
    }

    /// The gradient of the weight addressed like [`weight`](#method.weight).
    pub fn d_weight(&self, layer: usize, node: usize, input: usize) -> f64 {
        self.grads.weights[self.node_index(layer, node)][input]
    }

    pub fn d_bias(&self, layer: usize, node: usize) -> f64 {
        self.grads.biases[self.node_index(layer, node)]
    }

    /// Maps a trainable node's (layer, position) to its global index.
    fn node_index(&self, layer: usize, node: usize) -> usize {
        assert!(
            layer >= 1 && layer < self.layout.num_layers(),
            "layer {} has no parameters",
            layer
        );
        assert!(node < self.layout.size(layer), "layer {} has no node {}", layer, node);
        self.layout.offset(layer) + node
    }

    fn check_target(&self, target: &[f64]) -> Result<()> {
        let expected = self.layout.output_len();
        if target.len() != expected {
            return Err(Error::TargetSizeMismatch {
                expected,
                actual: target.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Network")
            .field("layout", &self.layout)
            .field("params", &self.params)
            .finish()
    }
}

/// Builds a new `Network`.
pub struct Builder {
    layer_sizes: Vec<usize>,
    activator: Activator,
    activations: Option<Vec<Box<dyn Activation>>>,
    loss: Box<dyn Loss>,
}

impl Builder {
    /// Creates a new Builder instance.
    ///
    /// The builder is initialized with some default values. These defaults
    /// are:
    ///
    /// * A ReLU activation function on every non-input layer.
    /// * A squared error cost.
    pub fn new(layer_sizes: &[usize]) -> Self {
        Builder {
            layer_sizes: layer_sizes.into(),
            activator: Activator::ReLU,
            activations: None,
            loss: Box::new(Cost::SquaredError),
        }
    }

    /// Uses `activator` on every non-input layer.
    pub fn activator(mut self, activator: Activator) -> Self {
        self.activator = activator;
        self.activations = None;
        self
    }

    /// Sets the activation of each non-input layer individually, in order.
    pub fn activators<I, A>(mut self, activations: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Activation + 'static,
    {
        self.activations = Some(
            activations
                .into_iter()
                .map(|a| Box::new(a) as Box<dyn Activation>)
                .collect(),
        );
        self
    }

    /// Sets the loss function.
    pub fn cost<L: Loss + 'static>(mut self, loss: L) -> Self {
        self.loss = Box::new(loss);
        self
    }

    pub fn build(self) -> Result<Network> {
        let activator = self.activator;
        let hidden = self.layer_sizes.len().saturating_sub(1);
        let activations = self.activations.unwrap_or_else(|| {
            (0..hidden)
                .map(|_| Box::new(activator) as Box<dyn Activation>)
                .collect()
        });
        Network::new(&self.layer_sizes, activations, self.loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Layers [2, 2, 1] with identity activations and fixed parameters.
    fn identity_net() -> Network {
        let mut network = Network::builder(&[2, 2, 1])
            .activator(Activator::Identity)
            .build()
            .unwrap();
        network.set_weight(1, 0, 0, 0.5);
        network.set_weight(1, 0, 1, -0.25);
        network.set_weight(1, 1, 0, 0.75);
        network.set_weight(1, 1, 1, 1.0);
        network.set_bias(1, 0, 0.1);
        network.set_bias(1, 1, -0.2);
        network.set_weight(2, 0, 0, 2.0);
        network.set_weight(2, 0, 1, -1.0);
        network.set_bias(2, 0, 0.3);
        network
    }

    #[test]
    fn too_few_layers() {
        let err = Network::builder(&[1]).build().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn empty_layer() {
        match Network::builder(&[1, 0, 1]).build() {
            Err(Error::EmptyLayer { layer: 1 }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn activation_count_mismatch() {
        let result = Network::builder(&[2, 3, 1])
            .activators(vec![Activator::Sigmoid])
            .build();
        match result {
            Err(Error::ActivationCountMismatch {
                expected: 2,
                actual: 1,
            }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn wrong_input_size() {
        let mut network = identity_net();
        match network.set_input(&[1.0, 2.0, 3.0]) {
            Err(Error::InputSizeMismatch {
                expected: 2,
                actual: 3,
            }) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert!(network.set_input(&[]).is_err());
    }

    #[test]
    fn wrong_target_size() {
        let mut network = identity_net();
        network.set_input(&[1.0, 0.0]).unwrap();
        network.forward();
        assert!(network.backward(&[1.0, 1.0]).is_err());
        assert!(network.backward(&[]).is_err());
        assert!(network.total_cost(&[0.0, 0.0]).is_err());
        assert!(network.train_example(&[1.0, 0.0], &[], 0.1).is_err());
    }

    #[test]
    fn rejected_target_leaves_gradients_alone() {
        let mut network = identity_net();
        network.set_input(&[1.0, 0.0]).unwrap();
        network.forward();
        network.backward(&[1.0]).unwrap();
        let before = network.d_bias(2, 0);
        assert!(network.backward(&[1.0, 2.0]).is_err());
        assert_eq!(network.d_bias(2, 0), before);
    }

    #[test]
    fn hand_computed_forward_and_backward() {
        let mut network = identity_net();
        network.set_input(&[1.0, 0.0]).unwrap();
        network.forward();

        // hidden: h0 = 0.5 + 0.1 = 0.6, h1 = 0.75 - 0.2 = 0.55
        // output: 2 * 0.6 - 0.55 + 0.3 = 0.95
        assert_relative_eq!(network.output()[0], 0.95, epsilon = 1e-12);

        network.backward(&[1.0]).unwrap();
        // dL/dy = 2 * (0.95 - 1) = -0.1
        let g = -0.1;
        assert_relative_eq!(network.d_bias(2, 0), g, epsilon = 1e-12);
        assert_relative_eq!(network.d_weight(2, 0, 0), g * 0.6, epsilon = 1e-12);
        assert_relative_eq!(network.d_weight(2, 0, 1), g * 0.55, epsilon = 1e-12);
        assert_relative_eq!(network.d_bias(1, 0), g * 2.0, epsilon = 1e-12);
        assert_relative_eq!(network.d_bias(1, 1), g * -1.0, epsilon = 1e-12);
        assert_relative_eq!(network.d_weight(1, 0, 0), g * 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(network.d_weight(1, 0, 1), 0.0);
        assert_relative_eq!(network.d_weight(1, 1, 0), g * -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(network.d_weight(1, 1, 1), 0.0);

        assert_relative_eq!(network.total_cost(&[1.0]).unwrap(), 0.0025, epsilon = 1e-12);
    }

    #[test]
    fn backward_overwrites_previous_gradients() {
        let mut network = identity_net();
        network.set_input(&[1.0, 0.0]).unwrap();
        network.forward();
        network.backward(&[1.0]).unwrap();
        network.backward(&[1.0]).unwrap();
        assert_relative_eq!(network.d_bias(2, 0), -0.1, epsilon = 1e-12);
    }

    #[test]
    fn descend_applies_scaled_gradient() {
        let mut network = identity_net();
        network.set_input(&[1.0, 0.0]).unwrap();
        network.forward();
        network.backward(&[1.0]).unwrap();
        network.descend(0.5);
        assert_relative_eq!(network.bias(2, 0), 0.3 + 0.05, epsilon = 1e-12);
        assert_relative_eq!(network.weight(2, 0, 0), 2.0 + 0.5 * 0.1 * 0.6, epsilon = 1e-12);
        assert_relative_eq!(network.weight(1, 1, 1), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn forward_is_deterministic() {
        let mut network = Network::builder(&[3, 4, 2])
            .activator(Activator::Sigmoid)
            .build()
            .unwrap();
        network.randomize_seeded(3);
        network.set_input(&[0.2, 0.4, 0.9]).unwrap();
        network.forward();
        let first = network.output().to_vec();
        for _ in 0..5 {
            network.forward();
            assert_eq!(network.output(), &first[..]);
        }
    }

    #[test]
    fn predict_prefers_lowest_index_on_ties() {
        let mut network = Network::builder(&[1, 3])
            .activator(Activator::Identity)
            .build()
            .unwrap();
        network.set_bias(1, 0, 0.2);
        network.set_bias(1, 1, 0.7);
        network.set_bias(1, 2, 0.7);
        assert_eq!(network.classify(&[0.0]).unwrap(), 1);

        network.set_bias(1, 0, 0.7);
        assert_eq!(network.classify(&[0.0]).unwrap(), 0);
    }

    #[test]
    fn load_parameters_checks_shape() {
        let mut source = identity_net();
        source.randomize_seeded(11);
        let mut target = identity_net();
        target.load_parameters(source.parameters().clone()).unwrap();
        assert_eq!(target.parameters(), source.parameters());

        let mut other = Network::builder(&[2, 3, 1]).build().unwrap();
        match other.load_parameters(source.parameters().clone()) {
            Err(Error::ParameterShapeMismatch { expected, actual }) => {
                assert_eq!(expected, vec![2, 3, 1]);
                assert_eq!(actual, vec![2, 2, 1]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn num_parameters_counts_weights_and_biases() {
        let network = Network::builder(&[784, 350, 350, 10]).build().unwrap();
        assert_eq!(
            network.num_parameters(),
            350 * 785 + 350 * 351 + 10 * 351
        );
    }

    #[test]
    #[should_panic]
    fn input_layer_has_no_bias() {
        identity_net().bias(0, 0);
    }
}
