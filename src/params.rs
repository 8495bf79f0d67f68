//! Trainable parameters, their gradients and random initialization.

use crate::error::{Error, Result};
use crate::layout::Layout;

use rand::Rng;

/// Weights and biases of a network, indexed by global node.
///
/// `weights[i][j]` is the weight from node `j` of the previous layer to node
/// `i`. Input-layer nodes have an empty weight list and an unused bias.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub(crate) layout: Layout,
    pub(crate) biases: Vec<f64>,
    pub(crate) weights: Vec<Vec<f64>>,
}

impl Parameters {
    /// Zero-initialized parameters shaped by `layout`.
    pub fn zeros(layout: &Layout) -> Self {
        let mut weights = vec![Vec::new(); layout.num_nodes()];
        for layer in 1..layout.num_layers() {
            for i in layout.range(layer) {
                weights[i] = vec![0.0; layout.size(layer - 1)];
            }
        }
        Parameters {
            layout: layout.clone(),
            biases: vec![0.0; layout.num_nodes()],
            weights,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }

    /// Checks that the buffers agree with the layout in every dimension.
    pub(crate) fn check_consistent(&self) -> Result<()> {
        let layout = &self.layout;
        let nodes = layout.num_nodes();
        for &(buffer, actual) in &[("biases", self.biases.len()), ("weights", self.weights.len())] {
            if actual != nodes {
                return Err(Error::ParameterCountMismatch {
                    buffer,
                    expected: nodes,
                    actual,
                });
            }
        }
        for layer in 0..layout.num_layers() {
            let fan_in = if layer == 0 { 0 } else { layout.size(layer - 1) };
            for node in layout.range(layer) {
                if self.weights[node].len() != fan_in {
                    return Err(Error::FanInMismatch {
                        node,
                        expected: fan_in,
                        actual: self.weights[node].len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Calls `f` on every trainable value: each non-input bias followed by
    /// that node's incoming weights.
    fn for_each_trainable<F: FnMut(&mut f64)>(&mut self, mut f: F) {
        let first_trainable = self.layout.offset(1);
        for i in first_trainable..self.layout.num_nodes() {
            f(&mut self.biases[i]);
            for w in &mut self.weights[i] {
                f(w);
            }
        }
    }
}

/// Uniform, zero-centered initialization on a fixed grid.
///
/// Every value is `k / resolution` for an integer `k` drawn uniformly from
/// `[-radius * resolution, radius * resolution]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Initializer {
    pub radius: u32,
    pub resolution: u32,
}

impl Default for Initializer {
    fn default() -> Self {
        Initializer {
            radius: 1,
            resolution: 100_000,
        }
    }
}

impl Initializer {
    /// Draws a single value.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        let scale = i64::from(self.resolution.max(1));
        let bound = i64::from(self.radius) * scale;
        rng.gen_range(-bound..=bound) as f64 / scale as f64
    }

    /// Overwrites every trainable value in `params` with a fresh sample.
    pub fn fill<R: Rng>(&self, params: &mut Parameters, rng: &mut R) {
        params.for_each_trainable(|value| *value = self.sample(&mut *rng));
    }
}
