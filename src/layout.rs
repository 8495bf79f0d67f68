//! The flat node index space shared by every per-node buffer.

use crate::error::{Error, Result};
use crate::utils::Ends;

use std::ops::Range;

/// Layer sizes together with their prefix offsets.
///
/// The nodes of layer `l` occupy the global indices
/// `offsets[l]..offsets[l + 1]`. `offsets` has one more entry than `sizes`;
/// its first entry is 0 and its last is the total node count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    sizes: Vec<usize>,
    offsets: Vec<usize>,
}

impl Layout {
    /// Computes the layout for the given layer sizes.
    ///
    /// Fails if there are fewer than two layers or any layer is empty.
    pub fn new(sizes: &[usize]) -> Result<Self> {
        if sizes.len() < 2 {
            return Err(Error::TooFewLayers {
                layers: sizes.len(),
            });
        }
        if let Some(layer) = sizes.iter().position(|&size| size == 0) {
            return Err(Error::EmptyLayer { layer });
        }

        let mut offsets = Vec::with_capacity(sizes.len() + 1);
        let mut total = 0;
        for &size in sizes {
            offsets.push(total);
            total += size;
        }
        offsets.push(total);

        Ok(Layout {
            sizes: sizes.to_vec(),
            offsets,
        })
    }

    /// The number of layers, input and output included.
    pub fn num_layers(&self) -> usize {
        self.sizes.len()
    }

    /// The total number of nodes across all layers.
    pub fn num_nodes(&self) -> usize {
        *self.offsets.back()
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn size(&self, layer: usize) -> usize {
        self.sizes[layer]
    }

    pub fn offset(&self, layer: usize) -> usize {
        self.offsets[layer]
    }

    /// The global node indices belonging to `layer`.
    pub fn range(&self, layer: usize) -> Range<usize> {
        self.offsets[layer]..self.offsets[layer + 1]
    }

    pub fn input_len(&self) -> usize {
        *self.sizes.front()
    }

    pub fn output_len(&self) -> usize {
        *self.sizes.back()
    }

    pub fn output_layer(&self) -> usize {
        self.sizes.len() - 1
    }

    pub fn output_range(&self) -> Range<usize> {
        self.range(self.output_layer())
    }
}
