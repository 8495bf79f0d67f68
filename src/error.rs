//! Error types for network construction, training and dataset loading.

use std::io;

use thiserror::Error;

/// Errors reported by this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("a network needs at least 2 layers, got {layers}")]
    TooFewLayers { layers: usize },

    #[error("layer {layer} has no nodes")]
    EmptyLayer { layer: usize },

    #[error("expected {expected} activation functions (one per non-input layer), got {actual}")]
    ActivationCountMismatch { expected: usize, actual: usize },

    #[error("input has {actual} values but the input layer has {expected} nodes")]
    InputSizeMismatch { expected: usize, actual: usize },

    #[error("target has {actual} values but the output layer has {expected} nodes")]
    TargetSizeMismatch { expected: usize, actual: usize },

    #[error("parameters have shape {actual:?}, network has layers {expected:?}")]
    ParameterShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("{buffer} buffer holds {actual} entries, layout has {expected} nodes")]
    ParameterCountMismatch {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("node {node} has {actual} incoming weights, previous layer has {expected} nodes")]
    FanInMismatch {
        node: usize,
        expected: usize,
        actual: usize,
    },

    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("bad IDX magic number: expected {expected:#010x}, found {found:#010x}")]
    BadMagic { expected: u32, found: u32 },

    #[error("IDX images of {rows}x{cols} have no pixels")]
    EmptyImage { rows: usize, cols: usize },

    #[error("IDX data truncated: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("dataset has {images} images but {labels} labels")]
    CountMismatch { images: usize, labels: usize },

    #[error("label {label} is out of range for {classes} classes")]
    LabelOutOfRange { label: usize, classes: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns true for errors raised while wiring up a network.
    pub fn is_configuration(&self) -> bool {
        match self {
            Error::TooFewLayers { .. }
            | Error::EmptyLayer { .. }
            | Error::ActivationCountMismatch { .. } => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
