//! Utilities for training and scoring networks.

use crate::error::{Error, Result};
use crate::network::Network;

use std::time::{Duration, Instant};

/// A builder for training runs over a labelled data set.
#[derive(Debug)]
pub struct Trainer {
    learning_rate: f64,
    logging: Logging,
    stop_condition: StopCondition,
}

impl Default for Trainer {
    fn default() -> Self {
        Trainer::new()
    }
}

impl Trainer {
    /// Creates a new Trainer instance.
    ///
    /// The trainer is initialized with some default values. These defaults are:
    ///
    /// * A learning rate of 0.1.
    /// * Stops after a single epoch.
    /// * Logs on training completion.
    pub fn new() -> Self {
        Trainer {
            learning_rate: 0.1,
            logging: Logging::Completion,
            stop_condition: StopCondition::Epochs(1),
        }
    }

    /// Sets the learning rate to use during gradient descent.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Sets the condition to finish training.
    pub fn stop_condition<C>(mut self, condition: C) -> Self
    where
        C: Into<StopCondition>,
    {
        self.stop_condition = condition.into();
        self
    }

    /// Runs one pass over `examples`, taking a descent step after each one.
    ///
    /// Returns the summed cost of the pass. Every example is checked against
    /// the network's shape before any parameter changes.
    pub fn epoch<I, O>(&self, network: &mut Network, examples: &[(I, O)]) -> Result<f64>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        validate(network, examples)?;
        let mut cost = 0.0;
        for &(ref input, ref expected) in examples {
            cost += network.train_example(input.as_ref(), expected.as_ref(), self.learning_rate)?;
        }
        Ok(cost)
    }

    /// Trains `network` on `examples` until the stop condition holds.
    ///
    /// The provided `examples` should be a list of labelled data, where each
    /// element takes the form `(network input, expected output)`.
    pub fn train<I, O>(&self, network: &mut Network, examples: &[(I, O)]) -> Result<Summary>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        let start_time = Instant::now();
        let mut epoch = 0;
        let mut previous = None;
        loop {
            let cost = self.epoch(network, examples)?;
            epoch += 1;

            self.logging.epoch(epoch, cost);
            if self.stop_condition.should_stop(epoch, cost, previous, start_time) {
                let summary = Summary {
                    epochs: epoch,
                    cost,
                    elapsed: start_time.elapsed(),
                };
                self.logging.completion(&summary);
                return Ok(summary);
            }
            previous = Some(cost);
        }
    }
}

/// Verifies every example against the network's shape, returning an error
/// if something is wrong.
fn validate<I, O>(network: &Network, examples: &[(I, O)]) -> Result<()>
where
    I: AsRef<[f64]>,
    O: AsRef<[f64]>,
{
    if examples.is_empty() {
        return Err(Error::EmptyTrainingSet);
    }
    for &(ref input, ref output) in examples {
        if input.as_ref().len() != network.input_len() {
            return Err(Error::InputSizeMismatch {
                expected: network.input_len(),
                actual: input.as_ref().len(),
            });
        }
        if output.as_ref().len() != network.output_len() {
            return Err(Error::TargetSizeMismatch {
                expected: network.output_len(),
                actual: output.as_ref().len(),
            });
        }
    }
    Ok(())
}

/// The outcome of a training run.
#[derive(Copy, Clone, Debug)]
pub struct Summary {
    pub epochs: usize,
    /// Summed cost of the final epoch.
    pub cost: f64,
    pub elapsed: Duration,
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug)]
pub enum Logging {
    /// No logs will be emitted
    Silent,
    /// A summary will be logged at completion
    Completion,
    /// A summary will be logged after every `n` epochs
    Epochs(usize),
}

impl Logging {
    fn epoch(&self, epoch: usize, cost: f64) {
        if let Logging::Epochs(freq) = *self {
            if freq > 0 && epoch % freq == 0 {
                info!("epoch {}: cost={}", epoch, cost);
            }
        }
    }

    fn completion(&self, summary: &Summary) {
        if let Logging::Silent = *self {
            return;
        }
        info!(
            "ran {} epochs in {:.1} seconds, final cost {}",
            summary.epochs,
            summary.elapsed.as_secs_f64(),
            summary.cost
        );
    }
}

/// When to stop training
#[derive(Copy, Clone, Debug)]
pub enum StopCondition {
    /// Stops after the provided number of epochs
    Epochs(usize),
    /// Stops when the epoch cost drops below the provided threshold
    CostThreshold(f64),
    /// Stops once an epoch improves the cost by no more than `tolerance`
    Plateau { tolerance: f64 },
    /// Stops after the provided duration
    Duration(Duration),
}

impl From<Duration> for StopCondition {
    fn from(duration: Duration) -> StopCondition {
        StopCondition::Duration(duration)
    }
}

impl StopCondition {
    /// Returns true if training is complete.
    fn should_stop(
        &self,
        epoch: usize,
        cost: f64,
        previous: Option<f64>,
        start_time: Instant,
    ) -> bool {
        match *self {
            StopCondition::Epochs(epochs) => epoch >= epochs,
            StopCondition::CostThreshold(threshold) => cost < threshold,
            StopCondition::Plateau { tolerance } => match previous {
                Some(previous) => previous - cost <= tolerance,
                None => false,
            },
            StopCondition::Duration(duration) => start_time.elapsed() > duration,
        }
    }
}

/// Classification accuracy over a labelled set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Accuracy {
    pub correct: usize,
    pub total: usize,
}

impl Accuracy {
    /// The fraction of correct predictions, 0 for an empty set.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// Counts how many `(input, label)` pairs `network` classifies correctly.
pub fn accuracy<I>(network: &mut Network, samples: &[(I, usize)]) -> Result<Accuracy>
where
    I: AsRef<[f64]>,
{
    let mut correct = 0;
    for &(ref input, label) in samples {
        if network.classify(input.as_ref())? == label {
            correct += 1;
        }
    }
    Ok(Accuracy {
        correct,
        total: samples.len(),
    })
}

/// A target vector with 1 at `label` and 0 elsewhere.
pub fn one_hot(label: usize, classes: usize) -> Result<Vec<f64>> {
    if label >= classes {
        return Err(Error::LabelOutOfRange { label, classes });
    }
    let mut target = vec![0.0; classes];
    target[label] = 1.0;
    Ok(target)
}
