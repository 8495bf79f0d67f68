//! Trains a digit classifier on the MNIST IDX files.
//!
//! Usage: `train [DATA_DIR] [EPOCHS]`. `DATA_DIR` defaults to `./data` and must
//! hold the four files under their distribution names; `EPOCHS` defaults
//! to 10.

extern crate backprop;
extern crate env_logger;
extern crate rand;
#[macro_use]
extern crate log;

use backprop::activator::Activator;
use backprop::cost::Cost;
use backprop::idx;
use backprop::trainer::{self, Trainer};
use backprop::Network;

use std::env;
use std::path::Path;
use std::process;

const CLASSES: usize = 10;
const HIDDEN: usize = 350;
const LEARNING_RATE: f64 = 0.1;

fn run(data_dir: &Path, epochs: usize) -> backprop::Result<()> {
    info!("loading data from {}", data_dir.display());
    let training = idx::load_dataset(
        data_dir.join("train-images.idx3-ubyte"),
        data_dir.join("train-labels.idx1-ubyte"),
    )?;
    let test = idx::load_dataset(
        data_dir.join("t10k-images.idx3-ubyte"),
        data_dir.join("t10k-labels.idx1-ubyte"),
    )?;
    info!(
        "{} training and {} test images of {}x{}",
        training.len(),
        test.len(),
        training.rows,
        training.cols
    );

    let mut network = Network::builder(&[training.input_len(), HIDDEN, HIDDEN, CLASSES])
        .activators(vec![
            Activator::LeakyReLU(0.001),
            Activator::Sigmoid,
            Activator::Sigmoid,
        ])
        .cost(Cost::SquaredError)
        .build()?;
    network.randomize(&mut rand::thread_rng());

    let examples = training.into_examples(CLASSES)?;
    let test = test.into_labelled();
    let trainer = Trainer::new().learning_rate(LEARNING_RATE);

    for epoch in 1..=epochs {
        let cost = trainer.epoch(&mut network, &examples)?;
        let accuracy = trainer::accuracy(&mut network, &test)?;
        info!(
            "epoch {}: cost {:.3}, test accuracy {} / {} ({:.2}%)",
            epoch,
            cost,
            accuracy.correct,
            accuracy.total,
            100.0 * accuracy.ratio()
        );
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let data_dir = args.next().unwrap_or_else(|| "./data".to_string());
    let epochs = match args.next().map(|arg| arg.parse::<usize>()) {
        None => 10,
        Some(Ok(epochs)) => epochs,
        Some(Err(err)) => {
            error!("invalid epoch count: {}", err);
            process::exit(2);
        }
    };

    if let Err(err) = run(Path::new(&data_dir), epochs) {
        error!("{}", err);
        process::exit(1);
    }
}
