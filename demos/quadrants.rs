extern crate backprop;
extern crate env_logger;
extern crate rand;

use backprop::activator::Activator;
use backprop::trainer::{self, Logging, StopCondition, Trainer};
use backprop::Network;

use rand::Rng;

type Input = Vec<f64>;

/// Noisy points on the unit circle, class 0 in the first and third quadrants.
fn generate_data<R: Rng>(rng: &mut R, num_samples: usize) -> Vec<(Input, usize)> {
    let mut data = Vec::new();
    for _ in 0..num_samples {
        let theta = rng.gen_range(0.0..2.0 * std::f64::consts::PI);
        let dx = rng.gen_range(-0.1..0.1);
        let dy = rng.gen_range(-0.1..0.1);
        let point = vec![theta.cos() + dx, theta.sin() + dy];
        let class = if point[0] * point[1] > 0.0 { 0 } else { 1 };
        data.push((point, class));
    }
    data
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut rng = rand::thread_rng();
    let training_data = generate_data(&mut rng, 10_000);
    let examples: Vec<_> = training_data
        .iter()
        .map(|&(ref point, class)| (point.clone(), trainer::one_hot(class, 2).unwrap()))
        .collect();

    let mut network = Network::builder(&[2, 5, 5, 2])
        .activator(Activator::Sigmoid)
        .build()
        .unwrap();
    network.randomize(&mut rng);

    Trainer::new()
        .learning_rate(0.1)
        .stop_condition(StopCondition::Plateau { tolerance: 1.0 })
        .logging(Logging::Epochs(5))
        .train(&mut network, &examples)
        .unwrap();

    let test_data = generate_data(&mut rng, 1_000);
    for &(name, data) in &[("Training", &training_data), ("Test", &test_data)] {
        let accuracy = trainer::accuracy(&mut network, data).unwrap();
        println!(
            "{} set results: {} of {} correct",
            name, accuracy.correct, accuracy.total
        );
    }
}
