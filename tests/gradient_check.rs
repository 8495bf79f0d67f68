// Compares backpropagated gradients against central finite differences of
// the total cost.

extern crate backprop;
#[macro_use]
extern crate approx;

use backprop::activator::{Activation, Activator};
use backprop::cost::{Cost, Loss};
use backprop::Network;

const STEP: f64 = 1e-5;
const TOLERANCE: f64 = 1e-5;

fn cost_at(network: &mut Network, input: &[f64], target: &[f64]) -> f64 {
    network.set_input(input).unwrap();
    network.forward();
    network.total_cost(target).unwrap()
}

/// Checks every weight and bias of `network` on one example.
fn check_gradients(network: &mut Network, input: &[f64], target: &[f64]) {
    network.set_input(input).unwrap();
    network.forward();
    network.backward(target).unwrap();

    let sizes = network.layout().sizes().to_vec();
    let mut checked = 0;
    for layer in 1..sizes.len() {
        for node in 0..sizes[layer] {
            let original = network.bias(layer, node);
            network.set_bias(layer, node, original + STEP);
            let plus = cost_at(network, input, target);
            network.set_bias(layer, node, original - STEP);
            let minus = cost_at(network, input, target);
            network.set_bias(layer, node, original);

            let numeric = (plus - minus) / (2.0 * STEP);
            assert_abs_diff_eq!(network.d_bias(layer, node), numeric, epsilon = TOLERANCE);
            checked += 1;

            for prev in 0..sizes[layer - 1] {
                let original = network.weight(layer, node, prev);
                network.set_weight(layer, node, prev, original + STEP);
                let plus = cost_at(network, input, target);
                network.set_weight(layer, node, prev, original - STEP);
                let minus = cost_at(network, input, target);
                network.set_weight(layer, node, prev, original);

                let numeric = (plus - minus) / (2.0 * STEP);
                assert_abs_diff_eq!(
                    network.d_weight(layer, node, prev),
                    numeric,
                    epsilon = TOLERANCE
                );
                checked += 1;
            }
        }
    }
    assert_eq!(checked, network.num_parameters());
}

#[test]
fn identity_network() {
    let mut network = Network::builder(&[2, 2, 1])
        .activator(Activator::Identity)
        .build()
        .unwrap();
    network.randomize_seeded(1);
    check_gradients(&mut network, &[1.0, 0.0], &[1.0]);
    check_gradients(&mut network, &[-0.3, 0.8], &[0.25]);
}

#[test]
fn sigmoid_network() {
    let mut network = Network::builder(&[3, 4, 2])
        .activator(Activator::Sigmoid)
        .build()
        .unwrap();
    network.randomize_seeded(2);
    check_gradients(&mut network, &[0.1, 0.5, 0.9], &[1.0, 0.0]);
}

#[test]
fn mixed_deep_network() {
    let mut network = Network::builder(&[4, 5, 3, 3])
        .activators(vec![Activator::TanH, Activator::Sigmoid, Activator::Identity])
        .build()
        .unwrap();
    network.randomize_seeded(3);
    check_gradients(&mut network, &[0.2, -0.4, 0.6, 1.0], &[0.0, 1.0, 0.0]);
}

#[test]
fn custom_functions() {
    let softplus = (
        |x: f64| (1.0 + x.exp()).ln(),
        |x: f64| 1.0 / (1.0 + (-x).exp()),
    );
    let cube = (|x: f64| x * x * x / 3.0, |x: f64| x * x);
    let absolute_cubed = (
        |y: f64, t: f64| (y - t).abs().powi(3),
        |y: f64, t: f64| 3.0 * (y - t) * (y - t).abs(),
    );
    let mut network = Network::new(
        &[2, 3, 2],
        vec![
            Box::new(softplus) as Box<dyn Activation>,
            Box::new(cube) as Box<dyn Activation>,
        ],
        Box::new(absolute_cubed) as Box<dyn Loss>,
    )
    .unwrap();
    network.randomize_seeded(4);
    check_gradients(&mut network, &[0.7, -0.2], &[0.5, -0.5]);
}

#[test]
fn squared_error_is_default() {
    let mut a = Network::builder(&[2, 2]).cost(Cost::SquaredError).build().unwrap();
    let mut b = Network::builder(&[2, 2]).build().unwrap();
    a.randomize_seeded(9);
    b.randomize_seeded(9);
    assert_eq!(
        cost_at(&mut a, &[0.5, 0.5], &[1.0, 0.0]),
        cost_at(&mut b, &[0.5, 0.5], &[1.0, 0.0])
    );
}
