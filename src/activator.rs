//! Activation functions.

/// An activation function paired with its derivative.
///
/// Both are evaluated on a node's pre-activation sum. Implementations must be
/// total over the real line: saturate rather than return NaN or infinity.
pub trait Activation {
    /// Evaluates `f(x)`.
    fn f(&self, x: f64) -> f64;

    /// Evaluates the derivative `f'(x)`.
    fn fprime(&self, x: f64) -> f64;
}

/// Any `(f, f')` pair of closures or function pointers is an activation.
impl<F, D> Activation for (F, D)
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    fn f(&self, x: f64) -> f64 {
        (self.0)(x)
    }

    fn fprime(&self, x: f64) -> f64 {
        (self.1)(x)
    }
}

/// [Activation function](https://en.wikipedia.org/wiki/Activation_function)
/// types.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Activator {
    /// The identity, `f(x) = x`
    Identity,
    /// Rectified Linear Unit
    ReLU,
    /// Leaky Rectified Linear Unit
    ///
    /// Takes an `alpha` value to use for negative inputs.
    LeakyReLU(f64),
    /// Sigmoid function
    Sigmoid,
    /// Hyperbolic tan function
    TanH,
}

impl Activation for Activator {
    fn f(&self, x: f64) -> f64 {
        match *self {
            Activator::Identity => x,
            Activator::ReLU => if x > 0.0 { x } else { 0.0 },
            Activator::LeakyReLU(alpha) => if x > 0.0 { x } else { alpha * x },
            Activator::Sigmoid => {
                let t = (-x).exp();
                if t.is_infinite() { 0.0 } else { 1.0 / (1.0 + t) }
            }
            Activator::TanH => x.tanh(),
        }
    }

    fn fprime(&self, x: f64) -> f64 {
        match *self {
            Activator::Identity => 1.0,
            Activator::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            Activator::LeakyReLU(alpha) => if x > 0.0 { 1.0 } else { alpha },
            Activator::Sigmoid => {
                // e^x / (1 + e^x)^2, symmetric in x; use the non-overflowing side.
                let t = (-x.abs()).exp();
                t / ((1.0 + t) * (1.0 + t))
            }
            Activator::TanH => {
                let y = x.tanh();
                1.0 - y * y
            }
        }
    }
}
