//! Loss functions.

/// A per-node loss and its derivative with respect to the prediction.
pub trait Loss {
    /// The loss of `predicted` against `target`.
    fn loss(&self, predicted: f64, target: f64) -> f64;

    /// `d loss / d predicted`.
    fn derivative(&self, predicted: f64, target: f64) -> f64;
}

/// Any `(loss, derivative)` pair of closures or function pointers is a loss.
impl<L, D> Loss for (L, D)
where
    L: Fn(f64, f64) -> f64,
    D: Fn(f64, f64) -> f64,
{
    fn loss(&self, predicted: f64, target: f64) -> f64 {
        (self.0)(predicted, target)
    }

    fn derivative(&self, predicted: f64, target: f64) -> f64 {
        (self.1)(predicted, target)
    }
}

/// Stock loss functions.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Cost {
    /// `(y - t)^2`
    SquaredError,
}

impl Loss for Cost {
    fn loss(&self, predicted: f64, target: f64) -> f64 {
        match *self {
            Cost::SquaredError => (predicted - target) * (predicted - target),
        }
    }

    fn derivative(&self, predicted: f64, target: f64) -> f64 {
        match *self {
            Cost::SquaredError => 2.0 * (predicted - target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_error() {
        assert_eq!(Cost::SquaredError.loss(3.0, 1.0), 4.0);
        assert_eq!(Cost::SquaredError.derivative(3.0, 1.0), 4.0);
        assert_eq!(Cost::SquaredError.derivative(1.0, 3.0), -4.0);
        assert_eq!(Cost::SquaredError.loss(0.5, 0.5), 0.0);
    }

    #[test]
    fn closure_pair() {
        let abs = (|y: f64, t: f64| (y - t).abs(), |y: f64, t: f64| (y - t).signum());
        assert_eq!(abs.loss(1.0, 3.0), 2.0);
        assert_eq!(abs.derivative(1.0, 3.0), -1.0);
    }
}
