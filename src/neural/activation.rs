//! Activation functions and their derivatives.

use serde::{Deserialize, Serialize};

/// Activation function applied by every neuron in a network.
///
/// The variant is fixed per network; there is no per-layer mixing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// max(0, x)
    Rectifier,
    /// 1 / (1 + e^-x), the default for letter-ranking networks
    #[default]
    Logistic,
    /// tanh(x)
    HyperbolicTangent,
}

impl Activation {
    /// Evaluate the activation at `x`.
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Activation::Rectifier => {
                if x >= 0.0 {
                    x
                } else {
                    0.0
                }
            }
            Activation::Logistic => 1.0 / (1.0 + (-x).exp()),
            Activation::HyperbolicTangent => x.tanh(),
        }
    }

    /// Derivative of the activation at `x`.
    #[inline]
    pub fn deriv(&self, x: f64) -> f64 {
        match self {
            Activation::Rectifier => {
                if x >= 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Logistic => {
                let u = (-x).exp();
                u / ((1.0 + u) * (1.0 + u))
            }
            Activation::HyperbolicTangent => {
                let u = x.cosh();
                1.0 / (u * u)
            }
        }
    }

    /// Backpropagation error factor for a neuron, given both its
    /// pre-activation and its output.
    ///
    /// For the logistic variant the derivative is computed algebraically
    /// from the output as `y * (1 - y)`, which avoids re-evaluating the
    /// exponential; the other variants use the pre-activation form. The
    /// two paths agree numerically (see tests).
    #[inline]
    pub fn sensitivity(&self, pre: f64, out: f64) -> f64 {
        match self {
            Activation::Logistic => out * (1.0 - out),
            _ => self.deriv(pre),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBES: [f64; 9] = [-10.0, -3.0, -1.0, -0.25, 0.0, 0.25, 1.0, 3.0, 10.0];

    #[test]
    fn test_output_ranges() {
        for &x in &PROBES {
            let logistic = Activation::Logistic.eval(x);
            assert!((0.0..=1.0).contains(&logistic));

            let tanh = Activation::HyperbolicTangent.eval(x);
            assert!((-1.0..=1.0).contains(&tanh));

            assert!(Activation::Rectifier.eval(x) >= 0.0);
        }
    }

    #[test]
    fn test_deriv_matches_finite_difference() {
        let h = 1e-6;
        for act in [Activation::Logistic, Activation::HyperbolicTangent] {
            for &x in &PROBES {
                let numeric = (act.eval(x + h) - act.eval(x - h)) / (2.0 * h);
                assert!(
                    (act.deriv(x) - numeric).abs() < 1e-5,
                    "{:?} deriv mismatch at {}",
                    act,
                    x
                );
            }
        }
        // Rectifier is non-differentiable at 0; probe away from the kink.
        for &x in &[-2.0, -0.5, 0.5, 2.0] {
            let act = Activation::Rectifier;
            let numeric = (act.eval(x + h) - act.eval(x - h)) / (2.0 * h);
            assert!((act.deriv(x) - numeric).abs() < 1e-5);
        }
    }

    #[test]
    fn test_logistic_sensitivity_shortcut() {
        // The output-based shortcut must agree with the generic
        // derivative-of-preactivation form.
        let act = Activation::Logistic;
        for &x in &PROBES {
            let out = act.eval(x);
            assert!((act.sensitivity(x, out) - act.deriv(x)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sensitivity_uses_preactivation_for_others() {
        for act in [Activation::Rectifier, Activation::HyperbolicTangent] {
            for &x in &PROBES {
                let out = act.eval(x);
                assert_eq!(act.sensitivity(x, out), act.deriv(x));
            }
        }
    }

    #[test]
    fn test_serde_names() {
        let yaml = serde_yaml::to_string(&Activation::HyperbolicTangent).unwrap();
        assert!(yaml.contains("hyperbolic_tangent"));
        let parsed: Activation = serde_yaml::from_str("logistic").unwrap();
        assert_eq!(parsed, Activation::Logistic);
    }
}
