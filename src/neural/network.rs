//! Feedforward network: weight storage, inference, and batched backprop.

use super::activation::Activation;
use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::StandardNormal;

/// Weights are clamped into this range after every randomize/mutate as a
/// numeric overflow guard. The bounds are far outside any useful weight
/// magnitude; they only keep runaway mutations finite.
pub const WEIGHT_MIN: f64 = i32::MIN as f64;
pub const WEIGHT_MAX: f64 = i32::MAX as f64;

#[inline]
pub(crate) fn clamp_weight(w: f64) -> f64 {
    w.clamp(WEIGHT_MIN, WEIGHT_MAX)
}

/// Per-layer values cached by `infer` for the following
/// `accumulate_gradient` call.
#[derive(Clone, Debug)]
struct Trace {
    /// Pre-activation sums per layer; index 0 (the input layer) is unused.
    sums: Vec<Array1<f64>>,
    /// Activations per layer, without the appended bias constant.
    outputs: Vec<Array1<f64>>,
}

/// A fully-connected feedforward network with a bias column per layer
/// transition.
///
/// Weight matrix `i` has shape `(layer_sizes[i+1], layer_sizes[i] + 1)`;
/// the trailing column multiplies a constant 1 appended to the previous
/// layer's activations.
#[derive(Clone, Debug)]
pub struct Network {
    /// Layer widths, input first. Always at least two entries.
    pub layer_sizes: Vec<usize>,
    /// One weight matrix per layer transition.
    pub weights: Vec<Array2<f64>>,
    /// Summed per-example gradients since the last update.
    gradient: Vec<Array2<f64>>,
    /// Examples accumulated since the last update.
    example_count: usize,
    activation: Activation,
    /// Activations cached by the most recent `infer`, consumed by
    /// `accumulate_gradient`. One backward pass per forward pass.
    trace: Option<Trace>,
}

impl Network {
    /// Create a zero-weight network with the given layer widths.
    ///
    /// Panics if fewer than two layers or a zero width is given; callers
    /// go through `Config::validate` or `Network::load`, which reject both.
    pub fn new(layer_sizes: &[usize], activation: Activation) -> Self {
        assert!(
            layer_sizes.len() >= 2,
            "network needs an input and an output layer"
        );
        assert!(
            layer_sizes.iter().all(|&s| s > 0),
            "layer widths must be positive"
        );

        let weights: Vec<Array2<f64>> = layer_sizes
            .windows(2)
            .map(|pair| Array2::zeros((pair[1], pair[0] + 1)))
            .collect();
        let gradient = weights.clone();

        Self {
            layer_sizes: layer_sizes.to_vec(),
            weights,
            gradient,
            example_count: 0,
            activation,
            trace: None,
        }
    }

    /// Input width.
    #[inline]
    pub fn input_width(&self) -> usize {
        self.layer_sizes[0]
    }

    /// Output width.
    #[inline]
    pub fn output_width(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    /// Activation function used by every neuron.
    #[inline]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Total number of weights, bias columns included.
    pub fn parameter_count(&self) -> usize {
        self.weights.iter().map(|w| w.len()).sum()
    }

    /// Check that no weight is NaN or infinite.
    pub fn is_valid(&self) -> bool {
        self.weights
            .iter()
            .all(|w| w.iter().all(|v| v.is_finite()))
    }

    /// Overwrite every weight with a standard-normal draw scaled by 1/3.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for w in &mut self.weights {
            w.mapv_inplace(|_| {
                let draw: f64 = rng.sample(StandardNormal);
                clamp_weight(draw / 3.0)
            });
        }
        self.trace = None;
    }

    /// Forward pass. Caches per-layer activations for a following
    /// `accumulate_gradient` call.
    pub fn infer(&mut self, input: &[f64]) -> Vec<f64> {
        debug_assert_eq!(input.len(), self.input_width());

        let depth = self.layer_sizes.len();
        let mut sums: Vec<Array1<f64>> = Vec::with_capacity(depth);
        let mut outputs: Vec<Array1<f64>> = Vec::with_capacity(depth);
        sums.push(Array1::zeros(0));
        outputs.push(Array1::from_vec(input.to_vec()));

        for w in &self.weights {
            let aug = augment(&outputs[outputs.len() - 1]);
            let pre = w.dot(&aug);
            let out = pre.mapv(|x| self.activation.eval(x));
            sums.push(pre);
            outputs.push(out);
        }

        let result = outputs[depth - 1].to_vec();
        self.trace = Some(Trace { sums, outputs });
        result
    }

    /// Backward pass against the activations cached by the most recent
    /// `infer`, summing per-weight gradients into the accumulator.
    ///
    /// One accumulation per inference: the cached trace is consumed, and
    /// calling this without a preceding `infer` (or twice in a row) is a
    /// usage error.
    pub fn accumulate_gradient(&mut self, expected: &[f64]) {
        let trace = self
            .trace
            .take()
            .expect("accumulate_gradient requires a preceding infer on this network");
        debug_assert_eq!(expected.len(), self.output_width());

        let depth = self.layer_sizes.len();
        let act = self.activation;

        // Output-layer error signal.
        let mut delta: Vec<Array1<f64>> = vec![Array1::zeros(0); depth];
        let last = depth - 1;
        delta[last] = Array1::from_shape_fn(self.layer_sizes[last], |i| {
            let out = trace.outputs[last][i];
            act.sensitivity(trace.sums[last][i], out) * (out - expected[i])
        });

        // Backpropagate through hidden layers. The bias column does not
        // feed backwards: only the first `layer_sizes[l]` columns of the
        // next transition matrix carry error to layer l.
        for l in (1..last).rev() {
            let w_next = &self.weights[l];
            let d_next = &delta[l + 1];
            let d = Array1::from_shape_fn(self.layer_sizes[l], |j| {
                let sens = act.sensitivity(trace.sums[l][j], trace.outputs[l][j]);
                let mut acc = 0.0;
                for k in 0..self.layer_sizes[l + 1] {
                    acc += d_next[k] * w_next[[k, j]];
                }
                sens * acc
            });
            delta[l] = d;
        }

        // Gradient contribution: source activation times destination error.
        for (t, g) in self.gradient.iter_mut().enumerate() {
            let aug = augment(&trace.outputs[t]);
            let d = &delta[t + 1];
            for j in 0..d.len() {
                for k in 0..aug.len() {
                    g[[j, k]] += aug[k] * d[j];
                }
            }
        }

        self.example_count += 1;
    }

    /// Apply the mean accumulated gradient scaled by `rate`, then clear
    /// the accumulator. A call with nothing accumulated is a no-op.
    pub fn apply_update(&mut self, rate: f64) {
        if self.example_count == 0 {
            return;
        }
        let scale = rate / self.example_count as f64;
        for (w, g) in self.weights.iter_mut().zip(self.gradient.iter_mut()) {
            w.zip_mut_with(g, |w, g| *w -= scale * *g);
            g.fill(0.0);
        }
        self.example_count = 0;
        // Cached activations no longer match the weights.
        self.trace = None;
    }

    /// Examples accumulated since the last update.
    #[inline]
    pub fn example_count(&self) -> usize {
        self.example_count
    }

    /// Discard any cached inference trace. Test helper for paths that
    /// probe the forward pass without a backward pass.
    #[cfg(test)]
    pub(crate) fn clear_trace(&mut self) {
        self.trace = None;
    }

    #[cfg(test)]
    pub(crate) fn gradient_snapshot(&self) -> Vec<Array2<f64>> {
        self.gradient.clone()
    }
}

/// Append the constant bias input to an activation vector.
fn augment(v: &Array1<f64>) -> Array1<f64> {
    let mut aug = Array1::ones(v.len() + 1);
    aug.slice_mut(ndarray::s![..v.len()]).assign(v);
    aug
}
