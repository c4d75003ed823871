//! Weight mutation for the evolutionary trainer.

use super::network::{clamp_weight, Network};
use rand::Rng;
use rand_distr::StandardNormal;

impl Network {
    /// Independently perturb each weight with probability `rate` by
    /// `step` times a standard-normal draw, then reapply the overflow
    /// clamp.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R, rate: f64, step: f64) {
        for w in &mut self.weights {
            w.mapv_inplace(|v| {
                if rng.gen::<f64>() < rate {
                    let draw: f64 = rng.sample(StandardNormal);
                    clamp_weight(v + step * draw)
                } else {
                    v
                }
            });
        }
    }
}
