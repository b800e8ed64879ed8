//! Log-normal yardage samplers fitted from (mean, variance) moment pairs.

use rand::Rng;
use rand_distr::{Distribution, LogNormal};

use crate::error::{Result, SimError};

/// A fitted strictly-positive yardage distribution.
///
/// The fit matches the first two moments in closed form:
/// `sigma = sqrt(ln(1 + variance / mean^2))`, `mu = ln(mean) - sigma^2 / 2`.
/// Fitting is done once per team per matchup; sampling is a pure draw from
/// the fitted parameters and the caller's RNG.
#[derive(Debug, Clone)]
pub struct YardageSampler {
    dist: LogNormal<f64>,
    mean: f64,
    variance: f64,
}

impl YardageSampler {
    pub fn from_moments(mean: f64, variance: f64) -> Result<Self> {
        if !(mean > 0.0) || !(variance >= 0.0) {
            return Err(SimError::InvalidDistribution { mean, variance });
        }
        let sigma = (1.0 + variance / (mean * mean)).ln().sqrt();
        let mu = mean.ln() - sigma * sigma / 2.0;
        let dist = LogNormal::new(mu, sigma)
            .map_err(|_| SimError::InvalidDistribution { mean, variance })?;
        Ok(Self {
            dist,
            mean,
            variance,
        })
    }

    /// One non-negative yardage draw.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.dist.sample(rng)
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }
}
