//! Per-kmer distribution parameters of the pore model.
//!
//! The event-duration distribution has two equivalent parameterizations:
//! (sd_mean, sd_stdv) and the inverse-Gaussian rate form (sd_mean,
//! sd_lambda), related by `lambda = mean^3 / stdv^2`. Only the
//! (mean, stdv) form is stored; the rate form is derived on access so the
//! two can never diverge.

/// Level and duration distribution parameters for one kmer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateParams {
    /// Mean of the signal-level Gaussian, in picoamps.
    pub level_mean: f64,
    /// Standard deviation of the signal-level Gaussian.
    pub level_stdv: f64,
    /// Mean of the event-duration distribution.
    pub sd_mean: f64,
    /// Standard deviation of the event-duration distribution.
    pub sd_stdv: f64,
}

impl StateParams {
    pub fn new(level_mean: f64, level_stdv: f64, sd_mean: f64, sd_stdv: f64) -> Self {
        StateParams {
            level_mean,
            level_stdv,
            sd_mean,
            sd_stdv,
        }
    }

    /// Construction from the rate parameterization; sd_stdv is derived via
    /// `stdv = sqrt(mean^3 / lambda)`.
    pub fn with_sd_lambda(level_mean: f64, level_stdv: f64, sd_mean: f64, sd_lambda: f64) -> Self {
        StateParams {
            level_mean,
            level_stdv,
            sd_mean,
            sd_stdv: (sd_mean.powi(3) / sd_lambda).sqrt(),
        }
    }

    /// Rate of the duration distribution: `mean^3 / stdv^2`.
    pub fn sd_lambda(&self) -> f64 {
        self.sd_mean.powi(3) / self.sd_stdv.powi(2)
    }

    pub fn sd_log_lambda(&self) -> f64 {
        self.sd_lambda().ln()
    }

    pub fn level_log_stdv(&self) -> f64 {
        self.level_stdv.ln()
    }
}

/// Gaussian parameters with the log of the standard deviation computed
/// once, so likelihood evaluation avoids a log per emission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianParameters {
    pub mean: f64,
    pub stdv: f64,
    pub log_stdv: f64,
}

impl GaussianParameters {
    pub fn new(mean: f64, stdv: f64) -> Self {
        GaussianParameters {
            mean,
            stdv,
            log_stdv: stdv.ln(),
        }
    }
}
