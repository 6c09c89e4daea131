//! Posterior summaries of a chain.

use std::fmt;

use pricer_models::models::{HestonParams, PARAM_NAMES};

/// Mean, median and 5%/95% percentiles of one parameter.
///
/// Percentiles use the order statistics `sorted[floor(0.05 n)]` and
/// `sorted[max(floor(0.95 n) - 1, 0)]`; the median averages the two middle
/// values for even `n`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterSummary {
    /// Arithmetic mean.
    pub mean: f64,
    /// Median.
    pub median: f64,
    /// Lower percentile.
    pub p05: f64,
    /// Upper percentile.
    pub p95: f64,
}

impl ParameterSummary {
    /// Summarises `values`; `None` when empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let n = values.len();
        if n == 0 {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = sorted.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            0.5 * (sorted[n / 2 - 1] + sorted[n / 2])
        } else {
            sorted[n / 2]
        };
        let lo = ((0.05 * n as f64).floor() as usize).min(n - 1);
        let hi = ((0.95 * n as f64).floor() as usize).saturating_sub(1);

        Some(Self {
            mean,
            median,
            p05: sorted[lo],
            p95: sorted[hi],
        })
    }
}

impl fmt::Display for ParameterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean={:.4} median={:.4} p05={:.4} p95={:.4}",
            self.mean, self.median, self.p05, self.p95
        )
    }
}

/// Per-parameter summaries of a set of posterior draws.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PosteriorSummary {
    /// Mean-reversion speed
    pub kappa: ParameterSummary,
    /// Long-run variance
    pub theta: ParameterSummary,
    /// Volatility of variance
    pub sigma_v: ParameterSummary,
    /// Spot/variance correlation
    pub rho: ParameterSummary,
    /// Initial variance
    pub v0: ParameterSummary,
}

impl PosteriorSummary {
    /// Summarises `draws`; `None` when empty.
    pub fn from_draws(draws: &[HestonParams]) -> Option<Self> {
        let column = |pick: fn(&HestonParams) -> f64| {
            let values: Vec<f64> = draws.iter().map(pick).collect();
            ParameterSummary::from_values(&values)
        };
        Some(Self {
            kappa: column(|p| p.kappa)?,
            theta: column(|p| p.theta)?,
            sigma_v: column(|p| p.sigma_v)?,
            rho: column(|p| p.rho)?,
            v0: column(|p| p.v0)?,
        })
    }

    /// Posterior means as a parameter set.
    pub fn mean(&self) -> HestonParams {
        HestonParams {
            kappa: self.kappa.mean,
            theta: self.theta.mean,
            sigma_v: self.sigma_v.mean,
            rho: self.rho.mean,
            v0: self.v0.mean,
        }
    }

    /// Summary by parameter name.
    pub fn get(&self, name: &str) -> Option<&ParameterSummary> {
        match name {
            "kappa" => Some(&self.kappa),
            "theta" => Some(&self.theta),
            "sigma_v" => Some(&self.sigma_v),
            "rho" => Some(&self.rho),
            "v0" => Some(&self.v0),
            _ => None,
        }
    }

    /// `(name, summary)` pairs in canonical parameter order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParameterSummary)> {
        [&self.kappa, &self.theta, &self.sigma_v, &self.rho, &self.v0]
            .into_iter()
            .zip(PARAM_NAMES)
            .map(|(s, name)| (name, s))
    }
}

impl fmt::Display for PosteriorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, summary) in self.iter() {
            writeln!(f, "{:>8}: {}", name, summary)?;
        }
        Ok(())
    }
}
