//! Heteroskedastic Gaussian likelihood of observed option prices.
//!
//! ```text
//! ln L = Σ_q w_q [ -½ ((model_q - obs_q) / sd_q)² - ln(sd_q √(2π)) ]
//! sd_q = max(noise_floor, 0.01 (1 + K_q / max(S, 1e-6)))
//! ```
//!
//! Every quote is priced through the pluggable [`OptionPricer`] with one fixed
//! [`SimulationConfig`]. Because its seed never changes during a run, all
//! candidate parameter sets are scored on common random numbers.

use pricer_models::analytical::normal_log_pdf;
use pricer_models::calibration::{MarketQuote, QuoteRecord};
use pricer_models::models::HestonParams;
use pricer_pricing::engine::{OptionPricer, PricingRequest};
use pricer_pricing::mc::SimulationConfig;

use crate::OptimiserError;

/// Lower bound applied to the spot in the observation-noise scale.
const SPOT_FLOOR: f64 = 1e-6;

/// Market state shared by every quote.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketInputs {
    /// Spot price S.
    pub spot: f64,
    /// Continuously compounded risk-free rate r.
    pub rate: f64,
    /// Continuous carry / dividend yield q.
    pub carry: f64,
}

impl MarketInputs {
    /// Bundles spot, rate and carry.
    pub fn new(spot: f64, rate: f64, carry: f64) -> Self {
        Self { spot, rate, carry }
    }

    /// Spot must be positive and finite; rate and carry finite.
    pub fn validate(&self) -> Result<(), OptimiserError> {
        if !(self.spot.is_finite() && self.spot > 0.0) {
            return Err(OptimiserError::InvalidConfig(format!(
                "spot = {} (must be positive and finite)",
                self.spot
            )));
        }
        if !(self.rate.is_finite() && self.carry.is_finite()) {
            return Err(OptimiserError::InvalidConfig(format!(
                "rate = {}, carry = {} (must be finite)",
                self.rate, self.carry
            )));
        }
        Ok(())
    }
}

/// Validates flat quote records, reporting the first bad row.
///
/// # Errors
///
/// [`OptimiserError::InvalidQuote`] with the zero-based row index.
pub fn quotes_from_records<I>(records: I) -> Result<Vec<MarketQuote>, OptimiserError>
where
    I: IntoIterator<Item = QuoteRecord>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            MarketQuote::try_from(record).map_err(|source| OptimiserError::InvalidQuote { index, source })
        })
        .collect()
}

/// Gaussian price likelihood over a fixed quote set.
#[derive(Clone, Debug)]
pub struct GaussianLikelihood<P> {
    market: MarketInputs,
    quotes: Vec<MarketQuote>,
    simulation: SimulationConfig,
    noise_floor: f64,
    pricer: P,
}

impl<P: OptionPricer> GaussianLikelihood<P> {
    /// Creates the likelihood.
    ///
    /// # Errors
    ///
    /// - [`OptimiserError::EmptyQuotes`] for an empty quote set
    /// - [`OptimiserError::InvalidConfig`] for a bad market or a noise floor
    ///   that is not positive and finite
    pub fn new(
        market: MarketInputs,
        quotes: Vec<MarketQuote>,
        simulation: SimulationConfig,
        noise_floor: f64,
        pricer: P,
    ) -> Result<Self, OptimiserError> {
        market.validate()?;
        if quotes.is_empty() {
            return Err(OptimiserError::EmptyQuotes);
        }
        if !(noise_floor.is_finite() && noise_floor > 0.0) {
            return Err(OptimiserError::InvalidConfig(format!(
                "noise floor = {} (must be positive and finite)",
                noise_floor
            )));
        }
        Ok(Self {
            market,
            quotes,
            simulation,
            noise_floor,
            pricer,
        })
    }

    /// Market inputs.
    pub fn market(&self) -> &MarketInputs {
        &self.market
    }

    /// Quote set.
    pub fn quotes(&self) -> &[MarketQuote] {
        &self.quotes
    }

    /// Simulation config used for every pricing call.
    pub fn simulation(&self) -> &SimulationConfig {
        &self.simulation
    }

    /// Observation standard deviation for a quote struck at `strike`.
    #[inline]
    pub fn observation_sd(&self, strike: f64) -> f64 {
        let scale = 0.01 * (1.0 + strike / self.market.spot.max(SPOT_FLOOR));
        self.noise_floor.max(scale)
    }

    /// Pricing request for one quote.
    pub fn request(&self, quote: &MarketQuote, params: &HestonParams) -> PricingRequest {
        PricingRequest {
            spot: self.market.spot,
            strike: quote.strike(),
            maturity: quote.maturity(),
            rate: self.market.rate,
            carry: self.market.carry,
            params: *params,
            config: self.simulation,
            kind: quote.kind(),
        }
    }

    /// Weighted log-likelihood of the quotes under `params`.
    ///
    /// # Errors
    ///
    /// Propagates pricer failures as [`OptimiserError::Pricing`].
    pub fn log_likelihood(&self, params: &HestonParams) -> Result<f64, OptimiserError> {
        self.quotes.iter().try_fold(0.0, |acc, quote| {
            let model = self.pricer.price(&self.request(quote, params))?.price;
            let sd = self.observation_sd(quote.strike());
            Ok(acc + quote.weight() * normal_log_pdf(model, quote.price(), sd))
        })
    }
}
