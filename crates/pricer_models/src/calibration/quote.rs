//! Observed option quotes used as calibration targets.

use pricer_core::types::OptionKind;

use super::error::QuoteError;

/// An observed European option price.
///
/// Fields are private; construction goes through [`MarketQuote::new`] so a
/// quote that exists is always valid.
///
/// # Examples
/// ```
/// use pricer_models::calibration::MarketQuote;
/// use pricer_core::types::OptionKind;
///
/// let quote = MarketQuote::new(110.0, 1.0, 4.2, OptionKind::Call)
///     .unwrap()
///     .with_weight(0.5)
///     .unwrap();
/// assert_eq!(quote.strike(), 110.0);
/// assert_eq!(quote.weight(), 0.5);
///
/// assert!(MarketQuote::new(110.0, 0.0, 4.2, OptionKind::Call).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "QuoteRecord", into = "QuoteRecord"))]
pub struct MarketQuote {
    strike: f64,
    maturity: f64,
    price: f64,
    kind: OptionKind,
    weight: f64,
}

impl MarketQuote {
    /// Creates a quote with unit weight.
    ///
    /// # Errors
    /// - [`QuoteError::InvalidStrike`] unless `strike > 0` and finite
    /// - [`QuoteError::InvalidMaturity`] unless `maturity > 0` and finite
    /// - [`QuoteError::InvalidPrice`] unless `price >= 0` and finite
    pub fn new(
        strike: f64,
        maturity: f64,
        price: f64,
        kind: OptionKind,
    ) -> Result<Self, QuoteError> {
        if !(strike.is_finite() && strike > 0.0) {
            return Err(QuoteError::InvalidStrike(strike));
        }
        if !(maturity.is_finite() && maturity > 0.0) {
            return Err(QuoteError::InvalidMaturity(maturity));
        }
        if !(price.is_finite() && price >= 0.0) {
            return Err(QuoteError::InvalidPrice(price));
        }
        Ok(Self {
            strike,
            maturity,
            price,
            kind,
            weight: 1.0,
        })
    }

    /// Replaces the likelihood weight.
    ///
    /// A zero weight keeps the quote in the set but removes it from the score.
    pub fn with_weight(mut self, weight: f64) -> Result<Self, QuoteError> {
        if !(weight.is_finite() && weight >= 0.0) {
            return Err(QuoteError::InvalidWeight(weight));
        }
        self.weight = weight;
        Ok(self)
    }

    /// Strike K.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Maturity T in years.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Observed option price.
    #[inline]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Call or put.
    #[inline]
    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    /// Likelihood weight (default 1.0).
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// Unvalidated flat form of a [`MarketQuote`], one row of a quote file.
///
/// Column layout: `strike,maturity,price,kind[,weight]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuoteRecord {
    /// Strike K.
    pub strike: f64,
    /// Maturity T in years.
    pub maturity: f64,
    /// Observed price.
    pub price: f64,
    /// `call` / `put` (also `c` / `p`, case-insensitive).
    pub kind: String,
    /// Optional weight, 1.0 when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight: Option<f64>,
}

impl TryFrom<QuoteRecord> for MarketQuote {
    type Error = QuoteError;

    fn try_from(record: QuoteRecord) -> Result<Self, Self::Error> {
        let kind = record
            .kind
            .parse::<OptionKind>()
            .map_err(|_| QuoteError::UnknownOptionKind(record.kind.clone()))?;
        let quote = MarketQuote::new(record.strike, record.maturity, record.price, kind)?;
        match record.weight {
            Some(weight) => quote.with_weight(weight),
            None => Ok(quote),
        }
    }
}

impl From<MarketQuote> for QuoteRecord {
    fn from(quote: MarketQuote) -> Self {
        Self {
            strike: quote.strike,
            maturity: quote.maturity,
            price: quote.price,
            kind: quote.kind.as_str().to_string(),
            weight: Some(quote.weight),
        }
    }
}
