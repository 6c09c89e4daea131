//! European option kinds.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// European option kind.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionKind;
///
/// assert_eq!(OptionKind::Call.payoff(120.0, 100.0), 20.0);
/// assert_eq!(OptionKind::Put.payoff(80.0, 100.0), 20.0);
/// assert_eq!(OptionKind::default(), OptionKind::Call);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionKind {
    /// Right to buy at the strike: max(S - K, 0).
    #[default]
    Call,
    /// Right to sell at the strike: max(K - S, 0).
    Put,
}

impl OptionKind {
    /// Terminal payoff for an underlying level `spot` and strike `strike`.
    #[inline]
    pub fn payoff(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionKind::Call => (spot - strike).max(0.0),
            OptionKind::Put => (strike - spot).max(0.0),
        }
    }

    /// Returns `true` for calls.
    #[inline]
    pub fn is_call(self) -> bool {
        matches!(self, OptionKind::Call)
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            OptionKind::Call => "call",
            OptionKind::Put => "put",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown option kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown option kind: {0} (expected call or put)")]
pub struct ParseOptionKindError(pub String);

impl FromStr for OptionKind {
    type Err = ParseOptionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "call" | "c" => Ok(OptionKind::Call),
            "put" | "p" => Ok(OptionKind::Put),
            _ => Err(ParseOptionKindError(s.to_string())),
        }
    }
}
