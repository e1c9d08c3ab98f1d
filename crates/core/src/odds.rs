//! Fractional odds notation and exact rational arithmetic.
//!
//! Bookmakers quote player props in fractional notation: `4/6` means a
//! winning bet of 6 returns 4 in profit plus the stake. Decimal (European)
//! odds fold the stake back in: `1 + 4/6 = 1.667`.
//!
//! ```text
//! "4/6"  -> OddsFraction { 4, 6 } -> decimal 5/3  (1.667)
//! "EVS"  -> OddsFraction { 1, 1 } -> decimal 2    (2.000)
//! "6/4"  -> OddsFraction { 6, 4 } -> decimal 5/2  (2.500)
//! ```
//!
//! All profitability decisions downstream are made on [`Rational`] values so
//! that break-even quotes (e.g. `4/6` against `6/4`) never look profitable
//! because of rounding.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PropError, PropResult};

// =============================================================================
// Rational
// =============================================================================

/// Non-negative exact rational, always stored in lowest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    numer: u128,
    denom: u128,
}

impl Rational {
    /// Zero.
    pub const ZERO: Self = Self { numer: 0, denom: 1 };
    /// One.
    pub const ONE: Self = Self { numer: 1, denom: 1 };

    /// Creates a reduced rational. Returns `None` when `denom` is zero.
    #[must_use]
    pub fn new(numer: u128, denom: u128) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        let g = gcd(numer, denom);
        Some(Self {
            numer: numer / g,
            denom: denom / g,
        })
    }

    /// Creates a rational from a whole number.
    #[must_use]
    pub fn from_integer(value: u128) -> Self {
        Self {
            numer: value,
            denom: 1,
        }
    }

    /// Numerator in lowest terms.
    #[must_use]
    pub fn numer(&self) -> u128 {
        self.numer
    }

    /// Denominator in lowest terms.
    #[must_use]
    pub fn denom(&self) -> u128 {
        self.denom
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.numer == 0
    }

    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let lhs_n = self.numer.checked_mul(rhs.denom)?;
        let rhs_n = rhs.numer.checked_mul(self.denom)?;
        Self::new(lhs_n.checked_add(rhs_n)?, self.denom.checked_mul(rhs.denom)?)
    }

    /// Subtraction; `None` when the result would be negative.
    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        let lhs_n = self.numer.checked_mul(rhs.denom)?;
        let rhs_n = rhs.numer.checked_mul(self.denom)?;
        Self::new(lhs_n.checked_sub(rhs_n)?, self.denom.checked_mul(rhs.denom)?)
    }

    #[must_use]
    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        // Cross-reduce first to keep intermediates small.
        let g1 = gcd(self.numer, rhs.denom);
        let g2 = gcd(rhs.numer, self.denom);
        let numer = (self.numer / g1).checked_mul(rhs.numer / g2)?;
        let denom = (self.denom / g2).checked_mul(rhs.denom / g1)?;
        Self::new(numer, denom)
    }

    /// Division; `None` on division by zero or overflow.
    #[must_use]
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        self.checked_mul(rhs.recip()?)
    }

    /// Reciprocal; `None` for zero.
    #[must_use]
    pub fn recip(self) -> Option<Self> {
        Self::new(self.denom, self.numer)
    }

    /// Lossy conversion to `f64`.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.numer as f64 / self.denom as f64
    }

    /// Converts to a `Decimal` (28 significant digits).
    #[must_use]
    pub fn to_decimal(&self) -> Option<Decimal> {
        let numer = Decimal::try_from_i128_with_scale(i128::try_from(self.numer).ok()?, 0).ok()?;
        let denom = Decimal::try_from_i128_with_scale(i128::try_from(self.denom).ok()?, 0).ok()?;
        numer.checked_div(denom)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        match (
            self.numer.checked_mul(other.denom),
            other.numer.checked_mul(self.denom),
        ) {
            (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
            _ => self
                .to_f64()
                .partial_cmp(&other.to_f64())
                .unwrap_or(Ordering::Equal),
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    if a == 0 {
        1
    } else {
        a
    }
}

// =============================================================================
// OddsFraction
// =============================================================================

/// A bookmaker price in fractional notation.
///
/// Keeps the quoted numerator and denominator (so `4/6` still prints as
/// `4/6`) but compares by value, so `4/6 == 2/3`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OddsFraction {
    numerator: u32,
    denominator: u32,
}

impl OddsFraction {
    /// Evens (`EVS`), i.e. `1/1`.
    pub const EVENS: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    /// Creates odds from explicit parts.
    ///
    /// # Errors
    ///
    /// Returns [`PropError::MalformedOdds`] when `denominator` is zero.
    pub fn new(numerator: u32, denominator: u32) -> PropResult<Self> {
        if denominator == 0 {
            return Err(PropError::MalformedOdds {
                text: format!("{numerator}/{denominator}"),
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Parses `n/d`, `EVS` or `EVENS` (case-insensitive, surrounding
    /// whitespace ignored).
    ///
    /// # Errors
    ///
    /// Returns [`PropError::MalformedOdds`] for empty text, non-numeric
    /// parts, a zero denominator or values that do not fit in `u32`.
    ///
    /// # Examples
    /// ```
    /// use prop_arb_core::odds::OddsFraction;
    ///
    /// let odds = OddsFraction::parse("4/6").unwrap();
    /// assert!((odds.to_decimal() - 1.6666666).abs() < 1e-6);
    /// assert_eq!(OddsFraction::parse("EVS").unwrap(), OddsFraction::parse("1/1").unwrap());
    /// ```
    pub fn parse(text: &str) -> PropResult<Self> {
        let trimmed = text.trim();
        let malformed = || PropError::MalformedOdds {
            text: text.to_string(),
        };

        if trimmed.eq_ignore_ascii_case("EVS") || trimmed.eq_ignore_ascii_case("EVENS") {
            return Ok(Self::EVENS);
        }

        let (numer, denom) = trimmed.split_once('/').ok_or_else(malformed)?;
        if !is_digits(numer) || !is_digits(denom) {
            return Err(malformed());
        }

        let numerator: u32 = numer.parse().map_err(|_| malformed())?;
        let denominator: u32 = denom.parse().map_err(|_| malformed())?;
        if denominator == 0 {
            return Err(malformed());
        }

        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Quoted numerator.
    #[must_use]
    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    /// Quoted denominator.
    #[must_use]
    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// Net profit per unit stake as an exact rational.
    #[must_use]
    pub fn fractional(&self) -> Rational {
        Rational {
            numer: u128::from(self.numerator),
            denom: u128::from(self.denominator),
        }
        .reduced()
    }

    /// Decimal odds `1 + n/d` as an exact rational.
    #[must_use]
    pub fn decimal_odds(&self) -> Rational {
        let numer = u128::from(self.numerator) + u128::from(self.denominator);
        Rational {
            numer,
            denom: u128::from(self.denominator),
        }
        .reduced()
    }

    /// Decimal odds `1 + n/d` in double precision.
    #[must_use]
    pub fn to_decimal(&self) -> f64 {
        1.0 + f64::from(self.numerator) / f64::from(self.denominator)
    }

    /// Probability implied by the price, `1 / decimal_odds`.
    #[must_use]
    pub fn implied_probability(&self) -> Rational {
        let denom = u128::from(self.numerator) + u128::from(self.denominator);
        Rational {
            numer: u128::from(self.denominator),
            denom,
        }
        .reduced()
    }

    /// Exact product of the two fractional (profit-only) prices.
    ///
    /// A product above one is the quick screen the scripts used for a
    /// two-way arbitrage; the evaluator's ROI gate is authoritative.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Rational {
        Rational {
            numer: u128::from(self.numerator) * u128::from(other.numerator),
            denom: u128::from(self.denominator) * u128::from(other.denominator),
        }
        .reduced()
    }
}

impl Rational {
    fn reduced(self) -> Self {
        let g = gcd(self.numer, self.denom);
        Self {
            numer: self.numer / g,
            denom: self.denom / g,
        }
    }
}

impl PartialEq for OddsFraction {
    fn eq(&self, other: &Self) -> bool {
        u64::from(self.numerator) * u64::from(other.denominator)
            == u64::from(other.numerator) * u64::from(self.denominator)
    }
}

impl Eq for OddsFraction {}

impl Hash for OddsFraction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fractional().hash(state);
    }
}

impl fmt::Display for OddsFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for OddsFraction {
    type Err = PropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OddsFraction {
    type Error = PropError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OddsFraction> for String {
    fn from(odds: OddsFraction) -> Self {
        odds.to_string()
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

// =============================================================================
// Token search
// =============================================================================

fn odds_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:\d+/\d+|evens|evs)\b").expect("odds token pattern compiles")
    })
}

/// Finds the first fractional-odds token in free text such as
/// `"Under 0.5 4/6"`.
///
/// Returns the parse result together with the token's byte range, or `None`
/// when the text holds no odds-shaped token at all. A token that looks like
/// odds but cannot be represented (e.g. `4/0`) yields `Err(MalformedOdds)`.
#[must_use]
pub fn find_odds_token(text: &str) -> Option<(PropResult<OddsFraction>, Range<usize>)> {
    let m = odds_token_re().find(text)?;
    Some((OddsFraction::parse(m.as_str()), m.range()))
}
