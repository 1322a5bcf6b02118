//! Type-safe price representation using decimal arithmetic.
//!
//! All prices in the shop are Brazilian reais. The backend sends plain JSON
//! numbers; they are held as [`Decimal`] so cart totals never accumulate
//! floating point error.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in Brazilian reais.
///
/// Displays as `R$ 1234.56`: two decimal places, dot separator, no grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Markup applied to derive the struck-through "list" price on product pages.
    pub const LIST_PRICE_MARKUP: Decimal = Decimal::from_parts(12, 0, 0, false, 1);

    /// Zero reais.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from an amount in centavos.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The list price shown struck through next to the selling price.
    #[must_use]
    pub fn list_price(&self) -> Self {
        Self(self.0 * Self::LIST_PRICE_MARKUP)
    }

    /// Percentage off the list price, rounded to the nearest integer.
    ///
    /// Always 17 for a non-zero price given the fixed markup.
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        let list = self.list_price().0;
        if list.is_zero() {
            return 0;
        }
        let pct = (Decimal::ONE - self.0 / list) * Decimal::ONE_HUNDRED;
        pct.round().try_into().unwrap_or(0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R$ {:.2}", self.0.round_dp(2))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_cents(199_999).to_string(), "R$ 1999.99");
        assert_eq!(Price::from_cents(500).to_string(), "R$ 5.00");
        assert_eq!(Price::ZERO.to_string(), "R$ 0.00");
    }

    #[test]
    fn test_line_total() {
        let total = Price::from_cents(1050) * 3;
        assert_eq!(total, Price::from_cents(3150));
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from_cents(100), Price::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total.to_string(), "R$ 3.50");
    }

    #[test]
    fn test_list_price_and_discount() {
        let price = Price::from_cents(10_000);
        assert_eq!(price.list_price().to_string(), "R$ 120.00");
        assert_eq!(price.discount_percent(), 17);
        assert_eq!(Price::ZERO.discount_percent(), 0);
    }

    #[test]
    fn test_deserialize_json_number() {
        let price: Price = serde_json::from_str("1999.99").unwrap();
        assert_eq!(price, Price::from_cents(199_999));
    }

    #[test]
    fn test_roundtrip_through_session_json() {
        let price = Price::from_cents(4590);
        let json = serde_json::to_string(&price).unwrap();
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }
}
