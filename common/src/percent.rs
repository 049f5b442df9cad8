//! [`Percent`]-related definitions.

use derive_more::{Display, Into};
use rust_decimal::{prelude::ToPrimitive as _, Decimal, RoundingStrategy};
use serde::Serialize;

/// Whole percentage in `0..=100` range.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct Percent(u8);

impl Percent {
    /// Zero [`Percent`].
    pub const ZERO: Self = Self(0);

    /// Hundred [`Percent`].
    pub const HUNDRED: Self = Self(100);

    /// Calculates which [`Percent`] the `part` is of the `whole`.
    ///
    /// Half-way values are rounded up (`12.5` becomes `13`), and the result is
    /// clamped into `0..=100` range. Zero or negative `whole` gives
    /// [`Percent::ZERO`].
    #[must_use]
    pub fn of(part: Decimal, whole: Decimal) -> Self {
        if whole <= Decimal::ZERO || part <= Decimal::ZERO {
            return Self::ZERO;
        }
        part.checked_div(whole)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
            .map(|p| {
                p.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            })
            .and_then(|p| p.min(Decimal::ONE_HUNDRED).to_u8())
            .map_or(Self::HUNDRED, Self)
    }

    /// Returns the numeric value of this [`Percent`].
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::Percent;

    fn d(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn ratio_rounds_half_up() {
        assert_eq!(Percent::of(d(96), d(100)).get(), 96);
        assert_eq!(Percent::of(d(1), d(8)).get(), 13);
        assert_eq!(Percent::of(d(1), d(3)).get(), 33);
        assert_eq!(Percent::of(d(2), d(3)).get(), 67);
    }

    #[test]
    fn ratio_is_clamped() {
        assert_eq!(Percent::of(d(150), d(100)), Percent::HUNDRED);
        assert_eq!(Percent::of(d(5), d(0)), Percent::ZERO);
        assert_eq!(Percent::of(d(0), d(30)), Percent::ZERO);
        assert_eq!(Percent::of(d(-3), d(30)), Percent::ZERO);
    }
}
