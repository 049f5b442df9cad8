//! [`Money`]-related definitions.

use derive_more::Display;
use rust_decimal::Decimal;
use serde::Serialize;

/// Amount of money in some [`Currency`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Creates a new [`Money`] clamping negative `amount`s to zero.
    #[must_use]
    pub fn non_negative(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.max(Decimal::ZERO),
            currency,
        }
    }

    /// Indicates whether this [`Money`] amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

/// Three-letter [ISO 4217] code of a [`Money`] currency.
///
/// [ISO 4217]: https://wikipedia.org/wiki/ISO_4217
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Egyptian Pound, the currency courses are priced in unless the backend
    /// says otherwise.
    pub const EGP: &'static str = "EGP";

    /// Creates a new [`Currency`] if the given `code` is three ASCII letters.
    ///
    /// The code is uppercased, so `egp` and `EGP` are the same [`Currency`].
    #[must_use]
    pub fn new(code: impl AsRef<str>) -> Option<Self> {
        let code = code.as_ref().trim();
        (code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()))
            .then(|| Self(code.to_ascii_uppercase()))
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self(Self::EGP.to_owned())
    }
}
