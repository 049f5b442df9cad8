//! Search, filtering and sorting of [`course::View`]s.

use std::{cmp::Ordering, str::FromStr as _};

use common::pagination::Order;
use derive_more::{Display, Error};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing as log;

use crate::domain::course::{self, Level};

use super::facets::ALL;

/// Filters as selected by a user: raw strings, exactly as presentation hands
/// them.
///
/// An empty string (or the [`ALL`] sentinel) means "no constraint".
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(default)]
pub struct FilterState {
    /// Free-text search query.
    pub search: String,

    /// Category, subject or stage name.
    pub category: String,

    /// [`Level`] label.
    pub level: String,

    /// [`PriceBucket`] token.
    pub price: String,

    /// Teacher name (or its part).
    pub teacher: String,

    /// [`Sort`] key.
    pub sort: String,
}

impl FilterState {
    /// Parses this [`FilterState`] into [`Criteria`].
    ///
    /// Malformed values are logged and ignored, never failing the parsing.
    #[must_use]
    pub fn criteria(&self) -> Criteria {
        let Self {
            search,
            category,
            level,
            price,
            teacher,
            sort,
        } = self;

        let ignore = |e: ValidationError| {
            log::debug!("ignoring filter value: {e}");
        };

        Criteria {
            search: text(search),
            category: text(category),
            level: constraint(level)
                .map(|l| {
                    Level::from_str(l)
                        .map_err(|_| ValidationError::Level(l.to_owned()))
                })
                .transpose()
                .map_err(ignore)
                .ok()
                .flatten(),
            price: constraint(price)
                .map(|p| {
                    PriceBucket::from_str(p)
                        .map_err(|_| ValidationError::Price(p.to_owned()))
                })
                .transpose()
                .map_err(ignore)
                .ok()
                .flatten(),
            teacher: text(teacher),
            sort: constraint(sort)
                .map(|s| {
                    Sort::from_str(s)
                        .map_err(|_| ValidationError::Sort(s.to_owned()))
                })
                .transpose()
                .map_err(ignore)
                .ok()
                .flatten()
                .unwrap_or_default(),
        }
    }
}

/// Returns the trimmed `value` unless it means "no constraint".
pub(crate) fn constraint(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty() && !value.eq_ignore_ascii_case(ALL)).then_some(value)
}

/// Returns the lowercased `value` for case-insensitive matching unless it
/// means "no constraint".
fn text(value: &str) -> Option<String> {
    constraint(value).map(str::to_lowercase)
}

/// Malformed [`FilterState`] value.
#[derive(Clone, Debug, Display, Error)]
pub enum ValidationError {
    /// Unknown [`Level`] label.
    #[display("unknown level `{_0}`")]
    Level(#[error(not(source))] String),

    /// Unknown [`PriceBucket`] token.
    #[display("unknown price range `{_0}`")]
    Price(#[error(not(source))] String),

    /// Unknown [`Sort`] key.
    #[display("unknown sort key `{_0}`")]
    Sort(#[error(not(source))] String),
}

/// Parsed [`FilterState`], with text values lowercased.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Criteria {
    /// Text to search for in any of the searchable fields.
    pub search: Option<String>,

    /// Category, subject or stage to match exactly.
    pub category: Option<String>,

    /// [`Level`] to match.
    pub level: Option<Level>,

    /// [`PriceBucket`] to match.
    pub price: Option<PriceBucket>,

    /// Text to search for in the teacher name.
    pub teacher: Option<String>,

    /// [`Sort`] to order the result by.
    pub sort: Sort,
}

impl Criteria {
    /// Indicates whether the provided [`course::View`] satisfies these
    /// [`Criteria`], ignoring the [`Sort`].
    #[must_use]
    pub fn matches(&self, view: &course::View) -> bool {
        let Self {
            search,
            category,
            level,
            price,
            teacher,
            sort: _,
        } = self;

        let lower = |s: &str| s.to_lowercase();

        if let Some(q) = search {
            let found = [
                &view.title,
                &view.description,
                &view.teacher.name,
                &view.category,
                &view.subject.name,
                &view.stage.name,
            ]
            .into_iter()
            .any(|field| lower(field).contains(q.as_str()));
            if !found {
                return false;
            }
        }

        if let Some(c) = category {
            let found = [&view.category, &view.subject.name, &view.stage.name]
                .into_iter()
                .any(|field| lower(field) == *c);
            if !found {
                return false;
            }
        }

        if level.is_some_and(|l| l != view.level) {
            return false;
        }

        if price.is_some_and(|p| !p.contains(view)) {
            return false;
        }

        if let Some(t) = teacher {
            if !lower(&view.teacher.name).contains(t.as_str()) {
                return false;
            }
        }

        true
    }

    /// Applies these [`Criteria`] to the provided `items`, returning the
    /// matching ones in the [`Sort`] order.
    ///
    /// The sort is stable: items equal by the [`Sort`] key keep their
    /// relative order.
    #[must_use]
    pub fn apply<'a>(
        &self,
        items: impl IntoIterator<Item = &'a course::View>,
    ) -> Vec<course::View> {
        let mut matched = items
            .into_iter()
            .filter(|v| self.matches(v))
            .cloned()
            .collect::<Vec<_>>();
        matched.sort_by(|a, b| self.sort.compare(a, b));
        matched
    }
}

/// Applies the provided [`FilterState`] to the `items`.
///
/// Pure: the `items` are left untouched, and the result is a sorted subset of
/// them.
#[must_use]
pub fn apply(items: &[course::View], state: &FilterState) -> Vec<course::View> {
    state.criteria().apply(items)
}

/// Order of the filtered [`course::View`]s.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    Hash,
    PartialEq,
    strum::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Sort {
    /// Most students first.
    #[default]
    #[display("popular")]
    Popular,

    /// Most recently published first.
    #[display("newest")]
    Newest,

    /// Best rated first.
    #[display("rating")]
    Rating,

    /// Cheapest first.
    #[display("price-low")]
    PriceLow,

    /// Most expensive first.
    #[display("price-high")]
    PriceHigh,
}

impl Sort {
    /// Compares two [`course::View`]s according to this [`Sort`].
    #[must_use]
    pub fn compare(self, a: &course::View, b: &course::View) -> Ordering {
        match self {
            Self::Popular => b.current_students.cmp(&a.current_students),
            Self::Newest => b.created_at.cmp(&a.created_at),
            Self::Rating => b.rating.cmp(&a.rating),
            Self::PriceLow => a.price.amount.cmp(&b.price.amount),
            Self::PriceHigh => b.price.amount.cmp(&a.price.amount),
        }
    }

    /// Returns the backend field and [`Order`] this [`Sort`] maps to.
    #[must_use]
    pub const fn order_by(self) -> (&'static str, Order) {
        match self {
            Self::Popular => ("subscribers_count", Order::Descending),
            Self::Newest => ("created_at", Order::Descending),
            Self::Rating => ("rating", Order::Descending),
            Self::PriceLow => ("price", Order::Ascending),
            Self::PriceHigh => ("price", Order::Descending),
        }
    }
}

/// Named price range of a [`course::View`].
///
/// Ranges exclude their lower bound and include the upper one, so a course
/// priced at exactly `50` is in [`PriceBucket::UpTo50`].
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    Hash,
    PartialEq,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum PriceBucket {
    /// Free courses.
    #[display("free")]
    #[strum(serialize = "free")]
    Free,

    /// Paid courses up to `50` inclusive.
    #[display("$0-$50")]
    #[strum(serialize = "$0-$50")]
    UpTo50,

    /// Courses above `50` up to `100` inclusive.
    #[display("$50-$100")]
    #[strum(serialize = "$50-$100")]
    From50To100,

    /// Courses above `100`.
    #[display("$100+")]
    #[strum(serialize = "$100+")]
    Over100,
}

impl PriceBucket {
    /// Indicates whether the provided [`course::View`] falls into this
    /// [`PriceBucket`].
    #[must_use]
    pub fn contains(self, view: &course::View) -> bool {
        let fifty = Decimal::from(50);
        let hundred = Decimal::ONE_HUNDRED;
        let price = view.price.amount;

        match self {
            Self::Free => view.is_free,
            Self::UpTo50 => !view.is_free && price <= fifty,
            Self::From50To100 => {
                !view.is_free && price > fifty && price <= hundred
            }
            Self::Over100 => !view.is_free && price > hundred,
        }
    }
}
