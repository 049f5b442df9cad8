//! [`Facets`] of a [`course::View`]s list.

use itertools::Itertools as _;
use serde::Serialize;
use strum::IntoEnumIterator as _;

use crate::domain::course::{self, Level};

use super::PriceBucket;

/// Sentinel option meaning "no constraint".
pub const ALL: &str = "All";

/// Options available for filtering a [`course::View`]s list.
///
/// Every list starts with the [`ALL`] sentinel.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    /// Distinct category names, in the order first seen.
    pub categories: Vec<String>,

    /// Distinct teacher names, in the order first seen.
    pub teachers: Vec<String>,

    /// Every [`Level`] label.
    pub levels: Vec<String>,

    /// Every [`PriceBucket`] token.
    pub price_ranges: Vec<String>,
}

impl Facets {
    /// Collects [`Facets`] out of the provided `items`.
    #[must_use]
    pub fn of<'a>(items: impl IntoIterator<Item = &'a course::View>) -> Self {
        let items = items.into_iter().collect::<Vec<_>>();

        Self {
            categories: distinct(items.iter().map(|v| v.category.as_str())),
            teachers: distinct(items.iter().map(|v| v.teacher.name.as_str())),
            levels: with_all(Level::iter().map(|l| l.to_string())),
            price_ranges: with_all(PriceBucket::iter().map(|p| p.to_string())),
        }
    }
}

/// Returns the distinct non-empty `names` prepended with the [`ALL`]
/// sentinel.
fn distinct<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    with_all(
        names
            .filter(|n| !n.is_empty())
            .unique()
            .map(ToOwned::to_owned),
    )
}

/// Prepends the [`ALL`] sentinel to the provided `options`.
fn with_all(options: impl IntoIterator<Item = String>) -> Vec<String> {
    std::iter::once(ALL.to_owned()).chain(options).collect()
}

#[cfg(test)]
mod spec {
    use common::DateTime;
    use serde_json::json;

    use super::Facets;
    use crate::domain::course::{self, Course, RawCourseRecord, Rules};

    fn view(v: serde_json::Value) -> course::View {
        course::View::derive(
            Course::from(RawCourseRecord::from_value(v).unwrap()),
            &Rules::default(),
            DateTime::from_unix_timestamp(0).unwrap(),
        )
    }

    #[test]
    fn collects_distinct_names_in_order() {
        let items = [
            view(json!({"subject": {"name": "Math"}, "teacher": {"name": "Omar"}})),
            view(json!({"category": {"name": "Arts"}, "teacher": {"name": "Mona"}})),
            view(json!({"subject": {"name": "Math"}, "teacher": {"name": "Omar"}})),
            view(json!({})),
        ];

        let facets = Facets::of(&items);

        assert_eq!(facets.categories, ["All", "Math", "Arts"]);
        assert_eq!(facets.teachers, ["All", "Omar", "Mona"]);
    }

    #[test]
    fn fixed_lists() {
        let facets = Facets::of(std::iter::empty());

        assert_eq!(facets.categories, ["All"]);
        assert_eq!(facets.teachers, ["All"]);
        assert_eq!(
            facets.levels,
            ["All", "Beginner", "Intermediate", "Advanced", "All Levels"],
        );
        assert_eq!(
            facets.price_ranges,
            ["All", "free", "$0-$50", "$50-$100", "$100+"],
        );
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(Facets::of(std::iter::empty())).unwrap();

        assert_eq!(json["priceRanges"][1], "free");
    }
}
