//! [`course::View`]-related read definitions.

pub mod facets;
pub mod filter;

use crate::domain::course;

pub use self::{
    facets::{Facets, ALL},
    filter::{apply, Criteria, FilterState, PriceBucket, Sort, ValidationError},
};

/// Returns up to `limit` of the most recently published active `items`.
///
/// [`course::View`]s without a known publication date go last.
#[must_use]
pub fn latest(items: &[course::View], limit: usize) -> Vec<course::View> {
    let mut active = items
        .iter()
        .filter(|v| v.active)
        .cloned()
        .collect::<Vec<_>>();
    active.sort_by(|a, b| Sort::Newest.compare(a, b));
    active.truncate(limit);
    active
}

pub mod list {
    //! [`course::View`] list definitions.

    use common::define_pagination;

    use super::FilterState;
    #[cfg(doc)]
    use crate::domain::course;

    define_pagination!(Node, FilterState);

    /// Node in a [`Page`].
    pub type Node = crate::domain::course::View;
}
