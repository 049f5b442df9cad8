//! Abstractions for page-number pagination.

use std::num::NonZeroU32;

use serde::Serialize;

/// Pagination arguments: which page to request and how large it is.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Arguments {
    /// 1-based number of the requested page.
    pub page: NonZeroU32,

    /// Number of items per page.
    pub per_page: NonZeroU32,
}

impl Arguments {
    /// Creates [`Arguments`] requesting the first page.
    #[must_use]
    pub const fn first(per_page: NonZeroU32) -> Self {
        Self {
            page: NonZeroU32::MIN,
            per_page,
        }
    }

    /// Returns [`Arguments`] requesting the page following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            per_page: self.per_page,
        }
    }
}

/// Information about a page, as reported by the page source.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
pub struct Meta {
    /// Number of this page.
    pub current_page: u32,

    /// Number of the last available page.
    pub last_page: u32,

    /// Total number of items across all pages.
    pub total: u64,

    /// 1-based index of the first item on this page, if any.
    pub from: Option<u64>,

    /// 1-based index of the last item on this page, if any.
    pub to: Option<u64>,
}

impl Meta {
    /// Indicates whether there are pages after this one.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// A page of `I`tems.
#[derive(Clone, Debug)]
pub struct Page<I> {
    /// Items on this [`Page`], in the source order.
    pub items: Vec<I>,

    /// [`Meta`] information of this [`Page`], if the source reported it.
    pub meta: Option<Meta>,
}

impl<I> Page<I> {
    /// Indicates whether there are pages after this one.
    ///
    /// A [`Page`] without [`Meta`] is considered the last one.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.meta.as_ref().is_some_and(Meta::has_more)
    }
}

/// Pagination selector.
#[derive(Clone, Debug)]
pub struct Selector<F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Additional filter being applied to the result.
    pub filter: F,
}

/// Order of a sorted page.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Order {
    /// Ascending order.
    Ascending,

    /// Descending order.
    Descending,
}

impl Order {
    /// Returns the wire representation of this [`Order`].
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Defines pagination types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty, $filter:ty) => {
        #[doc = "A [`Page`] of nodes."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$filter>;
    };
}

#[cfg(test)]
mod spec {
    use std::num::NonZeroU32;

    use super::{Arguments, Meta, Page};

    #[test]
    fn has_more_follows_meta() {
        let meta = |current_page, last_page| Meta {
            current_page,
            last_page,
            ..Meta::default()
        };

        assert!(meta(1, 3).has_more());
        assert!(!meta(3, 3).has_more());
        assert!(!meta(4, 3).has_more());

        let page = Page {
            items: vec![1, 2],
            meta: Some(meta(1, 2)),
        };
        assert!(page.has_more());
        assert!(!Page { items: vec![1], meta: None }.has_more());
    }

    #[test]
    fn next_arguments() {
        let per_page = NonZeroU32::new(12).unwrap();
        let args = Arguments::first(per_page).next();

        assert_eq!(args.page.get(), 2);
        assert_eq!(args.per_page, per_page);
    }
}
