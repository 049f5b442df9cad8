//! Service contains the course catalog business logic: normalizing raw
//! backend records, deriving display attributes, filtering and incremental
//! loading of pages.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod domain;
pub mod infra;
pub mod loader;
pub mod query;
pub mod read;
#[cfg(test)]
mod fake;

use std::num::NonZeroU32;

use common::{Currency, DateTime};
use smart_default::SmartDefault;

use crate::domain::course;
#[cfg(doc)]
use crate::infra::Backend;

pub use self::{loader::Loader, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// [`Currency`] of prices the backend reports without one.
    pub currency: Currency,

    /// [`course::Rules`] of deriving course attributes.
    pub rules: course::Rules,

    /// Number of courses requested per page.
    #[default(NonZeroU32::MIN.saturating_add(11))]
    pub per_page: NonZeroU32,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<B> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Backend`] of this [`Service`].
    backend: B,

    /// Source of the current [`DateTime`].
    clock: fn() -> DateTime,
}

impl<B> Service<B> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, backend: B) -> Self {
        Self {
            config,
            backend,
            clock: DateTime::now,
        }
    }

    /// Replaces the source of the current [`DateTime`] of this [`Service`].
    #[must_use]
    pub fn with_clock(self, clock: fn() -> DateTime) -> Self {
        Self { clock, ..self }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Backend`] of this [`Service`].
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the current [`DateTime`] as seen by this [`Service`].
    #[must_use]
    pub fn now(&self) -> DateTime {
        (self.clock)()
    }

    /// Creates a new [`Loader`] of pages sized as configured.
    #[must_use]
    pub fn loader(&self) -> Loader {
        Loader::new(self.config.per_page)
    }
}
