//! [`Config`]-related definitions.

use std::{num::NonZeroU32, time};

use common::Currency;
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::domain::course::{
    self,
    view::{BestsellerSignals, DurationStrategy},
};
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Backend configuration.
    #[serde(default)]
    pub backend: Backend,

    /// Catalog configuration.
    #[serde(default)]
    pub catalog: Catalog,

    /// Log configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }

    /// Builds a [`service::Config`] out of this [`Config`].
    ///
    /// # Errors
    ///
    /// If the configured currency is not a valid currency code.
    pub fn service(&self) -> Result<service::Config, ConfigError> {
        let Catalog {
            currency,
            new_window,
            bestseller,
            duration,
        } = &self.catalog;

        Ok(service::Config {
            currency: Currency::new(currency).ok_or_else(|| {
                ConfigError::Message(format!(
                    "`catalog.currency`: `{currency}` is not a currency code",
                ))
            })?,
            rules: course::Rules {
                new_window: *new_window,
                bestseller: *bestseller,
                duration: *duration,
            },
            per_page: self.backend.per_page,
        })
    }
}

/// Backend configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Backend {
    /// URL of the course list endpoint.
    #[default("http://127.0.0.1:8000/api/courses".to_owned())]
    pub url: String,

    /// Timeout of a single request.
    #[default(time::Duration::from_secs(30))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,

    /// Number of courses per page.
    #[default(NonZeroU32::MIN.saturating_add(11))]
    pub per_page: NonZeroU32,
}

/// Catalog configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Catalog {
    /// Currency code of prices reported without one.
    #[default(Currency::EGP.to_owned())]
    pub currency: String,

    /// Period a course is considered new for.
    #[default(time::Duration::from_secs(7 * 24 * 60 * 60))]
    #[serde(with = "humantime_serde")]
    pub new_window: time::Duration,

    /// Signals a course is recognized as a bestseller by.
    pub bestseller: BestsellerSignals,

    /// Strategy of estimating course lengths.
    pub duration: DurationStrategy,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
