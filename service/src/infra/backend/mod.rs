//! [`Backend`]-related implementations.

#[cfg(feature = "http")]
pub mod http;

use common::pagination::{self, Page};
use derive_more::{Display, Error as StdError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing as log;

use crate::{
    domain::course::{raw::value, RawCourseRecord},
    read::course::{filter, list::Selector},
};

#[cfg(feature = "http")]
pub use self::http::Http;

/// Backend operation.
pub use common::Handler as Backend;

/// Value of [`Envelope::result`] of a successful response.
pub const SUCCESS: &str = "Success";

/// Request of a course list page.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// [`Filters`] to apply on the backend side.
    pub filters: Filters,

    /// Field to order the courses by.
    pub order_by: &'static str,

    /// `asc` or `desc`.
    pub order_by_direction: &'static str,

    /// Number of courses per page.
    pub per_page: u32,

    /// Indicator whether the response should be paginated.
    pub paginate: bool,

    /// 1-based number of the requested page.
    pub page: u32,
}

impl Request {
    /// Creates a new [`Request`] out of the provided [`Selector`].
    #[must_use]
    pub fn new(selector: &Selector) -> Self {
        let Selector { arguments, filter } = selector;
        let criteria = filter.criteria();
        let (order_by, order) = criteria.sort.order_by();
        let text = |v: &str| filter::constraint(v).map(ToOwned::to_owned);

        Self {
            filters: Filters {
                active: true,
                search: text(&filter.search),
                category: text(&filter.category),
                level: criteria.level.as_ref().map(ToString::to_string),
                price: criteria.price.as_ref().map(ToString::to_string),
                teacher: text(&filter.teacher),
            },
            order_by,
            order_by_direction: order.as_str(),
            per_page: arguments.per_page.get(),
            paginate: true,
            page: arguments.page.get(),
        }
    }
}

/// Filters of a [`Request`].
///
/// Only non-empty ones are sent.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Filters {
    /// Indicator whether only active courses are requested.
    pub active: bool,

    /// Free-text search query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Category name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Level label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Price range token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    /// Teacher name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
}

/// Response envelope of a [`Backend`].
///
/// Numbers may come as strings, and a malformed `meta` or `status` is treated
/// as absent.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Envelope {
    /// [`SUCCESS`] or a failure marker.
    pub result: Option<String>,

    /// Course records, not trusted to be well-formed.
    pub data: Value,

    /// [`pagination::Meta`] of the returned page.
    #[serde(deserialize_with = "meta")]
    pub meta: Option<pagination::Meta>,

    /// Human-readable message.
    pub message: Option<String>,

    /// Status code reported inside the body.
    #[serde(deserialize_with = "status")]
    pub status: Option<u16>,
}

/// Deserializes [`Envelope::meta`] out of an object with numeric or string
/// fields.
fn meta<'de, D>(d: D) -> Result<Option<pagination::Meta>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(fields) = Value::deserialize(d)? else {
        return Ok(None);
    };
    let count = |key: &str| fields.get(key).and_then(value::count);
    let page = |key: &str| {
        count(key).and_then(|n| u32::try_from(n).ok()).unwrap_or_default()
    };

    Ok(Some(pagination::Meta {
        current_page: page("current_page"),
        last_page: page("last_page"),
        total: count("total").unwrap_or_default(),
        from: count("from"),
        to: count("to"),
    }))
}

/// Deserializes [`Envelope::status`] out of a number or a string.
fn status<'de, D>(d: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value::count(&Value::deserialize(d)?).and_then(|n| u16::try_from(n).ok()))
}

impl Envelope {
    /// Creates a successful [`Envelope`] with the provided `data` records.
    #[must_use]
    pub fn success(data: Vec<Value>, meta: Option<pagination::Meta>) -> Self {
        Self {
            result: Some(SUCCESS.to_owned()),
            data: Value::Array(data),
            meta,
            message: None,
            status: Some(200),
        }
    }

    /// Unwraps this [`Envelope`] into a [`Page`] of [`RawCourseRecord`]s.
    ///
    /// Records being not JSON objects are skipped.
    ///
    /// # Errors
    ///
    /// With an [`Error::Rejected`] if the [`Envelope::result`] is not
    /// [`SUCCESS`].
    pub fn into_page(self) -> Result<Page<RawCourseRecord>, Error> {
        let Self {
            result,
            data,
            meta,
            message,
            status,
        } = self;

        if result.as_deref() != Some(SUCCESS) {
            return Err(Error::Rejected {
                status,
                message: message
                    .or(result)
                    .unwrap_or_else(|| "unknown failure".to_owned()),
            });
        }

        let records = match data {
            Value::Array(records) => records,
            Value::Null => vec![],
            other => {
                log::warn!("unexpected `data` in backend response: {other}");
                vec![]
            }
        };
        let items = records
            .into_iter()
            .filter_map(|v| {
                let record = RawCourseRecord::from_value(v);
                if record.is_none() {
                    log::warn!("skipping non-object course record");
                }
                record
            })
            .collect();

        Ok(Page { items, meta })
    }
}

/// [`Backend`] error.
#[derive(Clone, Debug, Display, Eq, PartialEq, StdError)]
pub enum Error {
    /// Failed to reach the [`Backend`].
    #[display("Failed to reach the backend: {_0}")]
    Transport(#[error(not(source))] String),

    /// [`Backend`] responded with a non-success HTTP status.
    #[display("Backend responded with `{_0}` status")]
    Status(#[error(not(source))] u16),

    /// Failed to decode a [`Backend`] response.
    #[display("Failed to decode the backend response: {_0}")]
    Decode(#[error(not(source))] String),

    /// [`Backend`] reported a failure in the [`Envelope`].
    #[display("Backend rejected the request: {message}")]
    Rejected {
        /// Status reported in the [`Envelope`].
        status: Option<u16>,

        /// Message reported in the [`Envelope`].
        message: String,
    },
}
