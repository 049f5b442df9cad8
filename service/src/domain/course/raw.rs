//! [`RawCourseRecord`] definitions and its normalization into a [`Course`].
//!
//! The backend payload is not trusted: any field may be absent, `null` or of
//! an unexpected type. Every field is decoded leniently, so a malformed field
//! degrades to "absent" instead of failing the whole record.

use std::str::FromStr as _;

use common::{Currency, DateTime, Money};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;
use tracing as log;

use super::{Content, ContentKind, Course, Kind, Named, Teacher};

/// Course record as received from the backend.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawCourseRecord {
    /// Identifier, either numeric or textual.
    #[serde(deserialize_with = "lenient::string")]
    pub id: Option<String>,

    /// Title.
    #[serde(deserialize_with = "lenient::string")]
    pub title: Option<String>,

    /// Description.
    #[serde(deserialize_with = "lenient::string")]
    pub description: Option<String>,

    /// Price as a decimal string.
    #[serde(deserialize_with = "lenient::decimal")]
    pub price: Option<Decimal>,

    /// Price before a discount as a decimal string.
    #[serde(deserialize_with = "lenient::decimal")]
    pub original_price: Option<Decimal>,

    /// Discount amount as a decimal string.
    #[serde(deserialize_with = "lenient::decimal")]
    pub discount: Option<Decimal>,

    /// Currency code of the prices.
    #[serde(deserialize_with = "lenient::string")]
    pub currency: Option<String>,

    /// `group` or `private`.
    #[serde(deserialize_with = "lenient::string")]
    pub course_type: Option<String>,

    /// Number of subscribed users.
    #[serde(deserialize_with = "lenient::count")]
    pub subscribers_count: Option<u64>,

    /// Number of enrolled students.
    #[serde(deserialize_with = "lenient::count")]
    pub count_student: Option<u64>,

    /// Explicit capacity.
    #[serde(deserialize_with = "lenient::count")]
    pub max_students: Option<u64>,

    /// Number of views.
    #[serde(deserialize_with = "lenient::count")]
    pub views_count: Option<u64>,

    /// Publication timestamp.
    #[serde(deserialize_with = "lenient::string")]
    pub created_at: Option<String>,

    /// Availability flag, absent meaning active.
    #[serde(deserialize_with = "lenient::boolean")]
    pub active: Option<bool>,

    /// Nested teacher object.
    #[serde(deserialize_with = "lenient::object")]
    pub teacher: Option<RawTeacher>,

    /// Nested category object.
    #[serde(deserialize_with = "lenient::object")]
    pub category: Option<RawNamed>,

    /// Nested subject object.
    #[serde(deserialize_with = "lenient::object")]
    pub subject: Option<RawNamed>,

    /// Nested stage object.
    #[serde(deserialize_with = "lenient::object")]
    pub stage: Option<RawNamed>,

    /// Nested country object.
    #[serde(deserialize_with = "lenient::object")]
    pub country: Option<RawNamed>,

    /// Content items.
    #[serde(deserialize_with = "lenient::list")]
    pub details: Vec<RawContent>,
}

/// Teacher object as received from the backend.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawTeacher {
    /// Display name.
    #[serde(deserialize_with = "lenient::string")]
    pub name: Option<String>,

    /// Rating, usually in `0..=5` range.
    #[serde(deserialize_with = "lenient::decimal")]
    pub rating: Option<Decimal>,

    /// Number of courses.
    #[serde(deserialize_with = "lenient::count")]
    pub courses_count: Option<u64>,

    /// Number of students.
    #[serde(deserialize_with = "lenient::count")]
    pub students_count: Option<u64>,
}

/// Object identified by name only, as received from the backend.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawNamed {
    /// Name.
    #[serde(deserialize_with = "lenient::string")]
    pub name: Option<String>,
}

/// Content item as received from the backend.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawContent {
    /// `video`, `pdf`, `live` or anything else.
    #[serde(deserialize_with = "lenient::string")]
    pub content_type: Option<String>,

    /// Link to a video.
    #[serde(deserialize_with = "lenient::string")]
    pub content_link: Option<String>,

    /// Path to a file.
    #[serde(deserialize_with = "lenient::string")]
    pub file_path: Option<String>,

    /// Date of a live session.
    #[serde(deserialize_with = "lenient::string")]
    pub session_date: Option<String>,
}

impl RawCourseRecord {
    /// Decodes a [`RawCourseRecord`] out of an arbitrary JSON [`Value`].
    ///
    /// [`None`] is returned if the [`Value`] is not a JSON object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        value
            .is_object()
            .then(|| serde_json::from_value(value).ok())
            .flatten()
    }
}

impl Course {
    /// Normalizes the provided [`RawCourseRecord`] into a [`Course`].
    ///
    /// Never fails: malformed or missing fields degrade to their defaults,
    /// with the `currency` used when the record specifies none.
    #[must_use]
    pub fn normalize(raw: RawCourseRecord, currency: &Currency) -> Self {
        let RawCourseRecord {
            id,
            title,
            description,
            price,
            original_price,
            discount,
            currency: raw_currency,
            course_type,
            subscribers_count,
            count_student,
            max_students,
            views_count,
            created_at,
            active,
            teacher,
            category,
            subject,
            stage,
            country,
            details,
        } = raw;

        let currency = raw_currency
            .as_deref()
            .and_then(Currency::new)
            .unwrap_or_else(|| currency.clone());
        let price =
            Money::non_negative(price.unwrap_or(Decimal::ZERO), currency);
        let original_price = original_price
            .filter(|orig| *orig > price.amount);

        let created_at = created_at.as_deref().and_then(|at| {
            DateTime::parse_lenient(at)
                .map_err(|e| {
                    log::debug!("ignoring malformed `created_at` `{at}`: {e}");
                })
                .ok()
                .map(DateTime::coerce)
        });

        let teacher = teacher.map_or_else(Teacher::default, |t| Teacher {
            name: t.name.unwrap_or_default(),
            rating: t.rating.unwrap_or(Decimal::ZERO).max(Decimal::ZERO),
            courses_count: t.courses_count.unwrap_or(0),
            students_count: t.students_count.unwrap_or(0),
        });
        let subject = named(subject);
        let category = Some(named(category).name)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| subject.name.clone());

        Self {
            id: id.unwrap_or_default().into(),
            title: title.unwrap_or_default(),
            description: description.unwrap_or_default(),
            price,
            original_price,
            discount: discount.unwrap_or(Decimal::ZERO).max(Decimal::ZERO),
            course_type: course_type
                .as_deref()
                .and_then(|t| Kind::from_str(t.trim()).ok())
                .unwrap_or(Kind::Private),
            subscribers_count: subscribers_count.unwrap_or(0),
            count_student,
            max_students,
            views_count,
            created_at,
            active: active.unwrap_or(true),
            rating: teacher.rating,
            teacher,
            category,
            subject,
            stage: named(stage),
            country: named(country),
            details: details.into_iter().map(Content::from).collect(),
        }
    }
}

impl From<RawCourseRecord> for Course {
    fn from(raw: RawCourseRecord) -> Self {
        Self::normalize(raw, &Currency::default())
    }
}

impl From<RawContent> for Content {
    fn from(raw: RawContent) -> Self {
        let RawContent {
            content_type,
            content_link,
            file_path,
            session_date,
        } = raw;
        Self {
            kind: content_type
                .as_deref()
                .and_then(|t| ContentKind::from_str(t.trim()).ok())
                .unwrap_or(ContentKind::Other),
            content_link,
            file_path,
            session_date,
        }
    }
}

/// Converts an optional [`RawNamed`] into a [`Named`] with an empty name if
/// missing.
fn named(raw: Option<RawNamed>) -> Named {
    Named {
        name: raw.and_then(|n| n.name).unwrap_or_default(),
    }
}

/// Lenient deserializers never failing on a well-formed JSON input, but
/// turning values of unexpected types into [`None`].
mod lenient {
    use super::{
        value, Decimal, Deserialize as _, DeserializeOwned, Deserializer,
        Value,
    };

    /// Deserializes a string, accepting numbers as well.
    pub(super) fn string<'de, D>(d: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(value::string(&Value::deserialize(d)?))
    }

    /// Deserializes a decimal out of a string or a number.
    pub(super) fn decimal<'de, D>(d: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(value::decimal(&Value::deserialize(d)?))
    }

    /// Deserializes a non-negative counter out of a number or a string.
    pub(super) fn count<'de, D>(d: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(value::count(&Value::deserialize(d)?))
    }

    /// Deserializes a boolean, accepting `0`/`1` and `"true"`/`"false"`.
    pub(super) fn boolean<'de, D>(d: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(value::boolean(&Value::deserialize(d)?))
    }

    /// Deserializes a nested object, if it's an object at all.
    pub(super) fn object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let v = Value::deserialize(d)?;
        Ok(v.is_object().then(|| serde_json::from_value(v).ok()).flatten())
    }

    /// Deserializes a list of objects, skipping non-object elements.
    pub(super) fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|v| serde_json::from_value(v).ok())
                .collect(),
            Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::Object(_) => Vec::new(),
        })
    }
}

/// Coercions of loosely typed JSON [`Value`]s.
pub(crate) mod value {
    use std::str::FromStr as _;

    use rust_decimal::{prelude::ToPrimitive as _, Decimal};
    use serde_json::Value;

    /// Coerces a [`Value`] into a string.
    pub(crate) fn string(v: &Value) -> Option<String> {
        match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
                None
            }
        }
    }

    /// Coerces a [`Value`] into a [`Decimal`].
    pub(crate) fn decimal(v: &Value) -> Option<Decimal> {
        let s = match v {
            Value::String(s) => s.trim().to_owned(),
            Value::Number(n) => n.to_string(),
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
                return None
            }
        };
        Decimal::from_str(&s)
            .or_else(|_| Decimal::from_scientific(&s))
            .ok()
    }

    /// Coerces a [`Value`] into a non-negative counter.
    ///
    /// Fractional values are truncated, negative ones are dropped.
    pub(crate) fn count(v: &Value) -> Option<u64> {
        match v {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .and_then(|f| Decimal::from_f64_retain(f.trunc()))
                    .and_then(|d| d.to_u64())
            }),
            Value::String(_) => decimal(v)
                .filter(|d| !d.is_sign_negative())
                .and_then(|d| d.trunc().to_u64()),
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
                None
            }
        }
    }

    /// Coerces a [`Value`] into a boolean.
    pub(crate) fn boolean(v: &Value) -> Option<bool> {
        match v {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|f| f != 0.0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}
