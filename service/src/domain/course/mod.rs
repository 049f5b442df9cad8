//! [`Course`] definitions.

pub mod raw;
pub mod view;

use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, Into};
use rust_decimal::Decimal;
use serde::Serialize;

pub use self::{
    raw::RawCourseRecord,
    view::{Enrollment, Level, ProgressStatus, Rules, View},
};

/// Normalized course, safe to compute anything on without checking for
/// missing fields.
///
/// Built out of a [`RawCourseRecord`] with [`Course::normalize()`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// ID of this [`Course`].
    pub id: Id,

    /// Title of this [`Course`].
    pub title: String,

    /// Description of this [`Course`].
    pub description: String,

    /// Current price of this [`Course`], never negative.
    pub price: Money,

    /// Price of this [`Course`] before a discount.
    ///
    /// Only present when strictly greater than the [`Course::price`].
    pub original_price: Option<Decimal>,

    /// Discount amount reported by the backend, never negative.
    pub discount: Decimal,

    /// [`Kind`] of this [`Course`].
    pub course_type: Kind,

    /// Number of users subscribed to this [`Course`].
    pub subscribers_count: u64,

    /// Number of students enrolled, if the backend reports it.
    pub count_student: Option<u64>,

    /// Explicit capacity of this [`Course`], if set.
    ///
    /// Not serialized: the effective capacity of a group [`Course`] is
    /// exposed by its [`Enrollment`] instead.
    #[serde(skip_serializing)]
    pub max_students: Option<u64>,

    /// Number of views of this [`Course`], if the backend tracks them.
    pub views_count: Option<u64>,

    /// [`DateTime`] when this [`Course`] was published, if known.
    ///
    /// [`DateTime`]: common::DateTime
    #[serde(with = "common::datetime::serde::rfc3339_option")]
    pub created_at: Option<CreationDateTime>,

    /// Indicator whether this [`Course`] is available for enrollment.
    pub active: bool,

    /// [`Teacher`] of this [`Course`].
    pub teacher: Teacher,

    /// Category name of this [`Course`], falling back to its subject.
    pub category: String,

    /// Subject of this [`Course`].
    pub subject: Named,

    /// Educational stage this [`Course`] targets.
    pub stage: Named,

    /// Country this [`Course`] is offered in.
    pub country: Named,

    /// Rating of this [`Course`], which is the rating of its [`Teacher`].
    pub rating: Decimal,

    /// Content items of this [`Course`], in the backend order.
    pub details: Vec<Content>,
}

impl Course {
    /// Indicates whether this [`Course`] is a [`Kind::Group`] one.
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.course_type == Kind::Group
    }
}

/// ID of a [`Course`].
#[derive(
    AsRef, Clone, Debug, Default, Display, Eq, From, Hash, Into, PartialEq,
    Serialize,
)]
#[as_ref(forward)]
#[serde(transparent)]
pub struct Id(String);

/// [`DateTime`] when a [`Course`] was published.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<unit::Creation>;

define_kind! {
    #[doc = "Kind of a [`Course`]."]
    enum Kind {
        #[doc = "Course with a capacity cap and a seats indicator."]
        Group,

        #[doc = "One-to-one course without an enrollment cap."]
        Private,
    }
}

define_kind! {
    #[doc = "Kind of a [`Content`] item."]
    enum ContentKind {
        #[doc = "Recorded video lesson."]
        Video,

        #[doc = "PDF document."]
        Pdf,

        #[doc = "Live session."]
        Live,

        #[doc = "Anything else."]
        Other,
    }
}

/// Content item of a [`Course`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// [`ContentKind`] of this [`Content`].
    pub kind: ContentKind,

    /// Link to the video, if this is a [`ContentKind::Video`].
    pub content_link: Option<String>,

    /// Path to the file, if this is a [`ContentKind::Pdf`].
    pub file_path: Option<String>,

    /// Date of the session, if this is a [`ContentKind::Live`].
    pub session_date: Option<String>,
}

/// Teacher of a [`Course`].
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    /// Display name of this [`Teacher`], empty if unknown.
    pub name: String,

    /// Rating of this [`Teacher`], never negative.
    pub rating: Decimal,

    /// Number of courses this [`Teacher`] runs.
    pub courses_count: u64,

    /// Number of students this [`Teacher`] has across all courses.
    pub students_count: u64,
}

/// Object identified by its name only (subject, stage, country, category).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Named {
    /// Name of this object, empty if unknown.
    pub name: String,
}
