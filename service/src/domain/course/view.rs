//! [`View`] of a [`Course`] with all the derived attributes computed.

use std::time::Duration;

use common::{DateTime, Percent};
use derive_more::Deref;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use super::{Content, ContentKind, Course};

/// [`Course`] along with its derived attributes, ready for display.
#[derive(Clone, Debug, Deref, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    /// Underlying normalized [`Course`].
    #[deref]
    #[serde(flatten)]
    pub course: Course,

    /// Discount relative to the original price.
    pub discount_percent: Percent,

    /// Indicator whether the [`Course`] costs nothing.
    pub is_free: bool,

    /// [`Level`] of the [`Course`].
    pub level: Level,

    /// Human-readable estimation of the [`Course`] length.
    pub duration_label: &'static str,

    /// Indicator whether the [`Course`] was published recently.
    pub is_new: bool,

    /// Indicator whether the [`Course`] sells well.
    pub is_bestseller: bool,

    /// Number of students currently in the [`Course`].
    pub current_students: u64,

    /// [`Enrollment`] state, for group [`Course`]s only.
    #[serde(flatten)]
    pub enrollment: Option<Enrollment>,
}

/// Enrollment state of a group [`Course`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    /// Capacity of the [`Course`].
    pub max_students: u64,

    /// Number of seats left.
    pub remaining_seats: u64,

    /// How full the [`Course`] is.
    #[serde(rename = "enrollmentProgressPercent")]
    pub progress: Percent,

    /// [`ProgressStatus`] of the [`Course`].
    #[serde(rename = "progressStatus")]
    pub status: ProgressStatus,
}

/// Difficulty level of a [`Course`], guessed out of its title.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Level {
    /// Introductory course.
    Beginner,

    /// Course requiring some background.
    Intermediate,

    /// Course for experienced students.
    Advanced,

    /// Course suitable for everyone.
    #[serde(rename = "All Levels")]
    #[strum(to_string = "All Levels", serialize = "AllLevels", serialize = "all-levels")]
    AllLevels,
}

impl Level {
    /// Title keywords of a [`Level::Beginner`] [`Course`].
    const BEGINNER: &'static [&'static str] = &["basic", "intro", "beginner"];

    /// Title keywords of a [`Level::Advanced`] [`Course`].
    const ADVANCED: &'static [&'static str] = &["advanced", "expert"];

    /// Title keywords of a [`Level::Intermediate`] [`Course`].
    const INTERMEDIATE: &'static [&'static str] = &["intermediate"];

    /// Classifies the provided [`Course`] `title`.
    ///
    /// Keywords are matched case-insensitively in [`Level::Beginner`],
    /// [`Level::Advanced`], [`Level::Intermediate`] order, the first match
    /// wins.
    #[must_use]
    pub fn of_title(title: &str) -> Self {
        let title = title.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| title.contains(w));

        if has(Self::BEGINNER) {
            Self::Beginner
        } else if has(Self::ADVANCED) {
            Self::Advanced
        } else if has(Self::INTERMEDIATE) {
            Self::Intermediate
        } else {
            Self::AllLevels
        }
    }
}

/// Urgency of enrolling into a group [`Course`].
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProgressStatus {
    /// Plenty of seats left.
    Available,

    /// At least 70% of seats taken.
    FillingFast,

    /// At least 90% of seats taken.
    AlmostFull,
}

impl From<Percent> for ProgressStatus {
    fn from(progress: Percent) -> Self {
        match progress.get() {
            90.. => Self::AlmostFull,
            70..=89 => Self::FillingFast,
            _ => Self::Available,
        }
    }
}

/// Strategy of estimating a [`Course`] length out of its [`Content`].
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum DurationStrategy {
    /// Buckets the number of [`Content`] items.
    #[default]
    ContentCount,

    /// Sums up per-[`ContentKind`] weights and buckets the total hours.
    ///
    /// Deprecated in favor of [`DurationStrategy::ContentCount`], kept for
    /// catalogs still relying on its labels.
    Weighted,
}

impl DurationStrategy {
    /// Label of a [`Course`] without any [`Content`].
    pub const FLEXIBLE: &'static str = "Flexible";

    /// Returns a label estimating the length of the provided `details`.
    #[must_use]
    pub fn label(self, details: &[Content]) -> &'static str {
        match self {
            Self::ContentCount => match details.len() {
                0 => Self::FLEXIBLE,
                1..=5 => "2-4 hours",
                6..=10 => "5-8 hours",
                _ => "8+ hours",
            },
            Self::Weighted => {
                let minutes: u64 = details
                    .iter()
                    .map(|c| match c.kind {
                        ContentKind::Video => 45,
                        ContentKind::Pdf => 30,
                        ContentKind::Live => 60,
                        ContentKind::Other => 0,
                    })
                    .sum();
                match minutes {
                    0 => Self::FLEXIBLE,
                    1..=120 => "1-2 hours",
                    121..=300 => "3-5 hours",
                    301..=600 => "6-10 hours",
                    _ => "10+ hours",
                }
            }
        }
    }
}

/// Set of signals a [`Course`] is recognized as a bestseller by.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum BestsellerSignals {
    /// Only the subscribers count is known: more than `5` subscribers.
    #[default]
    Subscribers,

    /// Engagement counters are known: more than `500` views or more than `50`
    /// students.
    Engagement,
}

impl BestsellerSignals {
    /// Indicates whether the provided [`Course`] is a bestseller.
    #[must_use]
    pub fn is_bestseller(self, course: &Course) -> bool {
        match self {
            Self::Subscribers => course.subscribers_count > 5,
            Self::Engagement => {
                course.views_count.is_some_and(|v| v > 500)
                    || course.count_student.is_some_and(|c| c > 50)
            }
        }
    }
}

/// Rules of deriving [`View`] attributes.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Rules {
    /// Period a [`Course`] is considered new for after its publication.
    #[default(Duration::from_secs(7 * 24 * 60 * 60))]
    pub new_window: Duration,

    /// [`BestsellerSignals`] available in the catalog.
    pub bestseller: BestsellerSignals,

    /// [`DurationStrategy`] to label [`Course`] lengths with.
    pub duration: DurationStrategy,
}

impl Rules {
    /// Returns the [`Rules::new_window`] in whole days, rounding up.
    fn new_window_days(&self) -> i64 {
        i64::try_from(self.new_window.as_secs().div_ceil(24 * 60 * 60))
            .unwrap_or(i64::MAX)
    }
}

impl View {
    /// Derives a [`View`] of the provided [`Course`] at the `now` moment.
    #[must_use]
    pub fn derive(course: Course, rules: &Rules, now: DateTime) -> Self {
        let is_free = course.price.is_zero();
        let discount_percent = course
            .original_price
            .filter(|orig| *orig > course.price.amount)
            .map_or(Percent::ZERO, |orig| {
                Percent::of(orig - course.price.amount, orig)
            });
        let is_new = course
            .created_at
            .is_some_and(|at| now.ceil_days_since(&at) <= rules.new_window_days());
        let current_students = current_students(&course);
        let enrollment = max_students(&course).map(|max_students| {
            let progress =
                Percent::of(Decimal::from(current_students), Decimal::from(max_students));
            Enrollment {
                max_students,
                remaining_seats: max_students.saturating_sub(current_students),
                progress,
                status: progress.into(),
            }
        });

        Self {
            discount_percent,
            is_free,
            level: Level::of_title(&course.title),
            duration_label: rules.duration.label(&course.details),
            is_new,
            is_bestseller: rules.bestseller.is_bestseller(&course),
            current_students,
            enrollment,
            course,
        }
    }

    /// Returns how full this [`Course`] is, or [`Percent::ZERO`] if it has no
    /// capacity cap.
    #[must_use]
    pub fn enrollment_progress(&self) -> Percent {
        self.enrollment.map_or(Percent::ZERO, |e| e.progress)
    }

    /// Returns the capacity of this [`Course`], if it has one.
    #[must_use]
    pub fn max_students(&self) -> Option<u64> {
        self.enrollment.map(|e| e.max_students)
    }
}

/// Returns the number of students in the provided [`Course`]: subscribers,
/// then enrolled students, whichever is present and positive first.
fn current_students(course: &Course) -> u64 {
    Some(course.subscribers_count)
        .filter(|n| *n > 0)
        .or(course.count_student.filter(|n| *n > 0))
        .unwrap_or(0)
}

/// Returns the capacity of the provided [`Course`], if it's a group one.
///
/// An explicit positive `max_students` wins, otherwise the capacity grows
/// with the number of enrolled students.
fn max_students(course: &Course) -> Option<u64> {
    if !course.is_group() {
        return None;
    }
    Some(course.max_students.filter(|n| *n > 0).unwrap_or_else(|| {
        match course.count_student.unwrap_or(0) {
            51.. => 100,
            26..=50 => 50,
            _ => 30,
        }
    }))
}
