//! Domain definitions.

pub mod course;

pub use self::course::Course;
