//! Read entities definitions.

pub mod course;
