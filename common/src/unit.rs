//! Marker types.

/// Marker type describing a course publication on the backend.
#[derive(Clone, Copy, Debug)]
pub struct Creation;
