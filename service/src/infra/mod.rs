//! Infrastructure layer.

pub mod backend;

pub use self::backend::Backend;
#[cfg(feature = "http")]
pub use self::backend::Http;
