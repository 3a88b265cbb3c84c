//! Core definitions (error types and argument verification), relied upon by all amudai-* crates.

pub mod error;
pub mod result;

pub use error::{Error, ErrorKind};
pub use result::Result;
