//! The built-in filesystem-metadata source: every directory under a library root
//! is one series.
#![deny(missing_docs)]

mod error;
pub use error::*;

mod source;
pub use source::*;
