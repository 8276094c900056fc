//! Pipeline entry point for catalog operations.
//!
//! - `Source`: one configured site with listing, search, details,
//!   episodes and alternatives

pub mod source;

pub use source::Source;
