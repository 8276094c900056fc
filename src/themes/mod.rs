//! Built-in theme mappers.
//!
//! Each theme supplies the element mappers for a family of sites sharing
//! the same markup; the selectors themselves stay in configuration.

pub mod dooplay;
