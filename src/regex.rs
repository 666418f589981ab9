//! Regex backend selection.
//!
//! The full `regex` crate is used by default; the `lite` feature swaps in
//! `regex-lite` for smaller binaries.

#[cfg(feature = "regex")]
pub(crate) use ::regex::{Captures, Regex};

#[cfg(all(feature = "lite", not(feature = "regex")))]
pub(crate) use ::regex_lite::{Captures, Regex};
