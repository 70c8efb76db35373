//! Crate-level tests
//!
//! Unit tests live next to the code they cover; these modules test the two
//! public workflows end to end (source extraction and error propagation),
//! plus property-based checks.

mod extractor_tests;
mod propagation_tests;
