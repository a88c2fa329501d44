//! Integration test suite for the `relnotes` binary.
//!
//! Runs the built binary with a controlled environment, so configuration
//! layering is exercised the way users hit it.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod integration;
