//! Backend fixtures pushed next to the forwarding proxy.
//!
//! - `flaky`: fails two requests out of three, for the automatic retry tests
//! - `greeting`: answers with a greeting and its instance identity, for the
//!   round-robin and weighted routing tests

pub mod flaky;
pub mod greeting;
