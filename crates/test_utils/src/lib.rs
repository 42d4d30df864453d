//! Helpers shared by the test suites of the transaction crates.

pub mod secret_key;
