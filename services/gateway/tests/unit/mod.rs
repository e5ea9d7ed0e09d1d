//! Unit test suites

pub mod helpers;
pub mod session;
