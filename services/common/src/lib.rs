//! Common types and error taxonomy shared across Pulse services

pub mod constants;
pub mod errors;
pub mod types;

pub use constants::*;
pub use errors::*;
pub use types::*;
