//! HTTP request handlers

pub mod aggregate;
pub mod explain;
pub mod health;
