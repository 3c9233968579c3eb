//! Integrity and lifecycle rules shared by every access operation.

pub mod access;
pub mod lifecycle;
