//! Service layer: integrity and lifecycle rules plus the access operations
//! built on top of `models`.
//! - Every mutating operation runs in one transaction and writes its audit rows there.
//! - Store errors are classified into `ServiceError` before they leave this crate.

pub mod errors;
pub mod actor;
pub mod rules;
pub mod audit;
pub mod password;
pub mod auth;
pub mod roles;
pub mod users;
pub mod catalog;
pub mod locations;
pub mod providers;
pub mod jobs;
pub mod offers;
pub mod reviews;
#[cfg(test)]
pub mod test_support;

pub use actor::Actor;
pub use errors::ServiceError;
