//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Login only; registration goes through `users::create_user`.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
