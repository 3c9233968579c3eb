/// Shared in-memory database setup
pub mod support;


/// Uniqueness, check and foreign-key constraints enforced by the store
pub mod constraint_tests;
