pub mod errors;
pub mod db;
pub mod slug;
pub mod role;
pub mod user;
pub mod category;
pub mod service;
pub mod city;
pub mod district;
pub mod provider;
pub mod provider_service_area;
pub mod job;
pub mod offer;
pub mod review;
pub mod portfolio_item;
pub mod audit_log;

#[cfg(test)]
mod tests;
