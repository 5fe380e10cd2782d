//! Sharebook Core - the securities register domain.
//!
//! Models, the transaction ledger, the audit log and the holdings
//! aggregator. The crate is database-agnostic: persistence is reached
//! through the repository traits and the unit-of-work contract, which the
//! `storage-sqlite` crate implements.

pub mod audit;
pub mod config;
pub mod constants;
pub mod entities;
pub mod errors;
pub mod members;
pub mod securities;
pub mod summary;
pub mod transactions;
pub mod unit_of_work;
pub mod utils;

pub use config::RegistryConfig;
pub use errors::Error;
pub use errors::Result;
