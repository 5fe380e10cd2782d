//! SQLite storage for the Sharebook register.
//!
//! This crate is the only place Diesel appears. It implements the
//! repository traits and the ledger unit of work defined in
//! `sharebook-core`:
//! - connection pooling, pragmas and embedded migrations
//! - the single writer actor that runs every write in an immediate transaction
//! - read repositories over pooled connections
//! - Diesel row types and their conversions to domain models
//!
//! ```text
//!   sharebook-core (domain, traits)
//!            │
//!            ▼
//!   storage-sqlite (this crate) ──► SQLite file
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

pub mod audit;
pub mod entities;
pub mod members;
pub mod securities;
pub mod transactions;
pub mod unit_of_work;

pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};
pub use errors::{IntoCore, StorageError};
pub use unit_of_work::{SqliteUnitOfWork, SqliteUnitOfWorkExecutor};

pub use audit::AuditRepository;
pub use entities::EntityRepository;
pub use members::MemberRepository;
pub use securities::SecurityClassRepository;
pub use transactions::TransactionRepository;

pub use sharebook_core::errors::{DatabaseError, Error, Result};
