//! Database layer for beerstore.
//!
//! Provides SQLite connection pooling (via `r2d2`), the `beer` table
//! definition, and the [`Storage`] capability that record services are
//! built on.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: no external database process required. WAL
//!   mode allows concurrent readers with a single writer.
//! - **`r2d2` connection pool**: bounded connection reuse without manual
//!   lifetime management.
//! - **Embedded schema**: the table definition is compiled in via
//!   `include_str!` and applied with `CREATE TABLE IF NOT EXISTS`.
//! - **Injected storage**: services receive a [`Storage`] value from their
//!   caller and never reach for a global handle.

mod pool;
mod schema;
mod storage;

pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
pub use schema::init_schema;
pub use storage::{ConnectionError, Storage};
