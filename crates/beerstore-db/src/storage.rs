//! The storage capability handed to record services.
//!
//! A [`Storage`] value lends out one SQLite connection at a time. The
//! connection is returned when the guard drops, so services hold it for
//! exactly one operation.

use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard};

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use thiserror::Error;

use crate::pool::DbPool;

/// Errors raised when a connection cannot be obtained from storage.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The pool could not hand out a connection before its timeout.
    #[error("failed to check out a pooled connection: {0}")]
    Pool(#[from] r2d2::Error),

    /// A previous holder of the connection panicked.
    #[error("database connection lock poisoned")]
    Poisoned,
}

/// Something that can lend a SQLite connection.
///
/// Implementations are responsible for their own thread safety; callers add
/// no locking on top.
pub trait Storage {
    /// Guard that derefs to the borrowed connection.
    type Conn<'a>: Deref<Target = Connection>
    where
        Self: 'a;

    /// Borrows a connection for the duration of one operation.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if no usable connection is available.
    fn connection(&self) -> Result<Self::Conn<'_>, ConnectionError>;
}

impl Storage for DbPool {
    type Conn<'a>
        = PooledConnection<SqliteConnectionManager>
    where
        Self: 'a;

    fn connection(&self) -> Result<Self::Conn<'_>, ConnectionError> {
        Ok(self.get()?)
    }
}

impl Storage for Mutex<Connection> {
    type Conn<'a>
        = MutexGuard<'a, Connection>
    where
        Self: 'a;

    fn connection(&self) -> Result<Self::Conn<'_>, ConnectionError> {
        self.lock().map_err(|_| ConnectionError::Poisoned)
    }
}

impl<T: Storage> Storage for &T {
    type Conn<'a>
        = T::Conn<'a>
    where
        Self: 'a;

    fn connection(&self) -> Result<Self::Conn<'_>, ConnectionError> {
        (**self).connection()
    }
}

impl<T: Storage> Storage for Arc<T> {
    type Conn<'a>
        = T::Conn<'a>
    where
        Self: 'a;

    fn connection(&self) -> Result<Self::Conn<'_>, ConnectionError> {
        (**self).connection()
    }
}
