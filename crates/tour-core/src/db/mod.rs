//! SQLite persistence for tours, key points and tour executions.
//!
//! All reads and writes go through a [`UnitOfWork`]: one SQLite transaction
//! that commits when the closure returns `Ok` and rolls back otherwise.
//! [`Database::unit_of_work`] begins the transaction with `BEGIN IMMEDIATE`,
//! which takes the write lock before the first read, so a precondition check
//! and the write that depends on it cannot interleave with another writer.
//! Contending connections wait up to [`BUSY_TIMEOUT`] for the lock.

use std::{path::Path, time::Duration};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::error::{DatabaseResultExt, Result};

pub mod execution_queries;
pub mod migrations;
pub mod tour_queries;
pub mod utils;

/// How long a connection waits for a competing writer to finish.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens a connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = Self::open(path)?;
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a connection to an already initialized database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;
        connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;
        Ok(Self { connection })
    }

    /// Runs `work` inside a write-locking transaction.
    pub fn unit_of_work<T, F>(&mut self, work: F) -> Result<T>
    where
        F: FnOnce(&UnitOfWork<'_>) -> Result<T>,
    {
        self.run(TransactionBehavior::Immediate, work)
    }

    /// Runs read-only `work` inside a deferred transaction, giving it a
    /// consistent snapshot without blocking writers up front.
    pub fn snapshot<T, F>(&mut self, work: F) -> Result<T>
    where
        F: FnOnce(&UnitOfWork<'_>) -> Result<T>,
    {
        self.run(TransactionBehavior::Deferred, work)
    }

    fn run<T, F>(&mut self, behavior: TransactionBehavior, work: F) -> Result<T>
    where
        F: FnOnce(&UnitOfWork<'_>) -> Result<T>,
    {
        let tx = self
            .connection
            .transaction_with_behavior(behavior)
            .db_context("Failed to begin transaction")?;
        let uow = UnitOfWork { tx };

        // Dropping the transaction on error rolls it back
        let value = work(&uow)?;

        uow.tx.commit().db_context("Failed to commit transaction")?;
        Ok(value)
    }
}

/// One atomic read-modify-write against the store.
///
/// Query methods live in [`tour_queries`] and [`execution_queries`].
pub struct UnitOfWork<'conn> {
    tx: Transaction<'conn>,
}
