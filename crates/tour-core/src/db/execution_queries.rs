//! Tour execution and key point completion queries.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension, Row};

use super::{
    utils::{
        enum_column, id_column, is_constraint_violation, optional_timestamp_column,
        timestamp_column,
    },
    UnitOfWork,
};
use crate::{
    error::{DatabaseResultExt, Result, TourError},
    models::{ExecutionStatus, KeyPointCompletion, TourExecution},
};

const EXECUTION_COLUMNS: &str = "id, tour_id, tourist, status, start_latitude, start_longitude, start_time, end_time, last_activity";
const INSERT_EXECUTION_SQL: &str = "INSERT INTO tour_executions (tour_id, tourist, status, start_latitude, start_longitude, start_time, last_activity) VALUES (?1, ?2, 'active', ?3, ?4, ?5, ?5)";
const TOUCH_EXECUTION_SQL: &str =
    "UPDATE tour_executions SET last_activity = ?1 WHERE id = ?2 AND status = 'active'";
const FINISH_EXECUTION_SQL: &str = "UPDATE tour_executions SET status = ?1, end_time = ?2, last_activity = ?2 WHERE id = ?3 AND status = 'active'";
const INSERT_COMPLETION_SQL: &str = "INSERT INTO key_point_completions (execution_id, key_point_id, latitude, longitude, completed_at) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_COMPLETIONS_SQL: &str = "SELECT id, execution_id, key_point_id, latitude, longitude, completed_at FROM key_point_completions WHERE execution_id = ?1 ORDER BY id";

impl UnitOfWork<'_> {
    fn build_execution_from_row(row: &Row<'_>) -> rusqlite::Result<TourExecution> {
        Ok(TourExecution {
            id: id_column(row, 0)?,
            tour_id: id_column(row, 1)?,
            tourist: row.get(2)?,
            status: enum_column(row, 3)?,
            start_latitude: row.get(4)?,
            start_longitude: row.get(5)?,
            start_time: timestamp_column(row, 6)?,
            end_time: optional_timestamp_column(row, 7)?,
            last_activity: timestamp_column(row, 8)?,
            completions: Vec::new(),
        })
    }

    fn build_completion_from_row(row: &Row<'_>) -> rusqlite::Result<KeyPointCompletion> {
        Ok(KeyPointCompletion {
            id: id_column(row, 0)?,
            execution_id: id_column(row, 1)?,
            key_point_id: id_column(row, 2)?,
            latitude: row.get(3)?,
            longitude: row.get(4)?,
            completed_at: timestamp_column(row, 5)?,
        })
    }

    /// Starts an execution. The partial unique index on active executions
    /// turns a concurrent second start into `ActiveExecutionExists`.
    pub fn insert_execution(
        &self,
        tour_id: u64,
        tourist: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<TourExecution> {
        let now = Timestamp::now().to_string();
        self.tx
            .execute(
                INSERT_EXECUTION_SQL,
                params![tour_id as i64, tourist, latitude, longitude, now],
            )
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    TourError::ActiveExecutionExists {
                        tourist: tourist.to_string(),
                    }
                } else {
                    TourError::database("Failed to insert tour execution").with_source(e)
                }
            })?;

        let id = self.tx.last_insert_rowid() as u64;
        self.require_execution(id)
    }

    /// Retrieves an execution with its completions.
    pub fn fetch_execution(&self, id: u64) -> Result<Option<TourExecution>> {
        let execution = self
            .tx
            .query_row(
                &format!("SELECT {EXECUTION_COLUMNS} FROM tour_executions WHERE id = ?1"),
                params![id as i64],
                Self::build_execution_from_row,
            )
            .optional()
            .db_context("Failed to query tour execution")?;

        self.with_completions(execution)
    }

    /// Like [`Self::fetch_execution`], failing with `ExecutionNotFound`.
    pub fn require_execution(&self, id: u64) -> Result<TourExecution> {
        self.fetch_execution(id)?
            .ok_or(TourError::ExecutionNotFound { id })
    }

    /// The tourist's execution in progress, if any.
    pub fn active_execution_for(&self, tourist: &str) -> Result<Option<TourExecution>> {
        let execution = self
            .tx
            .query_row(
                &format!(
                    "SELECT {EXECUTION_COLUMNS} FROM tour_executions WHERE tourist = ?1 AND status = 'active'"
                ),
                params![tourist],
                Self::build_execution_from_row,
            )
            .optional()
            .db_context("Failed to query active tour execution")?;

        self.with_completions(execution)
    }

    fn with_completions(&self, execution: Option<TourExecution>) -> Result<Option<TourExecution>> {
        match execution {
            Some(mut execution) => {
                execution.completions = self.completions_for(execution.id)?;
                Ok(Some(execution))
            }
            None => Ok(None),
        }
    }

    fn completions_for(&self, execution_id: u64) -> Result<Vec<KeyPointCompletion>> {
        let mut stmt = self
            .tx
            .prepare(SELECT_COMPLETIONS_SQL)
            .db_context("Failed to prepare completion query")?;

        let completions = stmt
            .query_map(params![execution_id as i64], Self::build_completion_from_row)
            .db_context("Failed to query key point completions")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read key point completion row")?;
        Ok(completions)
    }

    /// Bumps `last_activity` of an active execution and returns the new value.
    pub fn touch_execution(&self, id: u64) -> Result<Timestamp> {
        let now = Timestamp::now();
        self.tx
            .execute(TOUCH_EXECUTION_SQL, params![now.to_string(), id as i64])
            .db_context("Failed to update execution activity")?;
        Ok(now)
    }

    /// Records that an execution reached a key point.
    pub fn insert_completion(
        &self,
        execution_id: u64,
        key_point_id: u64,
        latitude: f64,
        longitude: f64,
        completed_at: Timestamp,
    ) -> Result<KeyPointCompletion> {
        self.tx
            .execute(
                INSERT_COMPLETION_SQL,
                params![
                    execution_id as i64,
                    key_point_id as i64,
                    latitude,
                    longitude,
                    completed_at.to_string()
                ],
            )
            .db_context("Failed to insert key point completion")?;

        Ok(KeyPointCompletion {
            id: self.tx.last_insert_rowid() as u64,
            execution_id,
            key_point_id,
            latitude,
            longitude,
            completed_at,
        })
    }

    /// Moves an active execution to a terminal status. Returns `false` when
    /// the execution was no longer active.
    pub fn finish_execution(&self, id: u64, status: ExecutionStatus) -> Result<bool> {
        let changed = self
            .tx
            .execute(
                FINISH_EXECUTION_SQL,
                params![status.as_str(), Timestamp::now().to_string(), id as i64],
            )
            .db_context("Failed to finish tour execution")?;
        Ok(changed > 0)
    }
}
