//! Tour and key point queries.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension, Row};

use super::{
    utils::{enum_column, id_column, timestamp_column},
    UnitOfWork,
};
use crate::{
    error::{DatabaseResultExt, Result, TourError},
    geo,
    models::{KeyPoint, Tour, TourFilter, TourStatus, TransportDetail},
    validation::{NewKeyPoint, TourDraft},
};

const TOUR_COLUMNS: &str = "id, name, description, difficulty, tags, status, list_price, transport_details, distance_km, author, created_at, updated_at";
const INSERT_TOUR_SQL: &str = "INSERT INTO tours (name, description, difficulty, tags, status, list_price, transport_details, distance_km, author, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 'draft', ?5, ?6, 0, ?7, ?8, ?8)";
const UPDATE_TOUR_CONTENT_SQL: &str = "UPDATE tours SET name = ?1, description = ?2, difficulty = ?3, tags = ?4, list_price = ?5, transport_details = ?6, updated_at = ?7 WHERE id = ?8";
const UPDATE_TOUR_STATUS_SQL: &str =
    "UPDATE tours SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4";
const UPDATE_TOUR_DISTANCE_SQL: &str = "UPDATE tours SET distance_km = ?1 WHERE id = ?2";
const INSERT_KEY_POINT_SQL: &str = "INSERT INTO key_points (tour_id, name, description, latitude, longitude, image_url, key_point_order) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const DELETE_KEY_POINTS_SQL: &str = "DELETE FROM key_points WHERE tour_id = ?1";
const KEY_POINT_COLUMNS: &str =
    "id, tour_id, name, description, latitude, longitude, image_url, key_point_order";
const NEXT_KEY_POINT_ORDER_SQL: &str =
    "SELECT COALESCE(MAX(key_point_order), -1) + 1 FROM key_points WHERE tour_id = ?1";

impl UnitOfWork<'_> {
    /// Helper function to construct a Tour (without key points) from a row
    /// selected with [`TOUR_COLUMNS`].
    fn build_tour_from_row(row: &Row<'_>) -> rusqlite::Result<Tour> {
        let status: TourStatus = enum_column(row, 5)?;
        let list_price: f64 = row.get(6)?;

        let tags = row
            .get::<_, Option<String>>(4)?
            .map(|s| s.split(',').map(String::from).collect())
            .unwrap_or_default();

        let transport_json: String = row.get(7)?;
        let transport_details: Vec<TransportDetail> = serde_json::from_str(&transport_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

        Ok(Tour {
            id: id_column(row, 0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            difficulty: enum_column(row, 3)?,
            tags,
            status,
            // Drafts are never priced
            price: if status == TourStatus::Draft { 0.0 } else { list_price },
            list_price,
            transport_details,
            distance_km: row.get(8)?,
            author: row.get(9)?,
            key_points: Vec::new(),
            created_at: timestamp_column(row, 10)?,
            updated_at: timestamp_column(row, 11)?,
        })
    }

    fn build_key_point_from_row(row: &Row<'_>) -> rusqlite::Result<KeyPoint> {
        Ok(KeyPoint {
            id: id_column(row, 0)?,
            tour_id: id_column(row, 1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            latitude: row.get(4)?,
            longitude: row.get(5)?,
            image_url: row.get(6)?,
            order: row.get(7)?,
        })
    }

    /// Inserts a draft tour with its key points and computed distance.
    pub fn insert_tour(&self, draft: &TourDraft, author: &str) -> Result<Tour> {
        let now = Timestamp::now().to_string();
        let tags = join_tags(&draft.tags);
        let transport = serde_json::to_string(&draft.transport_details)?;

        self.tx
            .execute(
                INSERT_TOUR_SQL,
                params![
                    draft.name,
                    draft.description,
                    draft.difficulty.as_str(),
                    tags,
                    draft.list_price,
                    transport,
                    author,
                    now
                ],
            )
            .db_context("Failed to insert tour")?;
        let id = self.tx.last_insert_rowid() as u64;

        for key_point in &draft.key_points {
            self.insert_key_point_row(id, key_point)?;
        }
        self.refresh_distance(id)?;

        self.require_tour(id)
    }

    /// Replaces every editable field of a tour and its whole key point set.
    pub fn replace_tour_content(&self, id: u64, draft: &TourDraft) -> Result<Tour> {
        let now = Timestamp::now().to_string();
        let tags = join_tags(&draft.tags);
        let transport = serde_json::to_string(&draft.transport_details)?;

        self.tx
            .execute(
                UPDATE_TOUR_CONTENT_SQL,
                params![
                    draft.name,
                    draft.description,
                    draft.difficulty.as_str(),
                    tags,
                    draft.list_price,
                    transport,
                    now,
                    id as i64
                ],
            )
            .db_context("Failed to update tour")?;

        self.tx
            .execute(DELETE_KEY_POINTS_SQL, params![id as i64])
            .db_context("Failed to delete key points")?;
        for key_point in &draft.key_points {
            self.insert_key_point_row(id, key_point)?;
        }
        self.refresh_distance(id)?;

        self.require_tour(id)
    }

    /// Appends a key point to a tour. Without an explicit order the point
    /// goes after the current last one.
    pub fn append_key_point(&self, tour_id: u64, key_point: &NewKeyPoint) -> Result<KeyPoint> {
        let id = self.insert_key_point_row(tour_id, key_point)?;
        self.tx
            .execute(
                "UPDATE tours SET updated_at = ?1 WHERE id = ?2",
                params![Timestamp::now().to_string(), tour_id as i64],
            )
            .db_context("Failed to update tour timestamp")?;
        self.refresh_distance(tour_id)?;

        Ok(KeyPoint {
            id,
            tour_id,
            name: key_point.name.clone(),
            description: key_point.description.clone(),
            latitude: key_point.latitude,
            longitude: key_point.longitude,
            image_url: key_point.image_url.clone(),
            order: key_point.order,
        })
    }

    /// The order a key point appended to the tour would get.
    pub fn next_key_point_order(&self, tour_id: u64) -> Result<i64> {
        self.tx
            .query_row(NEXT_KEY_POINT_ORDER_SQL, params![tour_id as i64], |row| {
                row.get(0)
            })
            .db_context("Failed to get next key point order")
    }

    fn insert_key_point_row(&self, tour_id: u64, key_point: &NewKeyPoint) -> Result<u64> {
        self.tx
            .execute(
                INSERT_KEY_POINT_SQL,
                params![
                    tour_id as i64,
                    key_point.name,
                    key_point.description,
                    key_point.latitude,
                    key_point.longitude,
                    key_point.image_url,
                    key_point.order
                ],
            )
            .db_context("Failed to insert key point")?;
        Ok(self.tx.last_insert_rowid() as u64)
    }

    /// Recomputes and stores the path length of a tour.
    fn refresh_distance(&self, tour_id: u64) -> Result<f64> {
        let key_points = self.key_points_in_storage_order(tour_id)?;
        let distance = geo::path_distance_km(&key_points);
        self.tx
            .execute(UPDATE_TOUR_DISTANCE_SQL, params![distance, tour_id as i64])
            .db_context("Failed to update tour distance")?;
        Ok(distance)
    }

    /// Retrieves a tour with its key points sorted by `order`.
    pub fn fetch_tour(&self, id: u64) -> Result<Option<Tour>> {
        let tour = self
            .tx
            .query_row(
                &format!("SELECT {TOUR_COLUMNS} FROM tours WHERE id = ?1"),
                params![id as i64],
                Self::build_tour_from_row,
            )
            .optional()
            .db_context("Failed to query tour")?;

        match tour {
            Some(mut tour) => {
                tour.key_points = self.ordered_key_points(tour.id)?;
                Ok(Some(tour))
            }
            None => Ok(None),
        }
    }

    /// Like [`Self::fetch_tour`], failing with `TourNotFound`.
    pub fn require_tour(&self, id: u64) -> Result<Tour> {
        self.fetch_tour(id)?.ok_or(TourError::TourNotFound { id })
    }

    /// Lists tours matching the filter, newest first.
    pub fn list_tours(&self, filter: &TourFilter) -> Result<Vec<Tour>> {
        let mut query = format!("SELECT {TOUR_COLUMNS} FROM tours");
        let mut conditions: Vec<String> = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if !filter.statuses.is_empty() {
            let placeholders = vec!["?"; filter.statuses.len()].join(", ");
            conditions.push(format!("status IN ({placeholders})"));
            for status in &filter.statuses {
                params_vec.push(Box::new(status.as_str()));
            }
        }

        if let Some(ref author) = filter.author {
            conditions.push("author = ?".to_string());
            params_vec.push(Box::new(author.clone()));
        }

        if let Some(ref ids) = filter.ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders = vec!["?"; ids.len()].join(", ");
            conditions.push(format!("id IN ({placeholders})"));
            for id in ids {
                params_vec.push(Box::new(*id as i64));
            }
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY created_at DESC, id DESC");

        let mut stmt = self.tx.prepare(&query).db_context("Failed to prepare query")?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let tours = stmt
            .query_map(&params_refs[..], Self::build_tour_from_row)
            .db_context("Failed to query tours")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read tour row")?;

        tours
            .into_iter()
            .map(|mut tour| {
                tour.key_points = self.ordered_key_points(tour.id)?;
                Ok(tour)
            })
            .collect()
    }

    /// Moves a tour from `expected` to `status`. Returns `false` when the
    /// tour is no longer in `expected`.
    pub fn set_tour_status(&self, id: u64, expected: TourStatus, status: TourStatus) -> Result<bool> {
        let changed = self
            .tx
            .execute(
                UPDATE_TOUR_STATUS_SQL,
                params![
                    status.as_str(),
                    Timestamp::now().to_string(),
                    id as i64,
                    expected.as_str()
                ],
            )
            .db_context("Failed to update tour status")?;
        Ok(changed > 0)
    }

    /// Key points sorted by `order`, ties in insertion order.
    pub fn ordered_key_points(&self, tour_id: u64) -> Result<Vec<KeyPoint>> {
        self.select_key_points(tour_id, "key_point_order, id")
    }

    /// Key points in insertion order, the order proximity checks walk them.
    pub fn key_points_in_storage_order(&self, tour_id: u64) -> Result<Vec<KeyPoint>> {
        self.select_key_points(tour_id, "id")
    }

    fn select_key_points(&self, tour_id: u64, order_by: &str) -> Result<Vec<KeyPoint>> {
        let mut stmt = self
            .tx
            .prepare(&format!(
                "SELECT {KEY_POINT_COLUMNS} FROM key_points WHERE tour_id = ?1 ORDER BY {order_by}"
            ))
            .db_context("Failed to prepare key point query")?;

        let key_points = stmt
            .query_map(params![tour_id as i64], Self::build_key_point_from_row)
            .db_context("Failed to query key points")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read key point row")?;
        Ok(key_points)
    }
}

fn join_tags(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(","))
    }
}
