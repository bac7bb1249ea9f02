//! Health record model
//!
//! One submission of the ten vital metrics for a user.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::advice::HealthMetrics;
use crate::db::{DbError, DbResult};
use crate::report::VitalsSnapshot;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthRecord {
    pub id: i64,
    pub user_id: String,
    pub gender: String,
    pub age: f64,
    pub height: f64,
    pub weight: f64,
    pub blood_pressure_sys: f64,
    pub blood_pressure_dia: f64,
    pub heart_rate: f64,
    pub sleep_hours: f64,
    pub water_intake: f64,
    pub workout_minutes: f64,
    pub created_at: String,
}

/// Chart-ready point for the history view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthTrendPoint {
    #[serde(rename = "created_at")]
    pub created_at: String,
    pub blood_pressure_sys: f64,
    pub blood_pressure_dia: f64,
    pub heart_rate: f64,
    pub sleep_hours: f64,
}

impl HealthRecord {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            gender: row.get("gender")?,
            age: row.get("age")?,
            height: row.get("height")?,
            weight: row.get("weight")?,
            blood_pressure_sys: row.get("blood_pressure_sys")?,
            blood_pressure_dia: row.get("blood_pressure_dia")?,
            heart_rate: row.get("heart_rate")?,
            sleep_hours: row.get("sleep_hours")?,
            water_intake: row.get("water_intake")?,
            workout_minutes: row.get("workout_minutes")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, user_id: &str, metrics: &HealthMetrics) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO health_records (
                user_id, gender, age, height, weight,
                blood_pressure_sys, blood_pressure_dia, heart_rate,
                sleep_hours, water_intake, workout_minutes
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                user_id,
                metrics.gender,
                metrics.age,
                metrics.height,
                metrics.weight,
                metrics.blood_pressure_sys,
                metrics.blood_pressure_dia,
                metrics.heart_rate,
                metrics.sleep_hours,
                metrics.water_intake,
                metrics.workout_minutes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::MissingAfterWrite("health_records"))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM health_records WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Most recent record for a user
    pub fn latest_for_user(conn: &Connection, user_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM health_records WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT 1",
        )?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All records for a user, oldest first
    pub fn list_for_user(conn: &Connection, user_id: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM health_records WHERE user_id = ?1 ORDER BY created_at ASC, id ASC",
        )?;

        let records = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM health_records", [], |row| row.get(0))?)
    }

    pub fn to_metrics(&self) -> HealthMetrics {
        HealthMetrics {
            age: self.age,
            gender: self.gender.clone(),
            height: self.height,
            weight: self.weight,
            blood_pressure_sys: self.blood_pressure_sys,
            blood_pressure_dia: self.blood_pressure_dia,
            heart_rate: self.heart_rate,
            sleep_hours: self.sleep_hours,
            water_intake: self.water_intake,
            workout_minutes: self.workout_minutes,
        }
    }

    pub fn to_snapshot(&self) -> VitalsSnapshot {
        VitalsSnapshot {
            metrics: self.to_metrics(),
            recorded_at: self.created_at.clone(),
        }
    }

    pub fn trend_point(&self) -> HealthTrendPoint {
        HealthTrendPoint {
            created_at: self.created_at.clone(),
            blood_pressure_sys: self.blood_pressure_sys,
            blood_pressure_dia: self.blood_pressure_dia,
            heart_rate: self.heart_rate,
            sleep_hours: self.sleep_hours,
        }
    }
}
