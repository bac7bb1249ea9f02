//! Health insight model
//!
//! The normalized AI assessment stored alongside a health record.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::advice::AdviceResult;
use crate::db::{DbError, DbResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthInsight {
    pub id: i64,
    pub user_id: String,
    pub health_record_id: Option<i64>,
    pub summary: String,
    pub risk_level: String,
    pub diet: String,
    pub fitness: String,
    pub goals: String,
    pub created_at: String,
}

impl HealthInsight {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            health_record_id: row.get("health_record_id")?,
            summary: row.get("summary")?,
            risk_level: row.get("risk_level")?,
            diet: row.get("diet")?,
            fitness: row.get("fitness")?,
            goals: row.get("goals")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(
        conn: &Connection,
        user_id: &str,
        health_record_id: Option<i64>,
        advice: &AdviceResult,
    ) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO health_insights (user_id, health_record_id, summary, risk_level, diet, fitness, goals)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                user_id,
                health_record_id,
                advice.summary,
                advice.risk_level,
                advice.diet,
                advice.fitness,
                advice.goals,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::MissingAfterWrite("health_insights"))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM health_insights WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(insight) => Ok(Some(insight)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Most recent insight for a user
    pub fn latest_for_user(conn: &Connection, user_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM health_insights WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT 1",
        )?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(insight) => Ok(Some(insight)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM health_insights", [], |row| row.get(0))?)
    }

    pub fn to_advice(&self) -> AdviceResult {
        AdviceResult {
            summary: self.summary.clone(),
            risk_level: self.risk_level.clone(),
            diet: self.diet.clone(),
            fitness: self.fitness.clone(),
            goals: self.goals.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::HealthMetrics;
    use crate::db::migrations::run_migrations;
    use crate::models::{HealthRecord, User, UserCreate};

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        User::create(
            &conn,
            &UserCreate {
                azure_id: "az-2".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        conn
    }

    fn record(conn: &Connection) -> HealthRecord {
        let metrics = HealthMetrics {
            age: 52.0,
            gender: "Female".to_string(),
            height: 63.0,
            weight: 74.0,
            blood_pressure_sys: 142.0,
            blood_pressure_dia: 91.0,
            heart_rate: 81.0,
            sleep_hours: 5.5,
            water_intake: 1.0,
            workout_minutes: 10.0,
        };
        HealthRecord::create(conn, "az-2", &metrics).unwrap()
    }

    fn advice(risk: &str) -> AdviceResult {
        AdviceResult {
            summary: "Elevated blood pressure.".to_string(),
            risk_level: risk.to_string(),
            diet: "- Less salt".to_string(),
            fitness: "- Walk daily".to_string(),
            goals: "- Sleep 7h".to_string(),
        }
    }

    #[test]
    fn test_create_and_convert_back() {
        let conn = conn();
        let record = record(&conn);
        let insight = HealthInsight::create(&conn, "az-2", Some(record.id), &advice("High")).unwrap();

        assert_eq!(insight.health_record_id, Some(record.id));
        assert_eq!(insight.to_advice(), advice("High"));
    }

    #[test]
    fn test_latest_insight() {
        let conn = conn();
        assert!(HealthInsight::latest_for_user(&conn, "az-2").unwrap().is_none());

        let record = record(&conn);
        HealthInsight::create(&conn, "az-2", Some(record.id), &advice("High")).unwrap();
        HealthInsight::create(&conn, "az-2", Some(record.id), &advice("Moderate")).unwrap();

        let latest = HealthInsight::latest_for_user(&conn, "az-2").unwrap().unwrap();
        assert_eq!(latest.risk_level, "Moderate");
        assert_eq!(HealthInsight::count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_insights_removed_with_user() {
        let conn = conn();
        let record = record(&conn);
        HealthInsight::create(&conn, "az-2", Some(record.id), &advice("Low")).unwrap();

        User::delete(&conn, "az-2").unwrap();
        assert_eq!(HealthInsight::count(&conn).unwrap(), 0);
    }
}
