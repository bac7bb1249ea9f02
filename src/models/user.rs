//! User model
//!
//! One row per external identity. Health records and insights hang off
//! `azure_id` and are removed with the user.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub azure_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub profile_pic: Option<String>,
    pub created_at: String,
}

/// Data for registering a user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserCreate {
    pub azure_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub profile_pic: Option<String>,
}

impl User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            azure_id: row.get("azure_id")?,
            name: row.get("name")?,
            email: row.get("email")?,
            profile_pic: row.get("profile_pic")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &UserCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO users (azure_id, name, email, profile_pic)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![data.azure_id, data.name, data.email, data.profile_pic],
        )?;

        Self::get_by_azure_id(conn, &data.azure_id)?.ok_or(DbError::MissingAfterWrite("users"))
    }

    pub fn get_by_azure_id(conn: &Connection, azure_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE azure_id = ?1")?;

        let result = stmt.query_row([azure_id], Self::from_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All users in registration order
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub fn exists(conn: &Connection, azure_id: &str) -> DbResult<bool> {
        Ok(Self::get_by_azure_id(conn, azure_id)?.is_some())
    }

    /// Delete a user together with their insights and records.
    /// Returns false when no such user existed.
    pub fn delete(conn: &Connection, azure_id: &str) -> DbResult<bool> {
        conn.execute("DELETE FROM health_insights WHERE user_id = ?1", [azure_id])?;
        conn.execute("DELETE FROM health_records WHERE user_id = ?1", [azure_id])?;
        let rows = conn.execute("DELETE FROM users WHERE azure_id = ?1", [azure_id])?;
        Ok(rows > 0)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
    }

    /// Name for display, falling back to the email and then the identity
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.email.as_deref())
            .unwrap_or(&self.azure_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn ana() -> UserCreate {
        UserCreate {
            azure_id: "az-ana".to_string(),
            name: Some("Ana Costa".to_string()),
            email: Some("ana@example.com".to_string()),
            profile_pic: None,
        }
    }

    #[test]
    fn test_create_and_fetch() {
        let conn = conn();
        let user = User::create(&conn, &ana()).unwrap();

        assert_eq!(user.azure_id, "az-ana");
        assert_eq!(user.display_name(), "Ana Costa");
        assert!(User::exists(&conn, "az-ana").unwrap());
        assert!(!User::exists(&conn, "az-nobody").unwrap());
        assert_eq!(User::count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_identity_is_rejected() {
        let conn = conn();
        User::create(&conn, &ana()).unwrap();
        assert!(User::create(&conn, &ana()).is_err());
    }

    #[test]
    fn test_delete_reports_missing_user() {
        let conn = conn();
        User::create(&conn, &ana()).unwrap();

        assert!(User::delete(&conn, "az-ana").unwrap());
        assert!(!User::delete(&conn, "az-ana").unwrap());
        assert_eq!(User::count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_list_all_in_registration_order() {
        let conn = conn();
        assert!(User::list_all(&conn).unwrap().is_empty());

        User::create(&conn, &ana()).unwrap();
        User::create(
            &conn,
            &UserCreate {
                azure_id: "az-bo".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        let users = User::list_all(&conn).unwrap();
        let ids: Vec<_> = users.iter().map(|u| u.azure_id.as_str()).collect();
        assert_eq!(ids, ["az-ana", "az-bo"]);
        assert!(users[1].name.is_none());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let conn = conn();
        let user = User::create(
            &conn,
            &UserCreate {
                azure_id: "az-anon".to_string(),
                name: Some("  ".to_string()),
                email: Some("anon@example.com".to_string()),
                profile_pic: None,
            },
        )
        .unwrap();
        assert_eq!(user.display_name(), "anon@example.com");

        let bare = User::create(
            &conn,
            &UserCreate {
                azure_id: "az-bare".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(bare.display_name(), "az-bare");
    }
}
