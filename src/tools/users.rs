//! User MCP Tools
//!
//! Registration check, profile lookup, account deletion and the user listing.

use serde::Serialize;

use crate::db::Database;
use crate::models::{User, UserCreate};

/// Response for check_or_create_user
#[derive(Debug, Serialize)]
pub struct CheckUserResponse {
    /// True only when the user was already registered
    pub exists: bool,
}

/// Response for get_profile
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub name: Option<String>,
    pub email: Option<String>,
    pub profile_pic: Option<String>,
    pub created_at: String,
}

/// One row of list_users
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub user_id: String,
    pub name: Option<String>,
    pub created_at: String,
}

/// Response for list_users
#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserSummary>,
    pub total: usize,
}

/// Response for delete_account
#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub message: String,
}

/// Register a user on first sign-in.
/// A missing or blank `azure_id` registers nothing.
pub fn check_or_create_user(
    db: &Database,
    azure_id: Option<&str>,
    name: Option<&str>,
    email: Option<&str>,
    profile_pic: Option<&str>,
) -> Result<CheckUserResponse, String> {
    let Some(azure_id) = azure_id.map(str::trim).filter(|id| !id.is_empty()) else {
        return Ok(CheckUserResponse { exists: false });
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let existing = User::exists(&conn, azure_id).map_err(|e| format!("Failed to look up user: {}", e))?;
    if existing {
        return Ok(CheckUserResponse { exists: true });
    }

    let data = UserCreate {
        azure_id: azure_id.to_string(),
        name: name.map(String::from),
        email: email.map(String::from),
        profile_pic: profile_pic.map(String::from),
    };

    User::create(&conn, &data).map_err(|e| format!("Failed to create user: {}", e))?;
    tracing::info!(azure_id, "registered new user");

    Ok(CheckUserResponse { exists: false })
}

/// Get a user's profile
pub fn get_profile(db: &Database, azure_id: &str) -> Result<Option<ProfileResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let user = User::get_by_azure_id(&conn, azure_id).map_err(|e| format!("Failed to get user: {}", e))?;

    Ok(user.map(|u| ProfileResponse {
        name: u.name,
        email: u.email,
        profile_pic: u.profile_pic,
        created_at: u.created_at,
    }))
}

/// List every registered user
pub fn list_users(db: &Database) -> Result<ListUsersResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let users: Vec<UserSummary> = User::list_all(&conn)
        .map_err(|e| format!("Failed to list users: {}", e))?
        .into_iter()
        .map(|u| UserSummary {
            user_id: u.azure_id,
            name: u.name,
            created_at: u.created_at,
        })
        .collect();

    Ok(ListUsersResponse {
        total: users.len(),
        users,
    })
}

/// Delete a user and everything stored for them
pub fn delete_account(db: &Database, azure_id: &str) -> Result<DeleteAccountResponse, String> {
    let deleted = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let deleted = User::delete(&tx, azure_id)?;
            tx.commit()?;
            Ok(deleted)
        })
        .map_err(|e| format!("Failed to delete account: {}", e))?;

    if deleted {
        tracing::info!(azure_id, "deleted account");
    }

    Ok(DeleteAccountResponse {
        success: true,
        message: "Account deleted successfully".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use tempfile::TempDir;

    fn test_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("phs.db")).unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        (dir, db)
    }

    #[test]
    fn test_check_or_create_user_flow() {
        let (_dir, db) = test_db();

        let first = check_or_create_user(&db, Some("az-7"), Some("Ravi"), Some("ravi@example.com"), None).unwrap();
        assert!(!first.exists);

        let second = check_or_create_user(&db, Some("az-7"), None, None, None).unwrap();
        assert!(second.exists);

        let profile = get_profile(&db, "az-7").unwrap().unwrap();
        assert_eq!(profile.name.as_deref(), Some("Ravi"));
        assert_eq!(profile.email.as_deref(), Some("ravi@example.com"));
    }

    #[test]
    fn test_missing_identity_registers_nothing() {
        let (_dir, db) = test_db();

        assert!(!check_or_create_user(&db, None, Some("x"), None, None).unwrap().exists);
        assert!(!check_or_create_user(&db, Some("  "), Some("x"), None, None).unwrap().exists);

        let users = db.with_conn(|conn| User::count(conn)).unwrap();
        assert_eq!(users, 0);
    }

    #[test]
    fn test_profile_of_unknown_user() {
        let (_dir, db) = test_db();
        assert!(get_profile(&db, "az-none").unwrap().is_none());
    }

    #[test]
    fn test_list_users_rows() {
        let (_dir, db) = test_db();
        assert_eq!(list_users(&db).unwrap().total, 0);

        check_or_create_user(&db, Some("az-1"), Some("Lena"), Some("lena@example.com"), None).unwrap();
        check_or_create_user(&db, Some("az-2"), None, None, None).unwrap();

        let listing = list_users(&db).unwrap();
        assert_eq!(listing.total, 2);
        assert_eq!(listing.users[0].user_id, "az-1");
        assert_eq!(listing.users[0].name.as_deref(), Some("Lena"));
        assert!(!listing.users[0].created_at.is_empty());
        assert_eq!(listing.users[1].user_id, "az-2");
        assert!(listing.users[1].name.is_none());

        let json = serde_json::to_value(&listing.users[0]).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 3);
        assert!(json.get("email").is_none());

        delete_account(&db, "az-1").unwrap();
        assert_eq!(list_users(&db).unwrap().total, 1);
    }

    #[test]
    fn test_delete_account_removes_profile() {
        let (_dir, db) = test_db();
        check_or_create_user(&db, Some("az-8"), Some("Mei"), None, None).unwrap();

        let response = delete_account(&db, "az-8").unwrap();
        assert!(response.success);
        assert_eq!(response.message, "Account deleted successfully");
        assert!(get_profile(&db, "az-8").unwrap().is_none());

        // Deleting again is not an error
        assert!(delete_account(&db, "az-8").unwrap().success);
    }
}
