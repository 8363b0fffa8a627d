//! User Storage
//! Mission: Store and manage user accounts with SQLite

use crate::auth::models::{Role, User};
use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::info;
use uuid::Uuid;

/// User storage with SQLite backend
pub struct UserStore {
    db_path: String,
}

impl UserStore {
    /// Create a new user store and initialize database
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Hash a plaintext password with bcrypt
    pub fn hash_password(password: &str) -> Result<String> {
        hash(password, DEFAULT_COST).context("Failed to hash password")
    }

    /// Create a new user
    pub fn create_user(&self, name: &str, email: &str, password: &str, role: Role) -> Result<User> {
        let password_hash = Self::hash_password(password)?;

        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role,
            created_at: Utc::now().to_rfc3339(),
        };

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO users (id, name, email, password_hash, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.password_hash,
                user.role.as_str(),
                user.created_at,
            ],
        )
        .context("Failed to insert user")?;

        info!("Created user: {} ({})", user.email, user.role.as_str());

        Ok(user)
    }

    /// Get user by email
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, name, email, password_hash, role, created_at
             FROM users WHERE email = ?1",
        )?;

        let user_result = stmt.query_row(params![email], Self::row_to_user);

        match user_result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get user by id
    pub fn find_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, name, email, password_hash, role, created_at
             FROM users WHERE id = ?1",
        )?;

        let user_result = stmt.query_row(params![id.to_string()], Self::row_to_user);

        match user_result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether an email is already registered
    pub fn exists_by_email(&self, email: &str) -> Result<bool> {
        let conn = Connection::open(&self.db_path)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?1",
            params![email],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Verify email and password
    pub fn verify_password(&self, email: &str, password: &str) -> Result<bool> {
        match self.find_by_email(email)? {
            Some(user) => {
                let valid =
                    verify(password, &user.password_hash).context("Failed to verify password")?;
                Ok(valid)
            }
            None => Ok(false),
        }
    }

    /// List all users
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn
            .prepare("SELECT id, name, email, password_hash, role, created_at FROM users")?;

        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Save changes to an existing user
    pub fn update_user(&self, user: &User) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        let rows_affected = conn.execute(
            "UPDATE users SET name = ?2, email = ?3, password_hash = ?4, role = ?5
             WHERE id = ?1",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.password_hash,
                user.role.as_str(),
            ],
        )?;

        if rows_affected == 0 {
            anyhow::bail!("User not found");
        }

        Ok(())
    }

    /// Delete a user by id
    pub fn delete_user(&self, id: &Uuid) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        let rows_affected =
            conn.execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])?;

        if rows_affected == 0 {
            anyhow::bail!("User not found");
        }

        info!("Deleted user: {}", id);
        Ok(())
    }

    fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
        let id: String = row.get(0)?;
        let role_str: String = row.get(4)?;
        Ok(User {
            id: Uuid::parse_str(&id).unwrap_or_default(),
            name: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            role: Role::from_str(&role_str).unwrap_or(Role::User),
            created_at: row.get(5)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (UserStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap();
        let store = UserStore::new(db_path).unwrap();
        (store, temp_file)
    }

    #[test]
    fn test_create_and_retrieve_user() {
        let (store, _temp) = create_test_store();

        let user = store
            .create_user("Alice", "alice@example.com", "password123", Role::User)
            .unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.role, Role::User);

        let by_email = store.find_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, user.id);

        let by_id = store.find_by_id(&user.id).unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (store, _temp) = create_test_store();

        store
            .create_user("Alice", "alice@example.com", "password123", Role::User)
            .unwrap();

        assert!(store.exists_by_email("alice@example.com").unwrap());
        assert!(store
            .create_user("Imposter", "alice@example.com", "other", Role::User)
            .is_err());
    }

    #[test]
    fn test_password_verification() {
        let (store, _temp) = create_test_store();

        store
            .create_user("Alice", "alice@example.com", "password123", Role::User)
            .unwrap();

        assert!(store
            .verify_password("alice@example.com", "password123")
            .unwrap());
        assert!(!store
            .verify_password("alice@example.com", "wrongpassword")
            .unwrap());
        assert!(!store
            .verify_password("nobody@example.com", "password123")
            .unwrap());
    }

    #[test]
    fn test_update_user() {
        let (store, _temp) = create_test_store();

        let mut user = store
            .create_user("Alice", "alice@example.com", "password123", Role::User)
            .unwrap();

        user.name = "Alice Cooper".to_string();
        store.update_user(&user).unwrap();

        let updated = store.find_by_id(&user.id).unwrap().unwrap();
        assert_eq!(updated.name, "Alice Cooper");
    }

    #[test]
    fn test_list_and_delete_users() {
        let (store, _temp) = create_test_store();

        let alice = store
            .create_user("Alice", "alice@example.com", "pass1", Role::User)
            .unwrap();
        store
            .create_user("Bob", "bob@example.com", "pass2", Role::Admin)
            .unwrap();

        assert_eq!(store.list_users().unwrap().len(), 2);

        store.delete_user(&alice.id).unwrap();
        assert_eq!(store.list_users().unwrap().len(), 1);
        assert!(store.find_by_id(&alice.id).unwrap().is_none());

        assert!(store.delete_user(&alice.id).is_err());
    }
}
