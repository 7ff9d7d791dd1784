//! User Storage
//! Mission: Credential handling and account records with SQLite

use crate::auth::error::AuthError;
use crate::models::{Role, User};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode};
use std::time::Duration;
use tracing::{info, warn};

/// Account store with SQLite backend. Opens a short-lived connection per
/// call; no state is shared across requests.
pub struct UserStore {
    db_path: String,
}

impl UserStore {
    /// Create the store, initialize the schema and seed a default admin
    /// account if none exists.
    pub fn new(db_path: &str, default_admin_password: &str) -> Result<Self, AuthError> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db(default_admin_password)?;
        Ok(store)
    }

    fn conn(&self) -> Result<Connection, AuthError> {
        let conn = Connection::open(&self.db_path)?;
        // Cascades depend on this pragma being set per connection
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }

    fn init_db(&self, default_admin_password: &str) -> Result<(), AuthError> {
        let conn = self.conn()?;

        // The UNIQUE constraint on email is the real defense against
        // duplicate registration; the handler pre-check only gives a
        // friendlier error in the common case.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        self.create_default_admin(&conn, default_admin_password)?;

        Ok(())
    }

    /// Seed an admin account for initial setup. Without it no one could
    /// ever assign roles.
    fn create_default_admin(&self, conn: &Connection, password: &str) -> Result<(), AuthError> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE role = 'Admin'",
            [],
            |row| row.get(0),
        )?;

        if count == 0 {
            let password_hash = hash(password, DEFAULT_COST)?;

            conn.execute(
                "INSERT INTO users (username, email, password_hash, role, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    "admin",
                    "admin@blogpress.local",
                    password_hash,
                    Role::Admin.as_str(),
                    Utc::now().to_rfc3339(),
                ],
            )?;

            info!("🔐 Default admin account created (email: admin@blogpress.local)");
            warn!("⚠️  CHANGE DEFAULT ADMIN PASSWORD IN PRODUCTION!");
        }

        Ok(())
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let role_str: String = row.get(4)?;
        // A role outside the closed enum means the row was tampered with;
        // report it rather than quietly demoting the account.
        let role = Role::from_str(&role_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                format!("unknown role '{}' in users table", role_str).into(),
            )
        })?;
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            role,
            created_at: row.get(5)?,
        })
    }

    /// Register a new account with the default Subscriber role. Only the
    /// bcrypt hash of the password is ever stored.
    pub fn register(&self, username: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let conn = self.conn()?;

        // Pre-check for a friendly error; the constraint below still wins
        // under concurrent registration of the same email.
        let taken: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
            params![email],
            |row| row.get(0),
        )?;
        if taken {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash(password, DEFAULT_COST)?;
        let created_at = Utc::now().to_rfc3339();
        let role = Role::default();

        let inserted = conn.execute(
            "INSERT INTO users (username, email, password_hash, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![username, email, password_hash, role.as_str(), created_at],
        );

        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                return Err(AuthError::EmailTaken);
            }
            Err(e) => return Err(e.into()),
        }

        let user = User {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            role,
            created_at,
        };

        info!("✅ Registered account: {} ({})", user.username, user.role.as_str());

        Ok(user)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT id, username, email, password_hash, role, created_at
             FROM users WHERE email = ?1",
        )?;

        match stmt.query_row(params![email], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<User>, AuthError> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT id, username, email, password_hash, role, created_at
             FROM users WHERE id = ?1",
        )?;

        match stmt.query_row(params![id], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Verify an email/password pair. Unknown email and wrong password
    /// return the same error so accounts cannot be enumerated.
    pub fn verify_credentials(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .find_by_email(email)?
            .ok_or(AuthError::InvalidCredentials)?;

        if verify(password, &user.password_hash)? {
            Ok(user)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    pub fn update_role(&self, id: i64, role: Role) -> Result<(), AuthError> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE users SET role = ?1 WHERE id = ?2",
            params![role.as_str(), id],
        )?;
        info!("Account {} role set to {}", id, role.as_str());
        Ok(())
    }

    /// Replace an account's password; same hashing rule as registration.
    pub fn update_password(&self, id: i64, new_password: &str) -> Result<(), AuthError> {
        let password_hash = hash(new_password, DEFAULT_COST)?;
        let conn = self.conn()?;
        conn.execute(
            "UPDATE users SET password_hash = ?1 WHERE id = ?2",
            params![password_hash, id],
        )?;
        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<(), AuthError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        info!("🗑️  Deleted account: {}", id);
        Ok(())
    }
}
