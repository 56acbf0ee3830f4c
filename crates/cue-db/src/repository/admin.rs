//! # Admin Repository
//!
//! Staff accounts that may use the API. Passwords are stored only as argon2
//! hashes; see [`crate::password`].

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::password::{hash_password, verify_password};
use cue_core::validation::{validate_admin_update, validate_new_admin};
use cue_core::{Admin, AdminUpdate, NewAdmin};

const ADMIN_COLUMNS: &str = "id, username, email, full_name, password_hash, is_active, \
     is_superuser, created_at, updated_at";

/// Repository for admin database operations.
#[derive(Debug, Clone)]
pub struct AdminRepository {
    pool: SqlitePool,
}

impl AdminRepository {
    /// Creates a new AdminRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AdminRepository { pool }
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<Admin>> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE id = ?");
        let admin = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(admin)
    }

    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<Admin>> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE username = ?");
        let admin = sqlx::query_as(&sql)
            .bind(username.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(admin)
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<Admin>> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE email = ?");
        let admin = sqlx::query_as(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(admin)
    }

    /// Active admins, oldest first.
    pub async fn list_active(&self, skip: i64, limit: i64) -> DbResult<Vec<Admin>> {
        let sql = format!(
            "SELECT {ADMIN_COLUMNS} FROM admins WHERE is_active = 1 \
             ORDER BY created_at, rowid LIMIT ? OFFSET ?"
        );
        let admins: Vec<Admin> = sqlx::query_as(&sql)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;
        debug!(count = admins.len(), "Listed admins");
        Ok(admins)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Registers an admin. Username and email must be unused.
    pub async fn create(&self, input: &NewAdmin, is_superuser: bool) -> DbResult<Admin> {
        validate_new_admin(input)?;

        let username = input.username.trim().to_string();
        let email = input.email.trim().to_string();
        if self.get_by_username(&username).await?.is_some() {
            return Err(DbError::duplicate("username", username));
        }
        if self.get_by_email(&email).await?.is_some() {
            return Err(DbError::duplicate("email", email));
        }

        let now = Utc::now();
        let admin = Admin {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            full_name: input.full_name.clone(),
            password_hash: hash_password(&input.password)?,
            is_active: true,
            is_superuser,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO admins (
                id, username, email, full_name, password_hash,
                is_active, is_superuser, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&admin.id)
        .bind(&admin.username)
        .bind(&admin.email)
        .bind(&admin.full_name)
        .bind(&admin.password_hash)
        .bind(admin.is_active)
        .bind(admin.is_superuser)
        .bind(admin.created_at)
        .bind(admin.updated_at)
        .execute(&self.pool)
        .await?;

        info!(id = %admin.id, username = %admin.username, "Admin created");
        Ok(admin)
    }

    /// Applies a partial update. A supplied password is re-hashed.
    pub async fn update(&self, id: &str, changes: &AdminUpdate) -> DbResult<Admin> {
        validate_admin_update(changes)?;

        let mut admin = self
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Admin", id))?;

        if let Some(email) = &changes.email {
            let email = email.trim().to_string();
            if email != admin.email {
                if self.get_by_email(&email).await?.is_some() {
                    return Err(DbError::duplicate("email", email));
                }
                admin.email = email;
            }
        }
        if let Some(full_name) = &changes.full_name {
            admin.full_name = Some(full_name.clone());
        }
        if let Some(password) = &changes.password {
            admin.password_hash = hash_password(password)?;
        }
        if let Some(active) = changes.is_active {
            admin.is_active = active;
        }
        admin.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE admins
            SET email = ?, full_name = ?, password_hash = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&admin.email)
        .bind(&admin.full_name)
        .bind(&admin.password_hash)
        .bind(admin.is_active)
        .bind(admin.updated_at)
        .bind(&admin.id)
        .execute(&self.pool)
        .await?;

        debug!(id = %admin.id, "Admin updated");
        Ok(admin)
    }

    /// Soft delete.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE admins SET is_active = 0, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Admin", id));
        }
        info!(id = %id, "Admin deactivated");
        Ok(())
    }

    /// Returns the admin if the username exists, is active and the password matches.
    pub async fn authenticate(&self, username: &str, password: &str) -> DbResult<Option<Admin>> {
        let Some(admin) = self.get_by_username(username).await? else {
            warn!(username = %username, "Login for unknown username");
            return Ok(None);
        };
        if !admin.is_active {
            warn!(username = %username, "Login for inactive admin");
            return Ok(None);
        }
        if !verify_password(password, &admin.password_hash) {
            warn!(username = %username, "Login with wrong password");
            return Ok(None);
        }
        debug!(username = %username, "Admin authenticated");
        Ok(Some(admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn desk() -> NewAdmin {
        NewAdmin {
            username: "frontdesk".to_string(),
            email: "desk@club.local".to_string(),
            full_name: Some("Front Desk".to_string()),
            password: "break-and-run".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_authenticate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let admin = db.admins().create(&desk(), false).await.unwrap();
        assert_ne!(admin.password_hash, "break-and-run");

        let ok = db
            .admins()
            .authenticate("frontdesk", "break-and-run")
            .await
            .unwrap();
        assert_eq!(ok.map(|a| a.id), Some(admin.id));

        assert!(db
            .admins()
            .authenticate("frontdesk", "wrong-password")
            .await
            .unwrap()
            .is_none());
        assert!(db
            .admins()
            .authenticate("nobody", "break-and-run")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.admins().create(&desk(), false).await.unwrap();

        let err = db
            .admins()
            .create(
                &NewAdmin {
                    email: "other@club.local".to_string(),
                    ..desk()
                },
                false,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_password_change_and_deactivate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.admins();
        let admin = repo.create(&desk(), false).await.unwrap();

        repo.update(
            &admin.id,
            &AdminUpdate {
                password: Some("new-password-1".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(repo
            .authenticate("frontdesk", "new-password-1")
            .await
            .unwrap()
            .is_some());

        repo.deactivate(&admin.id).await.unwrap();
        assert!(repo
            .authenticate("frontdesk", "new-password-1")
            .await
            .unwrap()
            .is_none());
        assert!(repo.list_active(0, 100).await.unwrap().is_empty());
    }
}
