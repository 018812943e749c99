use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::account::errors::DirectoryError;
use crate::account::models::EmailAddress;
use crate::account::models::NewUser;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::models::UserRecordPatch;
use crate::account::models::Username;
use crate::account::ports::UserDirectory;

/// Postgres-backed user Directory.
///
/// Owns id assignment and the email-uniqueness invariant: the `users` table
/// carries a unique constraint on `email`, and a violation surfaces as
/// `DuplicateEmail` regardless of which concurrent writer loses the race.
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_row(row: &PgRow) -> Result<User, DirectoryError> {
    let id: Uuid = row
        .try_get("id")
        .map_err(|e| DirectoryError::Storage(e.to_string()))?;
    let username: String = row
        .try_get("username")
        .map_err(|e| DirectoryError::Storage(e.to_string()))?;
    let email: String = row
        .try_get("email")
        .map_err(|e| DirectoryError::Storage(e.to_string()))?;
    let password_hash: String = row
        .try_get("password_hash")
        .map_err(|e| DirectoryError::Storage(e.to_string()))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| DirectoryError::Storage(e.to_string()))?;

    Ok(User {
        id: UserId(id),
        username: Username::new(username)
            .map_err(|e| DirectoryError::Storage(format!("Corrupt username column: {}", e)))?,
        email: EmailAddress::new(email)
            .map_err(|e| DirectoryError::Storage(format!("Corrupt email column: {}", e)))?,
        password_hash,
        created_at,
    })
}

fn map_write_error(e: sqlx::Error, email: Option<&str>) -> DirectoryError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
            return DirectoryError::DuplicateEmail(email.unwrap_or_default().to_string());
        }
    }
    DirectoryError::Storage(e.to_string())
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn create_user(&self, user: NewUser) -> Result<User, DirectoryError> {
        let id = UserId::new();
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, Some(user.email.as_str())))?;

        Ok(User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at,
        })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DirectoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError::Storage(e.to_string()))?;

        row.as_ref().map(map_row).transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, DirectoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DirectoryError::Storage(e.to_string()))?;

        row.as_ref().map(map_row).transpose()
    }

    async fn update_user(
        &self,
        id: &UserId,
        patch: UserRecordPatch,
    ) -> Result<Option<User>, DirectoryError> {
        let email = patch.email.as_ref().map(|e| e.as_str().to_string());

        let row = sqlx::query(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash)
            WHERE id = $1
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(id.0)
        .bind(patch.username.as_ref().map(|u| u.as_str()))
        .bind(patch.email.as_ref().map(|e| e.as_str()))
        .bind(patch.password_hash.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, email.as_deref()))?;

        row.as_ref().map(map_row).transpose()
    }

    async fn delete_user(&self, id: &UserId) -> Result<bool, DirectoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| DirectoryError::Storage(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
