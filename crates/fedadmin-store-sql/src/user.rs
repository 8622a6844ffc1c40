//! `PostgreSQL` implementation of the user store.

use async_trait::async_trait;
use chrono::Utc;
use fedadmin_model::{ExternalLogin, User, UserClaim};
use fedadmin_store::{StoreError, StoreResult, UserStore};
use sqlx::PgPool;
use uuid::Uuid;

use crate::convert::user_from_rows;
use crate::entities::{ExternalLoginRow, UserClaimRow, UserRow};
use crate::error::from_sqlx_error;

/// `PostgreSQL` user store.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Creates a new user store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_user(&self, row: UserRow) -> StoreResult<User> {
        let claims: Vec<UserClaimRow> = sqlx::query_as(
            "SELECT claim_type, claim_value FROM user_claims WHERE user_id = $1
             ORDER BY claim_type, claim_value",
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        let logins: Vec<ExternalLoginRow> = sqlx::query_as(
            "SELECT provider, subject FROM external_logins WHERE user_id = $1
             ORDER BY provider, subject",
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        Ok(user_from_rows(row, claims, logins))
    }

    async fn user_exists(&self, id: Uuid) -> StoreResult<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(from_sqlx_error)
    }

    async fn role_id_by_name(&self, role_name: &str) -> StoreResult<Uuid> {
        let role_id: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM roles WHERE LOWER(name) = LOWER($1)")
                .bind(role_name)
                .fetch_optional(&self.pool)
                .await
                .map_err(from_sqlx_error)?;

        role_id.ok_or_else(|| StoreError::not_found_by_name("Role", role_name))
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: &User) -> StoreResult<()> {
        let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(&user.username)
            .fetch_one(&self.pool)
            .await
            .map_err(from_sqlx_error)?;
        if taken {
            return Err(StoreError::duplicate("User", "username", &user.username));
        }

        let mut tx = self.pool.begin().await.map_err(from_sqlx_error)?;

        sqlx::query(
            r"INSERT INTO users
                (id, username, email, first_name, last_name, enabled, last_login, created_at, updated_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.enabled)
        .bind(user.last_login)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(from_sqlx_error)?;

        for claim in &user.claims {
            sqlx::query(
                r"INSERT INTO user_claims (user_id, claim_type, claim_value)
                  VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
            )
            .bind(user.id)
            .bind(&claim.claim_type)
            .bind(&claim.value)
            .execute(&mut *tx)
            .await
            .map_err(from_sqlx_error)?;
        }

        for login in &user.logins {
            sqlx::query(
                r"INSERT INTO external_logins (provider, subject, user_id)
                  VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
            )
            .bind(&login.provider)
            .bind(&login.subject)
            .bind(user.id)
            .execute(&mut *tx)
            .await
            .map_err(from_sqlx_error)?;
        }

        tx.commit().await.map_err(from_sqlx_error)
    }

    async fn update(&self, user: &User) -> StoreResult<()> {
        // The username column is deliberately left out: it is immutable.
        let result = sqlx::query(
            r"UPDATE users
              SET email = $2, first_name = $3, last_name = $4, enabled = $5,
                  last_login = $6, updated_at = $7
              WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.enabled)
        .bind(user.last_login)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("User", user.id));
        }
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        match row {
            Some(row) => Ok(Some(self.load_user(row).await?)),
            None => Ok(None),
        }
    }

    async fn get_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        match row {
            Some(row) => Ok(Some(self.load_user(row).await?)),
            None => Ok(None),
        }
    }

    async fn get_by_login(&self, provider: &str, subject: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r"SELECT u.* FROM users u
              JOIN external_logins el ON el.user_id = u.id
              WHERE el.provider = $1 AND el.subject = $2",
        )
        .bind(provider)
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        match row {
            Some(row) => Ok(Some(self.load_user(row).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as("SELECT * FROM users ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            users.push(self.load_user(row).await?);
        }
        Ok(users)
    }

    async fn add_claims(&self, user_id: Uuid, claims: &[UserClaim]) -> StoreResult<()> {
        if !self.user_exists(user_id).await? {
            return Err(StoreError::not_found("User", user_id));
        }

        for claim in claims {
            sqlx::query(
                r"INSERT INTO user_claims (user_id, claim_type, claim_value)
                  VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
            )
            .bind(user_id)
            .bind(&claim.claim_type)
            .bind(&claim.value)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx_error)?;
        }
        Ok(())
    }

    async fn add_login(&self, user_id: Uuid, login: &ExternalLogin) -> StoreResult<()> {
        if !self.user_exists(user_id).await? {
            return Err(StoreError::not_found("User", user_id));
        }

        let owner: Option<Uuid> = sqlx::query_scalar(
            "SELECT user_id FROM external_logins WHERE provider = $1 AND subject = $2",
        )
        .bind(&login.provider)
        .bind(&login.subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        match owner {
            Some(owner) if owner != user_id => Err(StoreError::duplicate(
                "ExternalLogin",
                "subject",
                &login.subject,
            )),
            Some(_) => Ok(()),
            None => {
                sqlx::query(
                    r"INSERT INTO external_logins (provider, subject, user_id)
                      VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
                )
                .bind(&login.provider)
                .bind(&login.subject)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(from_sqlx_error)?;
                Ok(())
            }
        }
    }

    async fn add_to_role(&self, user_id: Uuid, role_name: &str) -> StoreResult<()> {
        if !self.user_exists(user_id).await? {
            return Err(StoreError::not_found("User", user_id));
        }
        let role_id = self.role_id_by_name(role_name).await?;

        sqlx::query(
            r"INSERT INTO user_roles (user_id, role_id)
              VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&self.pool)
        .await
        .map_err(from_sqlx_error)?;
        Ok(())
    }

    async fn remove_from_role(&self, user_id: Uuid, role_name: &str) -> StoreResult<()> {
        if !self.user_exists(user_id).await? {
            return Err(StoreError::not_found("User", user_id));
        }
        let role_id = self.role_id_by_name(role_name).await?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx_error)?;
        Ok(())
    }

    async fn is_in_role(&self, user_id: Uuid, role_name: &str) -> StoreResult<bool> {
        sqlx::query_scalar(
            r"SELECT EXISTS(
                SELECT 1 FROM user_roles ur
                JOIN roles r ON r.id = ur.role_id
                WHERE ur.user_id = $1 AND LOWER(r.name) = LOWER($2))",
        )
        .bind(user_id)
        .bind(role_name)
        .fetch_one(&self.pool)
        .await
        .map_err(from_sqlx_error)
    }

    async fn roles_of(&self, user_id: Uuid) -> StoreResult<Vec<String>> {
        if !self.user_exists(user_id).await? {
            return Err(StoreError::not_found("User", user_id));
        }

        sqlx::query_scalar(
            r"SELECT r.name FROM user_roles ur
              JOIN roles r ON r.id = ur.role_id
              WHERE ur.user_id = $1
              ORDER BY ur.granted_at, r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(from_sqlx_error)
    }
}
