//! `PostgreSQL` implementation of the role store.

use async_trait::async_trait;
use fedadmin_model::Role;
use fedadmin_store::{RoleStore, StoreError, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::convert::role_from_row;
use crate::entities::RoleRow;
use crate::error::from_sqlx_error;

/// `PostgreSQL` role store.
pub struct PgRoleStore {
    pool: PgPool,
}

impl PgRoleStore {
    /// Creates a new role store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for PgRoleStore {
    async fn create(&self, role: &Role) -> StoreResult<()> {
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM roles WHERE LOWER(name) = LOWER($1))")
                .bind(&role.name)
                .fetch_one(&self.pool)
                .await
                .map_err(from_sqlx_error)?;
        if taken {
            return Err(StoreError::duplicate("Role", "name", &role.name));
        }

        sqlx::query(
            r"INSERT INTO roles (id, name, display_name, created_at, updated_at)
              VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(role.id)
        .bind(&role.name)
        .bind(&role.display_name)
        .bind(role.created_at)
        .bind(role.updated_at)
        .execute(&self.pool)
        .await
        .map_err(from_sqlx_error)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        // Memberships cascade through the foreign key.
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Role", id));
        }
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Role>> {
        let row: Option<RoleRow> = sqlx::query_as("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        Ok(row.map(role_from_row))
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Role>> {
        let row: Option<RoleRow> =
            sqlx::query_as("SELECT * FROM roles WHERE LOWER(name) = LOWER($1)")
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(from_sqlx_error)?;

        Ok(row.map(role_from_row))
    }

    async fn list(&self) -> StoreResult<Vec<Role>> {
        let rows: Vec<RoleRow> = sqlx::query_as("SELECT * FROM roles ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        Ok(rows.into_iter().map(role_from_row).collect())
    }
}
