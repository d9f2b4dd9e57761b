//! DynamicTableRepository - Repository per le tabelle di enumerazione dinamiche

use super::{Create, Delete, Read, Update, soft_delete};
use crate::dtos::{CreateDynamicTableDTO, UpdateDynamicTableDTO};
use crate::entities::DynamicTable;
use chrono::Utc;
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument};

pub struct DynamicTableRepository {
    connection_pool: SqlitePool,
}

impl DynamicTableRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<DynamicTable>, Error> {
        sqlx::query_as::<_, DynamicTable>(
            "SELECT * FROM dynamic_tables WHERE is_deleted = 0 ORDER BY table_name, display_order, id",
        )
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Rows of a logical table ordered by display_order
    #[instrument(skip(self))]
    pub async fn find_by_table(
        &self,
        table_name: &str,
        include_inactive: bool,
    ) -> Result<Vec<DynamicTable>, Error> {
        let sql = if include_inactive {
            "SELECT * FROM dynamic_tables WHERE table_name = ? AND is_deleted = 0 ORDER BY display_order, id"
        } else {
            "SELECT * FROM dynamic_tables WHERE table_name = ? AND is_active = 1 AND is_deleted = 0 ORDER BY display_order, id"
        };
        sqlx::query_as::<_, DynamicTable>(sql)
            .bind(table_name)
            .fetch_all(&self.connection_pool)
            .await
    }

    #[instrument(skip(self))]
    pub async fn table_names(&self) -> Result<Vec<String>, Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT table_name FROM dynamic_tables WHERE is_deleted = 0 ORDER BY table_name",
        )
        .fetch_all(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn find_children(&self, parent_id: &i32) -> Result<Vec<DynamicTable>, Error> {
        sqlx::query_as::<_, DynamicTable>(
            "SELECT * FROM dynamic_tables WHERE parent_id = ? AND is_deleted = 0 ORDER BY display_order, id",
        )
        .bind(parent_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// True if (table_name, code) is already taken by a live row other than `exclude_id`
    #[instrument(skip(self))]
    pub async fn code_exists(
        &self,
        table_name: &str,
        code: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM dynamic_tables
                WHERE table_name = ? AND code = ? AND is_deleted = 0 AND id != ?
            )
            "#,
        )
        .bind(table_name)
        .bind(code)
        .bind(exclude_id.unwrap_or(0))
        .fetch_one(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn toggle_active(&self, id: &i32, actor: i32) -> Result<DynamicTable, Error> {
        let result = sqlx::query(
            r#"
            UPDATE dynamic_tables
            SET is_active = 1 - is_active, updated_at = ?, updated_by = ?
            WHERE id = ? AND is_deleted = 0
            "#,
        )
        .bind(Utc::now())
        .bind(actor)
        .bind(id)
        .execute(&self.connection_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }

        info!("Dynamic table row toggled");
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Create<DynamicTable, CreateDynamicTableDTO> for DynamicTableRepository {
    #[instrument(skip(self, data), fields(table = %data.table_name, code = %data.code))]
    async fn create(&self, data: &CreateDynamicTableDTO, actor: i32) -> Result<DynamicTable, Error> {
        debug!("Creating dynamic table row");
        let result = sqlx::query(
            r#"
            INSERT INTO dynamic_tables
                (table_name, code, value, description, display_order, is_active, parent_id,
                 created_at, created_by)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.table_name)
        .bind(&data.code)
        .bind(&data.value)
        .bind(&data.description)
        .bind(data.display_order)
        .bind(data.is_active)
        .bind(data.parent_id)
        .bind(Utc::now())
        .bind(actor)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid() as i32;
        info!("Dynamic table row created with id {}", new_id);

        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<DynamicTable, i32> for DynamicTableRepository {
    #[instrument(skip(self), fields(row_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<DynamicTable>, Error> {
        sqlx::query_as::<_, DynamicTable>(
            "SELECT * FROM dynamic_tables WHERE id = ? AND is_deleted = 0",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Update<DynamicTable, UpdateDynamicTableDTO, i32> for DynamicTableRepository {
    #[instrument(skip(self, data), fields(row_id = %id))]
    async fn update(
        &self,
        id: &i32,
        data: &UpdateDynamicTableDTO,
        actor: i32,
    ) -> Result<DynamicTable, Error> {
        let _ = self.read(id).await?.ok_or(Error::RowNotFound)?;

        let mut query_builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new("UPDATE dynamic_tables SET ");
        let mut separated = query_builder.separated(", ");
        if let Some(ref table_name) = data.table_name {
            separated.push("table_name = ");
            separated.push_bind_unseparated(table_name);
        }
        if let Some(ref code) = data.code {
            separated.push("code = ");
            separated.push_bind_unseparated(code);
        }
        if let Some(ref value) = data.value {
            separated.push("value = ");
            separated.push_bind_unseparated(value);
        }
        if let Some(ref description) = data.description {
            separated.push("description = ");
            separated.push_bind_unseparated(description);
        }
        if let Some(display_order) = data.display_order {
            separated.push("display_order = ");
            separated.push_bind_unseparated(display_order);
        }
        if let Some(is_active) = data.is_active {
            separated.push("is_active = ");
            separated.push_bind_unseparated(is_active);
        }
        if let Some(parent_id) = data.parent_id {
            separated.push("parent_id = ");
            separated.push_bind_unseparated(parent_id);
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(Utc::now());
        separated.push("updated_by = ");
        separated.push_bind_unseparated(actor);

        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);

        query_builder.build().execute(&self.connection_pool).await?;
        info!("Dynamic table row updated");

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for DynamicTableRepository {
    #[instrument(skip(self), fields(row_id = %id))]
    async fn delete(&self, id: &i32, actor: i32) -> Result<(), Error> {
        soft_delete(&self.connection_pool, "dynamic_tables", *id, actor).await?;
        info!("Dynamic table row deleted");
        Ok(())
    }
}
