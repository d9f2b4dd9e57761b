//! ProvinceRepository - Repository per le province

use super::{Create, Delete, Read, Update, soft_delete};
use crate::dtos::{CreateProvinceDTO, UpdateProvinceDTO};
use crate::entities::Province;
use chrono::Utc;
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument};

pub struct ProvinceRepository {
    connection_pool: SqlitePool,
}

impl ProvinceRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Province>, Error> {
        sqlx::query_as::<_, Province>("SELECT * FROM provinces WHERE is_deleted = 0 ORDER BY name")
            .fetch_all(&self.connection_pool)
            .await
    }

    /// True if another live province already uses this name
    #[instrument(skip(self))]
    pub async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> Result<bool, Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM provinces WHERE name = ? AND is_deleted = 0 AND id != ?)",
        )
        .bind(name)
        .bind(exclude_id.unwrap_or(0))
        .fetch_one(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn code_exists(&self, code: &str, exclude_id: Option<i32>) -> Result<bool, Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM provinces WHERE code = ? AND is_deleted = 0 AND id != ?)",
        )
        .bind(code)
        .bind(exclude_id.unwrap_or(0))
        .fetch_one(&self.connection_pool)
        .await
    }

    /// Number of live regions still referencing the province
    #[instrument(skip(self))]
    pub async fn count_regions(&self, id: &i32) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM regions WHERE province_id = ? AND is_deleted = 0",
        )
        .bind(id)
        .fetch_one(&self.connection_pool)
        .await
    }
}

impl Create<Province, CreateProvinceDTO> for ProvinceRepository {
    #[instrument(skip(self, data), fields(name = %data.name))]
    async fn create(&self, data: &CreateProvinceDTO, actor: i32) -> Result<Province, Error> {
        debug!("Creating province");
        let result = sqlx::query(
            "INSERT INTO provinces (name, code, created_at, created_by) VALUES (?, ?, ?, ?)",
        )
        .bind(&data.name)
        .bind(&data.code)
        .bind(Utc::now())
        .bind(actor)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid() as i32;
        info!("Province created with id {}", new_id);

        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Province, i32> for ProvinceRepository {
    #[instrument(skip(self), fields(province_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<Province>, Error> {
        sqlx::query_as::<_, Province>("SELECT * FROM provinces WHERE id = ? AND is_deleted = 0")
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<Province, UpdateProvinceDTO, i32> for ProvinceRepository {
    #[instrument(skip(self, data), fields(province_id = %id))]
    async fn update(&self, id: &i32, data: &UpdateProvinceDTO, actor: i32) -> Result<Province, Error> {
        let current = self.read(id).await?.ok_or(Error::RowNotFound)?;

        if data.name.is_none() && data.code.is_none() {
            debug!("No fields to update, returning current province");
            return Ok(current);
        }

        let mut query_builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new("UPDATE provinces SET ");
        let mut separated = query_builder.separated(", ");
        if let Some(ref name) = data.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(ref code) = data.code {
            separated.push("code = ");
            separated.push_bind_unseparated(code);
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(Utc::now());
        separated.push("updated_by = ");
        separated.push_bind_unseparated(actor);

        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);

        query_builder.build().execute(&self.connection_pool).await?;
        info!("Province updated");

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for ProvinceRepository {
    #[instrument(skip(self), fields(province_id = %id))]
    async fn delete(&self, id: &i32, actor: i32) -> Result<(), Error> {
        soft_delete(&self.connection_pool, "provinces", *id, actor).await?;
        info!("Province deleted");
        Ok(())
    }
}
