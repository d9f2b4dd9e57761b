//! SchoolRepository - Repository per le scuole

use super::{Create, Delete, Read, Update, like_pattern, soft_delete};
use crate::dtos::{CreateSchoolDTO, UpdateSchoolDTO};
use crate::entities::School;
use chrono::Utc;
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument};

pub struct SchoolRepository {
    connection_pool: SqlitePool,
}

impl SchoolRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<School>, Error> {
        sqlx::query_as::<_, School>("SELECT * FROM schools WHERE is_deleted = 0 ORDER BY name")
            .fetch_all(&self.connection_pool)
            .await
    }

    #[instrument(skip(self))]
    pub async fn find_by_region(&self, region_id: &i32) -> Result<Vec<School>, Error> {
        sqlx::query_as::<_, School>(
            "SELECT * FROM schools WHERE region_id = ? AND is_deleted = 0 ORDER BY name",
        )
        .bind(region_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn find_by_province(&self, province_id: &i32) -> Result<Vec<School>, Error> {
        sqlx::query_as::<_, School>(
            "SELECT * FROM schools WHERE province_id = ? AND is_deleted = 0 ORDER BY name",
        )
        .bind(province_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Substring search over name, code and address
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<Vec<School>, Error> {
        let pattern = like_pattern(term);
        sqlx::query_as::<_, School>(
            r#"
            SELECT * FROM schools
            WHERE is_deleted = 0 AND (name LIKE ? ESCAPE '\' OR code LIKE ? ESCAPE '\' OR address LIKE ? ESCAPE '\')
            ORDER BY name
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> Result<bool, Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM schools WHERE name = ? AND is_deleted = 0 AND id != ?)",
        )
        .bind(name)
        .bind(exclude_id.unwrap_or(0))
        .fetch_one(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn code_exists(&self, code: &str, exclude_id: Option<i32>) -> Result<bool, Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM schools WHERE code = ? AND is_deleted = 0 AND id != ?)",
        )
        .bind(code)
        .bind(exclude_id.unwrap_or(0))
        .fetch_one(&self.connection_pool)
        .await
    }
}

impl Create<School, CreateSchoolDTO> for SchoolRepository {
    #[instrument(skip(self, data), fields(name = %data.name))]
    async fn create(&self, data: &CreateSchoolDTO, actor: i32) -> Result<School, Error> {
        debug!("Creating school");
        let result = sqlx::query(
            r#"
            INSERT INTO schools (name, code, region_id, province_id, address, phone_number,
                                 created_at, created_by)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.name)
        .bind(&data.code)
        .bind(data.region_id)
        .bind(data.province_id)
        .bind(&data.address)
        .bind(&data.phone_number)
        .bind(Utc::now())
        .bind(actor)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid() as i32;
        info!("School created with id {}", new_id);

        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<School, i32> for SchoolRepository {
    #[instrument(skip(self), fields(school_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<School>, Error> {
        sqlx::query_as::<_, School>("SELECT * FROM schools WHERE id = ? AND is_deleted = 0")
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<School, UpdateSchoolDTO, i32> for SchoolRepository {
    #[instrument(skip(self, data), fields(school_id = %id))]
    async fn update(&self, id: &i32, data: &UpdateSchoolDTO, actor: i32) -> Result<School, Error> {
        // La scuola deve esistere anche quando il DTO non cambia nulla
        let _ = self.read(id).await?.ok_or(Error::RowNotFound)?;

        let mut query_builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new("UPDATE schools SET ");
        let mut separated = query_builder.separated(", ");
        if let Some(ref name) = data.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(ref code) = data.code {
            separated.push("code = ");
            separated.push_bind_unseparated(code);
        }
        if let Some(region_id) = data.region_id {
            separated.push("region_id = ");
            separated.push_bind_unseparated(region_id);
        }
        if let Some(province_id) = data.province_id {
            separated.push("province_id = ");
            separated.push_bind_unseparated(province_id);
        }
        if let Some(ref address) = data.address {
            separated.push("address = ");
            separated.push_bind_unseparated(address);
        }
        if let Some(ref phone_number) = data.phone_number {
            separated.push("phone_number = ");
            separated.push_bind_unseparated(phone_number);
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(Utc::now());
        separated.push("updated_by = ");
        separated.push_bind_unseparated(actor);

        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);

        query_builder.build().execute(&self.connection_pool).await?;
        info!("School updated");

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for SchoolRepository {
    #[instrument(skip(self), fields(school_id = %id))]
    async fn delete(&self, id: &i32, actor: i32) -> Result<(), Error> {
        soft_delete(&self.connection_pool, "schools", *id, actor).await?;
        info!("School deleted");
        Ok(())
    }
}
