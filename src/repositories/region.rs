//! RegionRepository - Repository per le regioni

use super::{Create, Delete, Read, Update, soft_delete};
use crate::dtos::{CreateRegionDTO, UpdateRegionDTO};
use crate::entities::Region;
use chrono::Utc;
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument};

pub struct RegionRepository {
    connection_pool: SqlitePool,
}

impl RegionRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Region>, Error> {
        sqlx::query_as::<_, Region>("SELECT * FROM regions WHERE is_deleted = 0 ORDER BY name")
            .fetch_all(&self.connection_pool)
            .await
    }

    #[instrument(skip(self))]
    pub async fn find_by_province(&self, province_id: &i32) -> Result<Vec<Region>, Error> {
        sqlx::query_as::<_, Region>(
            "SELECT * FROM regions WHERE province_id = ? AND is_deleted = 0 ORDER BY name",
        )
        .bind(province_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Region names are unique inside the same province only
    #[instrument(skip(self))]
    pub async fn name_exists_in_province(
        &self,
        name: &str,
        province_id: i32,
        exclude_id: Option<i32>,
    ) -> Result<bool, Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM regions
                WHERE name = ? AND province_id = ? AND is_deleted = 0 AND id != ?
            )
            "#,
        )
        .bind(name)
        .bind(province_id)
        .bind(exclude_id.unwrap_or(0))
        .fetch_one(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn code_exists(&self, code: &str, exclude_id: Option<i32>) -> Result<bool, Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM regions WHERE code = ? AND is_deleted = 0 AND id != ?)",
        )
        .bind(code)
        .bind(exclude_id.unwrap_or(0))
        .fetch_one(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn count_schools(&self, id: &i32) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM schools WHERE region_id = ? AND is_deleted = 0",
        )
        .bind(id)
        .fetch_one(&self.connection_pool)
        .await
    }
}

impl Create<Region, CreateRegionDTO> for RegionRepository {
    #[instrument(skip(self, data), fields(name = %data.name, province_id = %data.province_id))]
    async fn create(&self, data: &CreateRegionDTO, actor: i32) -> Result<Region, Error> {
        debug!("Creating region");
        let result = sqlx::query(
            r#"
            INSERT INTO regions (name, code, province_id, created_at, created_by)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.name)
        .bind(&data.code)
        .bind(data.province_id)
        .bind(Utc::now())
        .bind(actor)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid() as i32;
        info!("Region created with id {}", new_id);

        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Region, i32> for RegionRepository {
    #[instrument(skip(self), fields(region_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<Region>, Error> {
        sqlx::query_as::<_, Region>("SELECT * FROM regions WHERE id = ? AND is_deleted = 0")
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<Region, UpdateRegionDTO, i32> for RegionRepository {
    #[instrument(skip(self, data), fields(region_id = %id))]
    async fn update(&self, id: &i32, data: &UpdateRegionDTO, actor: i32) -> Result<Region, Error> {
        let current = self.read(id).await?.ok_or(Error::RowNotFound)?;

        if data.name.is_none() && data.code.is_none() && data.province_id.is_none() {
            debug!("No fields to update, returning current region");
            return Ok(current);
        }

        let mut query_builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new("UPDATE regions SET ");
        let mut separated = query_builder.separated(", ");
        if let Some(ref name) = data.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(ref code) = data.code {
            separated.push("code = ");
            separated.push_bind_unseparated(code);
        }
        if let Some(province_id) = data.province_id {
            separated.push("province_id = ");
            separated.push_bind_unseparated(province_id);
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(Utc::now());
        separated.push("updated_by = ");
        separated.push_bind_unseparated(actor);

        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);

        query_builder.build().execute(&self.connection_pool).await?;
        info!("Region updated");

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for RegionRepository {
    #[instrument(skip(self), fields(region_id = %id))]
    async fn delete(&self, id: &i32, actor: i32) -> Result<(), Error> {
        soft_delete(&self.connection_pool, "regions", *id, actor).await?;
        info!("Region deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "reference")))]
    async fn test_find_by_province(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = RegionRepository::new(pool);

        let tehran = repo.find_by_province(&1).await?;
        assert_eq!(tehran.len(), 2);
        assert!(tehran.iter().all(|r| r.province_id == 1));

        assert!(repo.find_by_province(&3).await?.is_empty());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "reference")))]
    async fn test_name_is_unique_per_province(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = RegionRepository::new(pool);

        assert!(repo.name_exists_in_province("District 1", 1, None).await?);
        // same name under another province is allowed
        assert!(!repo.name_exists_in_province("District 1", 2, None).await?);
        assert!(!repo.name_exists_in_province("District 1", 1, Some(1)).await?);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "reference")))]
    async fn test_create_and_count_schools(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = RegionRepository::new(pool);

        let region = repo
            .create(
                &CreateRegionDTO {
                    name: "North".to_string(),
                    code: "YZD-01".to_string(),
                    province_id: 3,
                },
                1,
            )
            .await?;

        assert_eq!(region.province_id, 3);
        assert_eq!(region.created_by, Some(1));
        assert_eq!(repo.count_schools(&region.id).await?, 0);
        assert_eq!(repo.count_schools(&1).await?, 1);
        Ok(())
    }
}
