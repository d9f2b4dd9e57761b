//! OrganizationUnitRepository - Repository per l'albero delle unità organizzative

use super::{Create, Delete, Read, Update, like_pattern, soft_delete};
use crate::dtos::{CreateOrganizationUnitDTO, UpdateOrganizationUnitDTO};
use crate::entities::OrganizationUnit;
use chrono::Utc;
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument};

pub struct OrganizationUnitRepository {
    connection_pool: SqlitePool,
}

impl OrganizationUnitRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Units ordered by name, optionally only active ones or matching `search`
    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        active_only: bool,
        search: Option<&str>,
    ) -> Result<Vec<OrganizationUnit>, Error> {
        let mut query_builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new(
            "SELECT * FROM organization_units WHERE is_deleted = 0",
        );
        if active_only {
            query_builder.push(" AND is_active = 1");
        }
        if let Some(term) = search.filter(|t| !t.trim().is_empty()) {
            query_builder.push(" AND name LIKE ");
            query_builder.push_bind(like_pattern(term));
            query_builder.push(r" ESCAPE '\'");
        }
        query_builder.push(" ORDER BY name");

        query_builder
            .build_query_as::<OrganizationUnit>()
            .fetch_all(&self.connection_pool)
            .await
    }

    #[instrument(skip(self))]
    pub async fn find_children(&self, parent_id: &i32) -> Result<Vec<OrganizationUnit>, Error> {
        sqlx::query_as::<_, OrganizationUnit>(
            "SELECT * FROM organization_units WHERE parent_unit_id = ? AND is_deleted = 0 ORDER BY name",
        )
        .bind(parent_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Every live unit, parents before children where ids allow it
    #[instrument(skip(self))]
    pub async fn find_for_hierarchy(&self) -> Result<Vec<OrganizationUnit>, Error> {
        sqlx::query_as::<_, OrganizationUnit>(
            "SELECT * FROM organization_units WHERE is_deleted = 0 ORDER BY name, id",
        )
        .fetch_all(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> Result<bool, Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM organization_units WHERE name = ? AND is_deleted = 0 AND id != ?)",
        )
        .bind(name)
        .bind(exclude_id.unwrap_or(0))
        .fetch_one(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn has_children(&self, id: &i32) -> Result<bool, Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM organization_units WHERE parent_unit_id = ? AND is_deleted = 0)",
        )
        .bind(id)
        .fetch_one(&self.connection_pool)
        .await
    }

    /// True if `candidate` is `unit_id` itself or one of its descendants.
    /// Used before re-parenting `unit_id` under `candidate`.
    #[instrument(skip(self))]
    pub async fn is_in_subtree(&self, unit_id: i32, candidate: i32) -> Result<bool, Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            WITH RECURSIVE subtree(id) AS (
                SELECT ?
                UNION
                SELECT ou.id FROM organization_units ou
                INNER JOIN subtree s ON ou.parent_unit_id = s.id
                WHERE ou.is_deleted = 0
            )
            SELECT EXISTS(SELECT 1 FROM subtree WHERE id = ?)
            "#,
        )
        .bind(unit_id)
        .bind(candidate)
        .fetch_one(&self.connection_pool)
        .await
    }

    /// Flips `is_active`, returning the updated unit
    #[instrument(skip(self))]
    pub async fn toggle_active(&self, id: &i32, actor: i32) -> Result<OrganizationUnit, Error> {
        let result = sqlx::query(
            r#"
            UPDATE organization_units
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

        info!("Organization unit active flag toggled");
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Create<OrganizationUnit, CreateOrganizationUnitDTO> for OrganizationUnitRepository {
    #[instrument(skip(self, data), fields(name = %data.name))]
    async fn create(
        &self,
        data: &CreateOrganizationUnitDTO,
        actor: i32,
    ) -> Result<OrganizationUnit, Error> {
        debug!("Creating organization unit");
        let result = sqlx::query(
            r#"
            INSERT INTO organization_units
                (name, unit_type, code, parent_unit_id, province_id, region_id, school_id,
                 address, phone_number, is_active, created_at, created_by)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.name)
        .bind(data.unit_type)
        .bind(&data.code)
        .bind(data.parent_unit_id)
        .bind(data.province_id)
        .bind(data.region_id)
        .bind(data.school_id)
        .bind(&data.address)
        .bind(&data.phone_number)
        .bind(data.is_active)
        .bind(Utc::now())
        .bind(actor)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid() as i32;
        info!("Organization unit created with id {}", new_id);

        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<OrganizationUnit, i32> for OrganizationUnitRepository {
    #[instrument(skip(self), fields(unit_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<OrganizationUnit>, Error> {
        sqlx::query_as::<_, OrganizationUnit>(
            "SELECT * FROM organization_units WHERE id = ? AND is_deleted = 0",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Update<OrganizationUnit, UpdateOrganizationUnitDTO, i32> for OrganizationUnitRepository {
    #[instrument(skip(self, data), fields(unit_id = %id))]
    async fn update(
        &self,
        id: &i32,
        data: &UpdateOrganizationUnitDTO,
        actor: i32,
    ) -> Result<OrganizationUnit, Error> {
        let _ = self.read(id).await?.ok_or(Error::RowNotFound)?;

        let mut query_builder =
            sqlx::QueryBuilder::<sqlx::Sqlite>::new("UPDATE organization_units SET ");
        let mut separated = query_builder.separated(", ");
        if let Some(ref name) = data.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(unit_type) = data.unit_type {
            separated.push("unit_type = ");
            separated.push_bind_unseparated(unit_type);
        }
        if let Some(ref code) = data.code {
            separated.push("code = ");
            separated.push_bind_unseparated(code);
        }
        if let Some(parent_unit_id) = data.parent_unit_id {
            separated.push("parent_unit_id = ");
            separated.push_bind_unseparated(parent_unit_id);
        }
        if let Some(province_id) = data.province_id {
            separated.push("province_id = ");
            separated.push_bind_unseparated(province_id);
        }
        if let Some(region_id) = data.region_id {
            separated.push("region_id = ");
            separated.push_bind_unseparated(region_id);
        }
        if let Some(school_id) = data.school_id {
            separated.push("school_id = ");
            separated.push_bind_unseparated(school_id);
        }
        if let Some(ref address) = data.address {
            separated.push("address = ");
            separated.push_bind_unseparated(address);
        }
        if let Some(ref phone_number) = data.phone_number {
            separated.push("phone_number = ");
            separated.push_bind_unseparated(phone_number);
        }
        if let Some(is_active) = data.is_active {
            separated.push("is_active = ");
            separated.push_bind_unseparated(is_active);
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(Utc::now());
        separated.push("updated_by = ");
        separated.push_bind_unseparated(actor);

        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);

        query_builder.build().execute(&self.connection_pool).await?;
        info!("Organization unit updated");

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for OrganizationUnitRepository {
    #[instrument(skip(self), fields(unit_id = %id))]
    async fn delete(&self, id: &i32, actor: i32) -> Result<(), Error> {
        soft_delete(&self.connection_pool, "organization_units", *id, actor).await?;
        info!("Organization unit deleted");
        Ok(())
    }
}
