//! TaskRepository - Repository per le attività degli eventi

use super::{Create, Delete, Read, Update, like_pattern, soft_delete};
use crate::dtos::{CreateTaskDTO, UpdateTaskDTO};
use crate::entities::{EventTask, ProgressCalculationMethod, TASK_STATUS_NEW};
use chrono::Utc;
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument};

pub struct TaskRepository {
    connection_pool: SqlitePool,
}

impl TaskRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<EventTask>, Error> {
        sqlx::query_as::<_, EventTask>(
            "SELECT * FROM event_tasks WHERE is_deleted = 0 ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Tasks of an event in creation order
    #[instrument(skip(self))]
    pub async fn find_by_event(&self, event_id: &i32) -> Result<Vec<EventTask>, Error> {
        sqlx::query_as::<_, EventTask>(
            "SELECT * FROM event_tasks WHERE event_id = ? AND is_deleted = 0 ORDER BY created_at, id",
        )
        .bind(event_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn find_by_unit(&self, unit_id: &i32) -> Result<Vec<EventTask>, Error> {
        sqlx::query_as::<_, EventTask>(
            r#"
            SELECT * FROM event_tasks
            WHERE assigned_to_unit_id = ? AND is_deleted = 0
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn find_by_status(&self, status_id: &i32) -> Result<Vec<EventTask>, Error> {
        sqlx::query_as::<_, EventTask>(
            r#"
            SELECT * FROM event_tasks
            WHERE status_id = ? AND is_deleted = 0
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(status_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<Vec<EventTask>, Error> {
        let pattern = like_pattern(term);
        sqlx::query_as::<_, EventTask>(
            r#"
            SELECT * FROM event_tasks
            WHERE is_deleted = 0 AND (title LIKE ? ESCAPE '\' OR description LIKE ? ESCAPE '\')
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Stores the new progress and status computed by the caller
    #[instrument(skip(self))]
    pub async fn update_progress(
        &self,
        id: &i32,
        progress_percentage: i32,
        method: ProgressCalculationMethod,
        status_id: i32,
        actor: i32,
    ) -> Result<EventTask, Error> {
        let result = sqlx::query(
            r#"
            UPDATE event_tasks
            SET progress_percentage = ?, progress_calculation_method = ?, status_id = ?,
                updated_at = ?, updated_by = ?
            WHERE id = ? AND is_deleted = 0
            "#,
        )
        .bind(progress_percentage)
        .bind(method)
        .bind(status_id)
        .bind(Utc::now())
        .bind(actor)
        .bind(id)
        .execute(&self.connection_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }

        info!("Task progress set to {}%", progress_percentage);
        self.read(id).await?.ok_or(Error::RowNotFound)
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &i32, status_id: i32, actor: i32) -> Result<EventTask, Error> {
        let result = sqlx::query(
            "UPDATE event_tasks SET status_id = ?, updated_at = ?, updated_by = ? WHERE id = ? AND is_deleted = 0",
        )
        .bind(status_id)
        .bind(Utc::now())
        .bind(actor)
        .bind(id)
        .execute(&self.connection_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }

        info!("Task status set to {}", status_id);
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Create<EventTask, CreateTaskDTO> for TaskRepository {
    #[instrument(skip(self, data), fields(title = %data.title, event_id = %data.event_id))]
    async fn create(&self, data: &CreateTaskDTO, actor: i32) -> Result<EventTask, Error> {
        debug!("Creating task");
        let result = sqlx::query(
            r#"
            INSERT INTO event_tasks
                (title, description, event_id, assigned_to_unit_id, assigned_to_user_id,
                 supervisor_user_id, cooperating_units_ids, action_type_id, progress_percentage,
                 progress_calculation_method, due_date, status_id, created_at, created_by)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.event_id)
        .bind(data.assigned_to_unit_id)
        .bind(data.assigned_to_user_id)
        .bind(data.supervisor_user_id)
        .bind(&data.cooperating_units_ids)
        .bind(data.action_type_id)
        .bind(data.progress_calculation_method)
        .bind(data.due_date)
        .bind(data.status_id.unwrap_or(TASK_STATUS_NEW))
        .bind(Utc::now())
        .bind(actor)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid() as i32;
        info!("Task created with id {}", new_id);

        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<EventTask, i32> for TaskRepository {
    #[instrument(skip(self), fields(task_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<EventTask>, Error> {
        sqlx::query_as::<_, EventTask>("SELECT * FROM event_tasks WHERE id = ? AND is_deleted = 0")
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<EventTask, UpdateTaskDTO, i32> for TaskRepository {
    #[instrument(skip(self, data), fields(task_id = %id))]
    async fn update(&self, id: &i32, data: &UpdateTaskDTO, actor: i32) -> Result<EventTask, Error> {
        let current = self.read(id).await?.ok_or(Error::RowNotFound)?;

        if data.is_empty() {
            debug!("No fields to update, returning current task");
            return Ok(current);
        }

        let mut query_builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new("UPDATE event_tasks SET ");
        let mut separated = query_builder.separated(", ");
        if let Some(ref title) = data.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title);
        }
        if let Some(ref description) = data.description {
            separated.push("description = ");
            separated.push_bind_unseparated(description);
        }
        if let Some(assigned_to_unit_id) = data.assigned_to_unit_id {
            separated.push("assigned_to_unit_id = ");
            separated.push_bind_unseparated(assigned_to_unit_id);
        }
        if let Some(assigned_to_user_id) = data.assigned_to_user_id {
            separated.push("assigned_to_user_id = ");
            separated.push_bind_unseparated(assigned_to_user_id);
        }
        if let Some(supervisor_user_id) = data.supervisor_user_id {
            separated.push("supervisor_user_id = ");
            separated.push_bind_unseparated(supervisor_user_id);
        }
        if let Some(ref cooperating_units_ids) = data.cooperating_units_ids {
            separated.push("cooperating_units_ids = ");
            separated.push_bind_unseparated(cooperating_units_ids);
        }
        if let Some(action_type_id) = data.action_type_id {
            separated.push("action_type_id = ");
            separated.push_bind_unseparated(action_type_id);
        }
        if let Some(method) = data.progress_calculation_method {
            separated.push("progress_calculation_method = ");
            separated.push_bind_unseparated(method);
        }
        if let Some(due_date) = data.due_date {
            separated.push("due_date = ");
            separated.push_bind_unseparated(due_date);
        }
        if let Some(status_id) = data.status_id {
            separated.push("status_id = ");
            separated.push_bind_unseparated(status_id);
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(Utc::now());
        separated.push("updated_by = ");
        separated.push_bind_unseparated(actor);

        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);

        query_builder.build().execute(&self.connection_pool).await?;
        info!("Task updated");

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for TaskRepository {
    #[instrument(skip(self), fields(task_id = %id))]
    async fn delete(&self, id: &i32, actor: i32) -> Result<(), Error> {
        soft_delete(&self.connection_pool, "event_tasks", *id, actor).await?;
        info!("Task deleted");
        Ok(())
    }
}
