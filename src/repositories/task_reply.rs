//! TaskReplyRepository - Repository per le risposte alle attività

use super::{Create, Delete, Read, Update, soft_delete};
use crate::dtos::{CreateTaskReplyDTO, UpdateTaskReplyDTO};
use crate::entities::TaskReply;
use chrono::Utc;
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument};

pub struct TaskReplyRepository {
    connection_pool: SqlitePool,
}

impl TaskReplyRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Replies in the order the actions happened
    #[instrument(skip(self))]
    pub async fn find_by_task(&self, task_id: &i32) -> Result<Vec<TaskReply>, Error> {
        sqlx::query_as::<_, TaskReply>(
            r#"
            SELECT * FROM task_replies
            WHERE task_id = ? AND is_deleted = 0
            ORDER BY action_date_time, id
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Create<TaskReply, CreateTaskReplyDTO> for TaskReplyRepository {
    /// `actor` is the responding user
    #[instrument(skip(self, data), fields(task_id = %data.task_id))]
    async fn create(&self, data: &CreateTaskReplyDTO, actor: i32) -> Result<TaskReply, Error> {
        debug!("Creating task reply");
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO task_replies
                (task_id, content, action_date_time, responded_by_user_id, registered_date,
                 supervisor_unit_id, created_at, created_by)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.task_id)
        .bind(&data.content)
        .bind(data.action_date_time)
        .bind(actor)
        .bind(now)
        .bind(data.supervisor_unit_id)
        .bind(now)
        .bind(actor)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid() as i32;
        info!("Task reply created with id {}", new_id);

        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<TaskReply, i32> for TaskReplyRepository {
    #[instrument(skip(self), fields(reply_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<TaskReply>, Error> {
        sqlx::query_as::<_, TaskReply>("SELECT * FROM task_replies WHERE id = ? AND is_deleted = 0")
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<TaskReply, UpdateTaskReplyDTO, i32> for TaskReplyRepository {
    /// Full replacement of the editable fields
    #[instrument(skip(self, data), fields(reply_id = %id))]
    async fn update(&self, id: &i32, data: &UpdateTaskReplyDTO, actor: i32) -> Result<TaskReply, Error> {
        let result = sqlx::query(
            r#"
            UPDATE task_replies
            SET content = ?, action_date_time = ?, supervisor_unit_id = ?, updated_at = ?, updated_by = ?
            WHERE id = ? AND is_deleted = 0
            "#,
        )
        .bind(&data.content)
        .bind(data.action_date_time)
        .bind(data.supervisor_unit_id)
        .bind(Utc::now())
        .bind(actor)
        .bind(id)
        .execute(&self.connection_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }

        info!("Task reply updated");
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for TaskReplyRepository {
    #[instrument(skip(self), fields(reply_id = %id))]
    async fn delete(&self, id: &i32, actor: i32) -> Result<(), Error> {
        soft_delete(&self.connection_pool, "task_replies", *id, actor).await?;
        info!("Task reply deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_find_by_task_orders_by_action_time(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = TaskReplyRepository::new(pool);

        let ids: Vec<i32> = repo.find_by_task(&1).await?.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(repo.find_by_task(&2).await?.is_empty());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_create_records_responder(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = TaskReplyRepository::new(pool);
        let action_time = Utc.with_ymd_and_hms(2025, 2, 2, 9, 0, 0).unwrap();

        let reply = repo
            .create(
                &CreateTaskReplyDTO {
                    task_id: 2,
                    content: "Inspection done".to_string(),
                    action_date_time: action_time,
                    supervisor_unit_id: Some(1),
                },
                3,
            )
            .await?;

        assert_eq!(reply.responded_by_user_id, 3);
        assert_eq!(reply.action_date_time, action_time);
        assert_eq!(reply.supervisor_unit_id, Some(1));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_update_replaces_fields(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = TaskReplyRepository::new(pool);
        let action_time = Utc.with_ymd_and_hms(2025, 2, 1, 15, 0, 0).unwrap();

        let reply = repo
            .update(
                &2,
                &UpdateTaskReplyDTO {
                    content: "Pumping finished".to_string(),
                    action_date_time: action_time,
                    supervisor_unit_id: None,
                },
                2,
            )
            .await?;

        assert_eq!(reply.content, "Pumping finished");
        assert_eq!(reply.supervisor_unit_id, None);
        assert_eq!(reply.responded_by_user_id, 3);

        repo.delete(&2, 2).await?;
        assert!(matches!(
            repo.update(&2, &UpdateTaskReplyDTO {
                content: "again".to_string(),
                action_date_time: action_time,
                supervisor_unit_id: None,
            }, 2).await,
            Err(Error::RowNotFound)
        ));
        Ok(())
    }
}
