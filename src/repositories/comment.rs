//! CommentRepository - Repository per i commenti su eventi e attività

use super::{Create, Delete, Read, Update, soft_delete};
use crate::dtos::{CreateCommentDTO, UpdateCommentDTO};
use crate::entities::Comment;
use chrono::Utc;
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument};

pub struct CommentRepository {
    connection_pool: SqlitePool,
}

impl CommentRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Newest first
    #[instrument(skip(self))]
    pub async fn find_by_event(&self, event_id: &i32) -> Result<Vec<Comment>, Error> {
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE event_id = ? AND is_deleted = 0 ORDER BY created_at DESC, id DESC",
        )
        .bind(event_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Newest first
    #[instrument(skip(self))]
    pub async fn find_by_task(&self, task_id: &i32) -> Result<Vec<Comment>, Error> {
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE task_id = ? AND is_deleted = 0 ORDER BY created_at DESC, id DESC",
        )
        .bind(task_id)
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Create<Comment, CreateCommentDTO> for CommentRepository {
    /// `actor` becomes the author of the comment
    #[instrument(skip(self, data), fields(event_id = ?data.event_id, task_id = ?data.task_id))]
    async fn create(&self, data: &CreateCommentDTO, actor: i32) -> Result<Comment, Error> {
        debug!("Creating comment");
        let result = sqlx::query(
            r#"
            INSERT INTO comments (event_id, task_id, content, commented_by, parent_comment_id,
                                  created_at, created_by)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.event_id)
        .bind(data.task_id)
        .bind(&data.content)
        .bind(actor)
        .bind(data.parent_comment_id)
        .bind(Utc::now())
        .bind(actor)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid() as i32;
        info!("Comment created with id {}", new_id);

        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Comment, i32> for CommentRepository {
    #[instrument(skip(self), fields(comment_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<Comment>, Error> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ? AND is_deleted = 0")
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<Comment, UpdateCommentDTO, i32> for CommentRepository {
    #[instrument(skip(self, data), fields(comment_id = %id))]
    async fn update(&self, id: &i32, data: &UpdateCommentDTO, actor: i32) -> Result<Comment, Error> {
        let result = sqlx::query(
            "UPDATE comments SET content = ?, updated_at = ?, updated_by = ? WHERE id = ? AND is_deleted = 0",
        )
        .bind(&data.content)
        .bind(Utc::now())
        .bind(actor)
        .bind(id)
        .execute(&self.connection_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }

        info!("Comment updated");
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for CommentRepository {
    #[instrument(skip(self), fields(comment_id = %id))]
    async fn delete(&self, id: &i32, actor: i32) -> Result<(), Error> {
        soft_delete(&self.connection_pool, "comments", *id, actor).await?;
        info!("Comment deleted");
        Ok(())
    }
}
