//! DashboardRepository - Query aggregate per la dashboard

use crate::dtos::{RecentEventDTO, StatusCountDTO};
use sqlx::{Error, SqlitePool};
use tracing::instrument;

pub struct DashboardRepository {
    connection_pool: SqlitePool,
}

impl DashboardRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    #[instrument(skip(self))]
    pub async fn count_events(&self) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events WHERE is_deleted = 0")
            .fetch_one(&self.connection_pool)
            .await
    }

    #[instrument(skip(self))]
    pub async fn count_tasks(&self) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM event_tasks WHERE is_deleted = 0")
            .fetch_one(&self.connection_pool)
            .await
    }

    #[instrument(skip(self))]
    pub async fn events_by_status(&self) -> Result<Vec<StatusCountDTO>, Error> {
        sqlx::query_as::<_, StatusCountDTO>(
            r#"
            SELECT status_id, COUNT(*) AS count FROM events
            WHERE is_deleted = 0
            GROUP BY status_id ORDER BY status_id
            "#,
        )
        .fetch_all(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn tasks_by_status(&self) -> Result<Vec<StatusCountDTO>, Error> {
        sqlx::query_as::<_, StatusCountDTO>(
            r#"
            SELECT status_id, COUNT(*) AS count FROM event_tasks
            WHERE is_deleted = 0
            GROUP BY status_id ORDER BY status_id
            "#,
        )
        .fetch_all(&self.connection_pool)
        .await
    }

    /// 0 when there are no tasks
    #[instrument(skip(self))]
    pub async fn average_progress(&self) -> Result<f64, Error> {
        sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(AVG(progress_percentage), 0.0) FROM event_tasks WHERE is_deleted = 0",
        )
        .fetch_one(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn recent_events(&self, limit: i64) -> Result<Vec<RecentEventDTO>, Error> {
        sqlx::query_as::<_, RecentEventDTO>(
            r#"
            SELECT id, title, status_id, created_at FROM events
            WHERE is_deleted = 0
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await
    }
}
