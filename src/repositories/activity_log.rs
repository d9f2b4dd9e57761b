//! ActivityLogRepository - Scrittura e lettura del log attività utenti

use crate::dtos::CreateActivityLogDTO;
use crate::entities::UserActivityLog;
use chrono::Utc;
use sqlx::{Error, SqlitePool};
use tracing::{debug, instrument};

pub struct ActivityLogRepository {
    connection_pool: SqlitePool,
}

impl ActivityLogRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    #[instrument(skip(self, data), fields(activity = data.activity_type, user_id = ?data.user_id))]
    pub async fn record(&self, data: &CreateActivityLogDTO) -> Result<i32, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_activity_logs
                (user_id, activity_type, description, ip_address, user_agent,
                 is_successful, error_message, activity_date_time)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.user_id)
        .bind(data.activity_type)
        .bind(&data.description)
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .bind(data.is_successful)
        .bind(&data.error_message)
        .bind(Utc::now())
        .execute(&self.connection_pool)
        .await?;

        debug!("Activity recorded");
        Ok(result.last_insert_rowid() as i32)
    }

    /// Newest first
    #[instrument(skip(self))]
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UserActivityLog>, Error> {
        sqlx::query_as::<_, UserActivityLog>(
            "SELECT * FROM user_activity_logs ORDER BY activity_date_time DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn find_by_user(&self, user_id: &i32) -> Result<Vec<UserActivityLog>, Error> {
        sqlx::query_as::<_, UserActivityLog>(
            "SELECT * FROM user_activity_logs WHERE user_id = ? ORDER BY activity_date_time DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await
    }
}
