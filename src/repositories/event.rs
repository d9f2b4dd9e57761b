//! EventRepository - Repository per gli eventi

use super::{Create, Delete, Read, Update, like_pattern, soft_delete};
use crate::dtos::{CreateEventDTO, UpdateEventDTO};
use crate::entities::{EVENT_STATUS_REGISTERED, Event};
use chrono::Utc;
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument};

pub struct EventRepository {
    connection_pool: SqlitePool,
}

impl EventRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Newest first
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Event>, Error> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE is_deleted = 0 ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn find_by_unit(&self, unit_id: &i32) -> Result<Vec<Event>, Error> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT * FROM events
            WHERE action_unit_id = ? AND is_deleted = 0
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn find_by_status(&self, status_id: &i32) -> Result<Vec<Event>, Error> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT * FROM events
            WHERE status_id = ? AND is_deleted = 0
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(status_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Matches title or description
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<Vec<Event>, Error> {
        let pattern = like_pattern(term);
        sqlx::query_as::<_, Event>(
            r#"
            SELECT * FROM events
            WHERE is_deleted = 0 AND (title LIKE ? ESCAPE '\' OR description LIKE ? ESCAPE '\')
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &i32, status_id: i32, actor: i32) -> Result<Event, Error> {
        let result = sqlx::query(
            "UPDATE events SET status_id = ?, updated_at = ?, updated_by = ? WHERE id = ? AND is_deleted = 0",
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

        info!("Event status set to {}", status_id);
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Create<Event, CreateEventDTO> for EventRepository {
    /// `actor` is recorded both as creator and as `registered_by`
    #[instrument(skip(self, data), fields(title = %data.title))]
    async fn create(&self, data: &CreateEventDTO, actor: i32) -> Result<Event, Error> {
        debug!("Registering new event");
        let result = sqlx::query(
            r#"
            INSERT INTO events
                (title, description, event_source_id, event_subject_id, urgency_id, scope_id,
                 scope_details, impact_scope_id, impact_scope_details, impact_range_id,
                 event_start_date, event_end_date, action_unit_id, status_id, registered_by,
                 reviewed_by, created_at, created_by)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.event_source_id)
        .bind(data.event_subject_id)
        .bind(data.urgency_id)
        .bind(data.scope_id)
        .bind(&data.scope_details)
        .bind(data.impact_scope_id)
        .bind(&data.impact_scope_details)
        .bind(data.impact_range_id)
        .bind(data.event_start_date)
        .bind(data.event_end_date)
        .bind(data.action_unit_id)
        .bind(data.status_id.unwrap_or(EVENT_STATUS_REGISTERED))
        .bind(actor)
        .bind(data.reviewed_by)
        .bind(Utc::now())
        .bind(actor)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid() as i32;
        info!("Event created with id {}", new_id);

        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Event, i32> for EventRepository {
    #[instrument(skip(self), fields(event_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<Event>, Error> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ? AND is_deleted = 0")
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<Event, UpdateEventDTO, i32> for EventRepository {
    #[instrument(skip(self, data), fields(event_id = %id))]
    async fn update(&self, id: &i32, data: &UpdateEventDTO, actor: i32) -> Result<Event, Error> {
        let current = self.read(id).await?.ok_or(Error::RowNotFound)?;

        if data.is_empty() {
            debug!("No fields to update, returning current event");
            return Ok(current);
        }

        let mut query_builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new("UPDATE events SET ");
        let mut separated = query_builder.separated(", ");
        if let Some(ref title) = data.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title);
        }
        if let Some(ref description) = data.description {
            separated.push("description = ");
            separated.push_bind_unseparated(description);
        }
        if let Some(event_source_id) = data.event_source_id {
            separated.push("event_source_id = ");
            separated.push_bind_unseparated(event_source_id);
        }
        if let Some(event_subject_id) = data.event_subject_id {
            separated.push("event_subject_id = ");
            separated.push_bind_unseparated(event_subject_id);
        }
        if let Some(urgency_id) = data.urgency_id {
            separated.push("urgency_id = ");
            separated.push_bind_unseparated(urgency_id);
        }
        if let Some(scope_id) = data.scope_id {
            separated.push("scope_id = ");
            separated.push_bind_unseparated(scope_id);
        }
        if let Some(ref scope_details) = data.scope_details {
            separated.push("scope_details = ");
            separated.push_bind_unseparated(scope_details);
        }
        if let Some(impact_scope_id) = data.impact_scope_id {
            separated.push("impact_scope_id = ");
            separated.push_bind_unseparated(impact_scope_id);
        }
        if let Some(ref impact_scope_details) = data.impact_scope_details {
            separated.push("impact_scope_details = ");
            separated.push_bind_unseparated(impact_scope_details);
        }
        if let Some(impact_range_id) = data.impact_range_id {
            separated.push("impact_range_id = ");
            separated.push_bind_unseparated(impact_range_id);
        }
        if let Some(event_start_date) = data.event_start_date {
            separated.push("event_start_date = ");
            separated.push_bind_unseparated(event_start_date);
        }
        if let Some(event_end_date) = data.event_end_date {
            separated.push("event_end_date = ");
            separated.push_bind_unseparated(event_end_date);
        }
        if let Some(action_unit_id) = data.action_unit_id {
            separated.push("action_unit_id = ");
            separated.push_bind_unseparated(action_unit_id);
        }
        if let Some(status_id) = data.status_id {
            separated.push("status_id = ");
            separated.push_bind_unseparated(status_id);
        }
        if let Some(reviewed_by) = data.reviewed_by {
            separated.push("reviewed_by = ");
            separated.push_bind_unseparated(reviewed_by);
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(Utc::now());
        separated.push("updated_by = ");
        separated.push_bind_unseparated(actor);

        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);

        query_builder.build().execute(&self.connection_pool).await?;
        info!("Event updated");

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for EventRepository {
    #[instrument(skip(self), fields(event_id = %id))]
    async fn delete(&self, id: &i32, actor: i32) -> Result<(), Error> {
        soft_delete(&self.connection_pool, "events", *id, actor).await?;
        info!("Event deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_event(title: &str) -> CreateEventDTO {
        CreateEventDTO {
            title: title.to_string(),
            description: None,
            event_source_id: 1,
            event_subject_id: 1,
            urgency_id: 1,
            scope_id: 1,
            scope_details: None,
            impact_scope_id: 1,
            impact_scope_details: None,
            impact_range_id: 1,
            event_start_date: Utc::now(),
            event_end_date: None,
            action_unit_id: 3,
            status_id: None,
            reviewed_by: None,
        }
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_find_all_hides_deleted_and_is_newest_first(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = EventRepository::new(pool);

        let ids: Vec<i32> = repo.find_all().await?.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(repo.read(&3).await?.is_none());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_filters_and_search(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = EventRepository::new(pool);

        assert_eq!(repo.find_by_unit(&2).await?.len(), 1);
        assert_eq!(repo.find_by_status(&2).await?[0].id, 2);

        let found = repo.search("heating").await?;
        assert_eq!(found.len(), 1);
        // description matches too
        assert_eq!(repo.search("building b").await?[0].id, 1);
        // deleted rows never show up in search
        assert!(repo.search("Duplicate").await?.is_empty());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "organization_units")))]
    async fn test_create_defaults_status_and_registrar(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = EventRepository::new(pool);

        let event = repo.create(&new_event("Power outage"), 3).await?;
        assert_eq!(event.status_id, EVENT_STATUS_REGISTERED);
        assert_eq!(event.registered_by, 3);
        assert_eq!(event.created_by, Some(3));
        assert!(!event.is_deleted);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_update_status(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = EventRepository::new(pool);

        let event = repo.update_status(&1, 2, 2).await?;
        assert_eq!(event.status_id, 2);
        assert_eq!(event.updated_by, Some(2));

        assert!(matches!(repo.update_status(&3, 2, 2).await, Err(Error::RowNotFound)));
        Ok(())
    }
}
