//! DocumentRepository - Repository per i metadati dei documenti caricati

use super::{Read, soft_delete};
use crate::dtos::CreateDocumentDTO;
use crate::entities::DocumentMetadata;
use chrono::Utc;
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument};

pub struct DocumentRepository {
    connection_pool: SqlitePool,
}

impl DocumentRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Registers an already stored file; `uploaded_by` is also the creator.
    #[instrument(skip(self, data), fields(file_name = %data.file_name))]
    pub async fn create(
        &self,
        data: &CreateDocumentDTO,
        uploaded_by: i32,
    ) -> Result<DocumentMetadata, Error> {
        debug!("Saving document metadata");
        let result = sqlx::query(
            r#"
            INSERT INTO document_metadata
                (file_name, file_type, file_size, file_path, event_id, task_id, task_reply_id,
                 uploaded_by, description, is_public, created_at, created_by)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.file_name)
        .bind(&data.file_type)
        .bind(data.file_size)
        .bind(&data.file_path)
        .bind(data.event_id)
        .bind(data.task_id)
        .bind(data.task_reply_id)
        .bind(uploaded_by)
        .bind(&data.description)
        .bind(data.is_public)
        .bind(Utc::now())
        .bind(uploaded_by)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid() as i32;
        info!("Document metadata created with id {}", new_id);

        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }

    #[instrument(skip(self))]
    pub async fn find_by_event(&self, event_id: &i32) -> Result<Vec<DocumentMetadata>, Error> {
        sqlx::query_as::<_, DocumentMetadata>(
            "SELECT * FROM document_metadata WHERE event_id = ? AND is_deleted = 0 ORDER BY created_at DESC, id DESC",
        )
        .bind(event_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn find_by_task(&self, task_id: &i32) -> Result<Vec<DocumentMetadata>, Error> {
        sqlx::query_as::<_, DocumentMetadata>(
            "SELECT * FROM document_metadata WHERE task_id = ? AND is_deleted = 0 ORDER BY created_at DESC, id DESC",
        )
        .bind(task_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &i32, actor: i32) -> Result<(), Error> {
        soft_delete(&self.connection_pool, "document_metadata", *id, actor).await?;
        info!("Document metadata deleted");
        Ok(())
    }
}

impl Read<DocumentMetadata, i32> for DocumentRepository {
    #[instrument(skip(self), fields(document_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<DocumentMetadata>, Error> {
        sqlx::query_as::<_, DocumentMetadata>(
            "SELECT * FROM document_metadata WHERE id = ? AND is_deleted = 0",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_find_by_parent(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = DocumentRepository::new(pool);

        let docs = repo.find_by_event(&1).await?;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].file_path, "2025-02/seeded-photo.jpg");

        let docs = repo.find_by_task(&3).await?;
        assert_eq!(docs.len(), 1);
        assert!(docs[0].is_public);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_create_and_delete(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = DocumentRepository::new(pool);

        let doc = repo
            .create(
                &CreateDocumentDTO {
                    file_name: "report.pdf".to_string(),
                    file_type: ".pdf".to_string(),
                    file_size: 512,
                    file_path: "2025-03/abc.pdf".to_string(),
                    event_id: Some(2),
                    task_id: None,
                    task_reply_id: None,
                    description: Some("Inspection report".to_string()),
                    is_public: false,
                },
                3,
            )
            .await?;

        assert_eq!(doc.uploaded_by, 3);
        assert_eq!(repo.find_by_event(&2).await?.len(), 1);

        repo.delete(&doc.id, 2).await?;
        assert!(repo.read(&doc.id).await?.is_none());
        Ok(())
    }
}
