//! Integration tests per i commenti

mod common;

#[cfg(test)]
mod comment_tests {
    use super::common::*;
    use axum_test::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::SqlitePool;

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_comments_by_event_and_task(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let on_event: Vec<Value> = server
            .get("/api/comments/by-event/1")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await
            .json();
        let ids: Vec<i64> = on_event.iter().filter_map(|c| c["id"].as_i64()).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(on_event[0]["parent_comment_id"], 1);

        let on_task: Vec<Value> = server
            .get("/api/comments/by-task/1")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await
            .json();
        assert_eq!(on_task.len(), 1);
        assert_eq!(on_task[0]["content"], "Need a second pump");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_viewer_can_comment(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let response = server
            .post("/api/comments")
            .add_header(authorization(), bearer(VIEWER_ID))
            .json(&json!({ "event_id": 2, "content": "Still cold in room 2" }))
            .await;

        response.assert_status_ok();
        let comment: Value = response.json();
        assert_eq!(comment["commented_by"], VIEWER_ID);
        assert!(comment["task_id"].is_null());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_comment_needs_exactly_one_target(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        server
            .post("/api/comments")
            .add_header(authorization(), bearer(VIEWER_ID))
            .json(&json!({ "event_id": 1, "task_id": 1, "content": "Both" }))
            .await
            .assert_status_bad_request();

        server
            .post("/api/comments")
            .add_header(authorization(), bearer(VIEWER_ID))
            .json(&json!({ "content": "Neither" }))
            .await
            .assert_status_bad_request();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_comment_missing_references(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        server
            .post("/api/comments")
            .add_header(authorization(), bearer(VIEWER_ID))
            .json(&json!({ "task_id": 50, "content": "Lost" }))
            .await
            .assert_status_not_found();

        server
            .post("/api/comments")
            .add_header(authorization(), bearer(VIEWER_ID))
            .json(&json!({ "event_id": 1, "content": "Reply", "parent_comment_id": 50 }))
            .await
            .assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_only_author_updates_comment(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        server
            .put("/api/comments/1")
            .add_header(authorization(), bearer(MANAGER_ID))
            .json(&json!({ "content": "Edited by someone else" }))
            .await
            .assert_status_forbidden();

        let response = server
            .put("/api/comments/1")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .json(&json!({ "content": "Classes moved to the main hall" }))
            .await;
        response.assert_status_ok();
        let comment: Value = response.json();
        assert_eq!(comment["content"], "Classes moved to the main hall");
        assert!(comment["updated_at"].is_string());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_admin_may_delete_any_comment(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        server
            .delete("/api/comments/3")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await
            .assert_status_forbidden();

        server
            .delete("/api/comments/3")
            .add_header(authorization(), bearer(ADMIN_ID))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .get("/api/comments/3")
            .add_header(authorization(), bearer(ADMIN_ID))
            .await
            .assert_status_not_found();
        Ok(())
    }
}
