//! Integration tests per attività e risposte alle attività

mod common;

#[cfg(test)]
mod task_tests {
    use super::common::*;
    use axum_test::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::SqlitePool;

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_tasks_by_event_in_creation_order(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let tasks: Vec<Value> = server
            .get("/api/tasks/by-event/1")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await
            .json();

        let ids: Vec<i64> = tasks.iter().filter_map(|t| t["id"].as_i64()).collect();
        assert_eq!(ids, vec![1, 2]);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_task_filters_and_search(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let by_unit: Vec<Value> = server
            .get("/api/tasks/by-unit/3")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await
            .json();
        assert_eq!(by_unit.len(), 2);

        let by_status: Vec<Value> = server
            .get("/api/tasks/by-status/1")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await
            .json();
        assert_eq!(by_status.len(), 1);
        assert_eq!(by_status[0]["id"], 2);

        let found: Vec<Value> = server
            .get("/api/tasks/search")
            .add_query_param("term", "contractor")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await
            .json();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["id"], 3);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_task_details(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let response = server
            .get("/api/tasks/1/details")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await;

        response.assert_status_ok();
        let details: Value = response.json();
        assert_eq!(details["title"], "Pump out water");
        assert_eq!(details["replies"].as_array().map(Vec::len), Some(2));
        assert_eq!(details["documents"], json!([]));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_create_task(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let response = server
            .post("/api/tasks")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .json(&json!({
                "title": "Inspect wiring",
                "event_id": 2,
                "assigned_to_unit_id": 3,
                "action_type_id": 1,
                "cooperating_units_ids": "[1, 2]",
            }))
            .await;

        response.assert_status_ok();
        let task: Value = response.json();
        assert_eq!(task["progress_percentage"], 0);
        assert_eq!(task["progress_calculation_method"], "Manual");
        assert_eq!(task["status_id"], 1);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_create_task_missing_references(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        // l'evento 3 è cancellato
        server
            .post("/api/tasks")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .json(&json!({
                "title": "Ghost task",
                "event_id": 3,
                "assigned_to_unit_id": 2,
                "action_type_id": 1,
            }))
            .await
            .assert_status_not_found();

        server
            .post("/api/tasks")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .json(&json!({
                "title": "No unit",
                "event_id": 1,
                "assigned_to_unit_id": 77,
                "action_type_id": 1,
            }))
            .await
            .assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_progress_to_full_completes_task(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let partial = server
            .patch("/api/tasks/1/progress")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .json(&json!({ "progress_percentage": 80 }))
            .await;
        partial.assert_status_ok();
        let task: Value = partial.json();
        assert_eq!(task["progress_percentage"], 80);
        assert_eq!(task["status_id"], 2);

        let full = server
            .patch("/api/tasks/1/progress")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .json(&json!({ "progress_percentage": 100, "calculation_method": "Automatic" }))
            .await;
        full.assert_status_ok();
        let task: Value = full.json();
        assert_eq!(task["status_id"], 4);
        assert_eq!(task["progress_calculation_method"], "Automatic");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_progress_out_of_range(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        server
            .patch("/api/tasks/1/progress")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .json(&json!({ "progress_percentage": 101 }))
            .await
            .assert_status_bad_request();

        server
            .patch("/api/tasks/99/progress")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .json(&json!({ "progress_percentage": 10 }))
            .await
            .assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_update_task_and_status(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let response = server
            .put("/api/tasks/2")
            .add_header(authorization(), bearer(MANAGER_ID))
            .json(&json!({ "title": "Assess structural damage", "assigned_to_unit_id": 3 }))
            .await;
        response.assert_status_ok();
        let task: Value = response.json();
        assert_eq!(task["title"], "Assess structural damage");
        assert_eq!(task["assigned_to_unit_id"], 3);

        let response = server
            .patch("/api/tasks/2/status")
            .add_header(authorization(), bearer(MANAGER_ID))
            .json(&json!({ "status_id": 2 }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status_id"], 2);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_update_task_clears_due_date(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let response = server
            .put("/api/tasks/3")
            .add_header(authorization(), bearer(MANAGER_ID))
            .json(&json!({ "due_date": "2025-02-10T00:00:00Z", "assigned_to_user_id": 3 }))
            .await;
        response.assert_status_ok();
        let task: Value = response.json();
        assert!(task["due_date"].is_string());
        assert_eq!(task["assigned_to_user_id"], 3);

        let response = server
            .put("/api/tasks/3")
            .add_header(authorization(), bearer(MANAGER_ID))
            .json(&json!({ "due_date": null, "description": null }))
            .await;
        response.assert_status_ok();
        let task: Value = response.json();
        assert!(task["due_date"].is_null());
        assert!(task["description"].is_null());
        assert_eq!(task["assigned_to_user_id"], 3);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_delete_task(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        server
            .delete("/api/tasks/2")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .await
            .assert_status_forbidden();

        server
            .delete("/api/tasks/2")
            .add_header(authorization(), bearer(ADMIN_ID))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .get("/api/tasks/2")
            .add_header(authorization(), bearer(ADMIN_ID))
            .await
            .assert_status_not_found();
        Ok(())
    }
}

#[cfg(test)]
mod task_reply_tests {
    use super::common::*;
    use axum_test::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::SqlitePool;

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_replies_ordered_by_action_time(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let replies: Vec<Value> = server
            .get("/api/task-replies/by-task/1")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await
            .json();

        let ids: Vec<i64> = replies.iter().filter_map(|r| r["id"].as_i64()).collect();
        assert_eq!(ids, vec![2, 1]);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_create_reply(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let response = server
            .post("/api/task-replies")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .json(&json!({
                "task_id": 2,
                "content": "Damage report sent",
                "action_date_time": "2025-02-02T09:00:00Z",
            }))
            .await;

        response.assert_status_ok();
        let reply: Value = response.json();
        assert_eq!(reply["responded_by_user_id"], OPERATOR_ID);
        assert_eq!(reply["task_id"], 2);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_create_reply_rules(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        server
            .post("/api/task-replies")
            .add_header(authorization(), bearer(VIEWER_ID))
            .json(&json!({
                "task_id": 2,
                "content": "Viewer reply",
                "action_date_time": "2025-02-02T09:00:00Z",
            }))
            .await
            .assert_status_forbidden();

        server
            .post("/api/task-replies")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .json(&json!({
                "task_id": 404,
                "content": "Nobody listens",
                "action_date_time": "2025-02-02T09:00:00Z",
            }))
            .await
            .assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_update_and_delete_reply(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let response = server
            .put("/api/task-replies/1")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .json(&json!({
                "content": "Two pumps requested",
                "action_date_time": "2025-02-01T11:00:00Z",
            }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["content"], "Two pumps requested");

        server
            .delete("/api/task-replies/1")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .await
            .assert_status_forbidden();

        server
            .delete("/api/task-replies/1")
            .add_header(authorization(), bearer(MANAGER_ID))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .get("/api/task-replies/1")
            .add_header(authorization(), bearer(MANAGER_ID))
            .await
            .assert_status_not_found();
        Ok(())
    }
}
