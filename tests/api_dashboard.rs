//! Integration tests per la dashboard

mod common;

#[cfg(test)]
mod dashboard_tests {
    use super::common::*;
    use serde_json::{Value, json};
    use sqlx::SqlitePool;

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_stats(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let response = server
            .get("/api/dashboard/stats")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await;

        response.assert_status_ok();
        let stats: Value = response.json();
        assert_eq!(stats["total_events"], 2);
        assert_eq!(stats["total_tasks"], 3);
        assert_eq!(stats["total_users"], 5);
        assert_eq!(
            stats["events_by_status"],
            json!([
                { "status_id": 1, "count": 1 },
                { "status_id": 2, "count": 1 },
            ])
        );
        let average = stats["average_progress"].as_f64().expect("average");
        assert!((average - 80.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats["recent_events"][0]["id"], 2);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_stats_on_empty_database(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let stats: Value = server
            .get("/api/dashboard/stats")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await
            .json();

        assert_eq!(stats["total_events"], 0);
        assert_eq!(stats["average_progress"], 0.0);
        assert_eq!(stats["recent_events"], json!([]));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_activity_logs_paginated(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        for _ in 0..3 {
            server
                .post("/api/auth/login")
                .json(&json!({ "username": "viewer@example.com", "password": "wrong" }))
                .await
                .assert_status_unauthorized();
        }

        let page: Vec<Value> = server
            .get("/api/dashboard/activity-logs")
            .add_query_param("page_number", 1)
            .add_query_param("page_size", 2)
            .add_header(authorization(), bearer(MANAGER_ID))
            .await
            .json();
        assert_eq!(page.len(), 2);
        assert!(page.iter().all(|log| log["is_successful"] == false));

        let rest: Vec<Value> = server
            .get("/api/dashboard/activity-logs")
            .add_query_param("page_number", 2)
            .add_query_param("page_size", 2)
            .add_header(authorization(), bearer(MANAGER_ID))
            .await
            .json();
        assert_eq!(rest.len(), 1);

        let beyond: Vec<Value> = server
            .get("/api/dashboard/activity-logs")
            .add_query_param("page_number", i64::MAX)
            .add_header(authorization(), bearer(MANAGER_ID))
            .await
            .json();
        assert!(beyond.is_empty());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_dashboard_requires_token(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        server
            .get("/api/dashboard/stats")
            .await
            .assert_status_unauthorized();
        Ok(())
    }
}
