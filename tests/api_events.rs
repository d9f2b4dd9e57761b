//! Integration tests per gli eventi

mod common;

#[cfg(test)]
mod event_tests {
    use super::common::*;
    use axum_test::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::SqlitePool;

    fn new_event(title: &str, unit_id: i32) -> Value {
        json!({
            "title": title,
            "description": "Roof collapsed after the storm",
            "event_source_id": 1,
            "event_subject_id": 1,
            "urgency_id": 1,
            "scope_id": 1,
            "impact_scope_id": 1,
            "impact_range_id": 1,
            "event_start_date": "2025-03-01T08:00:00Z",
            "action_unit_id": unit_id,
        })
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_list_events_newest_first(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let response = server
            .get("/api/events")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await;

        response.assert_status_ok();
        let events: Vec<Value> = response.json();
        let ids: Vec<i64> = events.iter().filter_map(|e| e["id"].as_i64()).collect();
        assert_eq!(ids, vec![2, 1]);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_deleted_event_is_hidden(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        server
            .get("/api/events/3")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await
            .assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_event_details(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let response = server
            .get("/api/events/1/details")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await;

        response.assert_status_ok();
        let details: Value = response.json();
        assert_eq!(details["title"], "Flooded classroom");
        assert_eq!(details["tasks"].as_array().map(Vec::len), Some(2));
        assert_eq!(details["documents"].as_array().map(Vec::len), Some(1));
        assert_eq!(details["comments"].as_array().map(Vec::len), Some(2));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_filters_and_search(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let by_unit: Vec<Value> = server
            .get("/api/events/by-unit/3")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await
            .json();
        assert_eq!(by_unit.len(), 1);
        assert_eq!(by_unit[0]["id"], 2);

        let by_status: Vec<Value> = server
            .get("/api/events/by-status/1")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await
            .json();
        assert_eq!(by_status.len(), 1);
        assert_eq!(by_status[0]["id"], 1);

        // la ricerca guarda anche la descrizione
        let found: Vec<Value> = server
            .get("/api/events/search")
            .add_query_param("term", "heating system")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await
            .json();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["id"], 2);

        // i caratteri jolly di LIKE vengono cercati alla lettera
        for wildcard in ["%", "_"] {
            let found: Vec<Value> = server
                .get("/api/events/search")
                .add_query_param("term", wildcard)
                .add_header(authorization(), bearer(VIEWER_ID))
                .await
                .json();
            assert!(found.is_empty(), "term {:?} matched {:?}", wildcard, found);
        }

        server
            .get("/api/events/search")
            .add_query_param("term", "")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await
            .assert_status_bad_request();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_create_event(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let response = server
            .post("/api/events")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .json(&new_event("Collapsed roof", 2))
            .await;

        response.assert_status_ok();
        let event: Value = response.json();
        assert_eq!(event["registered_by"], OPERATOR_ID);
        assert_eq!(event["status_id"], 1);
        assert!(event["event_end_date"].is_null());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_create_event_rules(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        server
            .post("/api/events")
            .add_header(authorization(), bearer(VIEWER_ID))
            .json(&new_event("Viewer report", 2))
            .await
            .assert_status_forbidden();

        server
            .post("/api/events")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .json(&new_event("Nowhere", 404))
            .await
            .assert_status_not_found();

        let mut backwards = new_event("Backwards", 2);
        backwards["event_end_date"] = json!("2025-02-01T08:00:00Z");
        server
            .post("/api/events")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .json(&backwards)
            .await
            .assert_status_bad_request();

        let mut bad_details = new_event("Bad details", 2);
        bad_details["scope_details"] = json!("rooms 1 and 2");
        server
            .post("/api/events")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .json(&bad_details)
            .await
            .assert_status_bad_request();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_update_event_checks_dates_against_stored_row(
        pool: SqlitePool,
    ) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        // l'evento 2 inizia il 3 febbraio
        server
            .put("/api/events/2")
            .add_header(authorization(), bearer(MANAGER_ID))
            .json(&json!({ "event_end_date": "2025-02-02T00:00:00Z" }))
            .await
            .assert_status_bad_request();

        let response = server
            .put("/api/events/2")
            .add_header(authorization(), bearer(MANAGER_ID))
            .json(&json!({ "title": "Boiler failure", "event_end_date": "2025-02-05T00:00:00Z" }))
            .await;
        response.assert_status_ok();
        let event: Value = response.json();
        assert_eq!(event["title"], "Boiler failure");
        assert!(event["updated_at"].is_string());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_update_event_clears_nullable_fields(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let response = server
            .put("/api/events/2")
            .add_header(authorization(), bearer(MANAGER_ID))
            .json(&json!({ "description": null, "event_end_date": null, "scope_details": null }))
            .await;
        response.assert_status_ok();
        let event: Value = response.json();
        assert!(event["description"].is_null());
        assert!(event["event_end_date"].is_null());
        assert!(event["scope_details"].is_null());
        assert_eq!(event["title"], "Broken heating");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_update_missing_event(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        server
            .put("/api/events/3")
            .add_header(authorization(), bearer(MANAGER_ID))
            .json(&json!({ "title": "Revived" }))
            .await
            .assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_update_event_status(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        let response = server
            .patch("/api/events/1/status")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .json(&json!({ "status_id": 2 }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status_id"], 2);

        server
            .patch("/api/events/1/status")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .json(&json!({ "status_id": 0 }))
            .await
            .assert_status_bad_request();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "organization_units", "events")))]
    async fn test_delete_event(pool: SqlitePool) -> sqlx::Result<()> {
        let (_state, server) = setup(pool);

        server
            .delete("/api/events/1")
            .add_header(authorization(), bearer(OPERATOR_ID))
            .await
            .assert_status_forbidden();

        server
            .delete("/api/events/1")
            .add_header(authorization(), bearer(MANAGER_ID))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let events: Vec<Value> = server
            .get("/api/events")
            .add_header(authorization(), bearer(VIEWER_ID))
            .await
            .json();
        assert_eq!(events.len(), 1);
        Ok(())
    }
}
