//! Events management server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;

// Re-export dei tipi principali per facilitare l'import
pub use core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;

/// Margine concesso ai campi multipart oltre al file vero e proprio
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .nest("/auth", configure_auth_routes(state.clone()))
        .nest("/users", configure_user_routes(state.clone()))
        .nest("/provinces", configure_province_routes(state.clone()))
        .nest("/regions", configure_region_routes(state.clone()))
        .nest("/schools", configure_school_routes(state.clone()))
        .nest(
            "/organization-units",
            configure_organization_unit_routes(state.clone()),
        )
        .nest("/dynamic-tables", configure_dynamic_table_routes(state.clone()))
        .nest("/events", configure_event_routes(state.clone()))
        .nest("/tasks", configure_task_routes(state.clone()))
        .nest("/task-replies", configure_task_reply_routes(state.clone()))
        .nest("/comments", configure_comment_routes(state.clone()))
        .nest("/files", configure_file_routes(state.clone()))
        .nest("/dashboard", configure_dashboard_routes(state.clone()));

    Router::new()
        .route("/", get(root))
        .nest("/api", api)
        .with_state(state)
}

/// Wraps a group of routes with the JWT authentication middleware
fn authenticated(
    routes: Router<Arc<AppState>>,
    state: Arc<AppState>,
) -> Router<Arc<AppState>> {
    routes.layer(middleware::from_fn_with_state(
        state,
        core::authentication_middleware,
    ))
}

/// Configura le routes di autenticazione: login e refresh sono pubbliche
fn configure_auth_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use services::auth::*;

    let public_routes = Router::new()
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token));

    let session_routes = Router::new()
        .route("/logout", post(logout))
        .route("/change-password", post(change_password))
        .route("/me", get(me));

    public_routes.merge(authenticated(session_routes, state))
}

/// Configura le routes per la gestione degli utenti (solo Admin)
fn configure_user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use services::user::*;

    authenticated(
        Router::new()
            .route("/", get(list_users).post(create_user))
            .route("/{user_id}", get(get_user).put(update_user))
            .route("/{user_id}/reset-password", post(reset_password))
            .route("/{user_id}/activity-logs", get(list_user_activity)),
        state,
    )
}

fn configure_province_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use services::province::*;

    // l'elenco delle province è consultabile senza login
    let public_routes = Router::new().route("/", get(list_provinces));

    let protected_routes = Router::new()
        .route("/", post(create_province))
        .route(
            "/{province_id}",
            get(get_province)
                .put(update_province)
                .delete(delete_province),
        );

    public_routes.merge(authenticated(protected_routes, state))
}

fn configure_region_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use services::region::*;

    let public_routes = Router::new()
        .route("/", get(list_regions))
        .route("/by-province/{province_id}", get(list_regions_by_province));

    let protected_routes = Router::new()
        .route("/", post(create_region))
        .route(
            "/{region_id}",
            get(get_region).put(update_region).delete(delete_region),
        );

    public_routes.merge(authenticated(protected_routes, state))
}

fn configure_school_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use services::school::*;

    authenticated(
        Router::new()
            .route("/", get(list_schools).post(create_school))
            .route("/search", get(search_schools))
            .route("/by-region/{region_id}", get(list_schools_by_region))
            .route("/by-province/{province_id}", get(list_schools_by_province))
            .route(
                "/{school_id}",
                get(get_school).put(update_school).delete(delete_school),
            ),
        state,
    )
}

fn configure_organization_unit_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use services::organization_unit::*;

    authenticated(
        Router::new()
            .route("/", get(list_units).post(create_unit))
            .route("/hierarchy", get(get_hierarchy))
            .route("/children/{parent_id}", get(list_children))
            .route(
                "/{unit_id}",
                get(get_unit).put(update_unit).delete(delete_unit),
            )
            .route("/{unit_id}/toggle", patch(toggle_unit)),
        state,
    )
}

fn configure_dynamic_table_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use services::dynamic_table::*;

    authenticated(
        Router::new()
            .route("/", get(list_rows).post(create_row))
            .route("/table-names", get(list_table_names))
            .route("/by-table/{table_name}", get(list_by_table))
            .route("/{row_id}", get(get_row).put(update_row).delete(delete_row))
            .route("/{row_id}/children", get(list_children))
            .route("/{row_id}/toggle", patch(toggle_row)),
        state,
    )
}

fn configure_event_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use services::event::*;

    authenticated(
        Router::new()
            .route("/", get(list_events).post(create_event))
            .route("/search", get(search_events))
            .route("/by-unit/{unit_id}", get(list_events_by_unit))
            .route("/by-status/{status_id}", get(list_events_by_status))
            .route(
                "/{event_id}",
                get(get_event).put(update_event).delete(delete_event),
            )
            .route("/{event_id}/details", get(get_event_details))
            .route("/{event_id}/status", patch(update_event_status)),
        state,
    )
}

fn configure_task_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use services::task::*;

    authenticated(
        Router::new()
            .route("/", get(list_tasks).post(create_task))
            .route("/search", get(search_tasks))
            .route("/by-event/{event_id}", get(list_tasks_by_event))
            .route("/by-unit/{unit_id}", get(list_tasks_by_unit))
            .route("/by-status/{status_id}", get(list_tasks_by_status))
            .route(
                "/{task_id}",
                get(get_task).put(update_task).delete(delete_task),
            )
            .route("/{task_id}/details", get(get_task_details))
            .route("/{task_id}/progress", patch(update_task_progress))
            .route("/{task_id}/status", patch(update_task_status)),
        state,
    )
}

fn configure_task_reply_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use services::task_reply::*;

    authenticated(
        Router::new()
            .route("/", post(create_reply))
            .route("/by-task/{task_id}", get(list_replies_by_task))
            .route(
                "/{reply_id}",
                get(get_reply).put(update_reply).delete(delete_reply),
            ),
        state,
    )
}

fn configure_comment_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use services::comment::*;

    authenticated(
        Router::new()
            .route("/", post(create_comment))
            .route("/by-event/{event_id}", get(list_comments_by_event))
            .route("/by-task/{task_id}", get(list_comments_by_task))
            .route(
                "/{comment_id}",
                get(get_comment).put(update_comment).delete(delete_comment),
            ),
        state,
    )
}

fn configure_file_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use services::file::*;

    let body_limit = usize::try_from(state.storage.max_file_size())
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    authenticated(
        Router::new()
            .route(
                "/upload",
                post(upload_file).layer(DefaultBodyLimit::max(body_limit)),
            )
            .route("/by-event/{event_id}", get(list_files_by_event))
            .route("/by-task/{task_id}", get(list_files_by_task))
            .route("/download/{document_id}", get(download_file))
            .route("/{document_id}", delete(delete_file)),
        state,
    )
}

fn configure_dashboard_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use services::dashboard::*;

    authenticated(
        Router::new()
            .route("/stats", get(get_stats))
            .route("/activity-logs", get(list_activity_logs)),
        state,
    )
}
