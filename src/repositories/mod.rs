//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Questo modulo organizza i repository in sotto-moduli separati per una migliore manutenibilità.
//! Ogni repository gestisce le operazioni di database per una specifica entità.
//!
//! Le query sono scritte con `sqlx::query_as::<_, T>` e `#[derive(sqlx::FromRow)]` sulle entity:
//! il controllo avviene a runtime, quindi il crate compila anche senza un database raggiungibile.
//! Tutte le letture escludono le righe con `is_deleted = 1`.

pub mod activity_log;
pub mod comment;
pub mod dashboard;
pub mod document;
pub mod dynamic_table;
pub mod event;
pub mod organization_unit;
pub mod province;
pub mod region;
pub mod school;
pub mod task;
pub mod task_reply;
pub mod traits;
pub mod user;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{Create, Delete, Read, Update};

// Re-esportazione delle struct dei repository per facilitare l'import
pub use activity_log::ActivityLogRepository;
pub use comment::CommentRepository;
pub use dashboard::DashboardRepository;
pub use document::DocumentRepository;
pub use dynamic_table::DynamicTableRepository;
pub use event::EventRepository;
pub use organization_unit::OrganizationUnitRepository;
pub use province::ProvinceRepository;
pub use region::RegionRepository;
pub use school::SchoolRepository;
pub use task::TaskRepository;
pub use task_reply::TaskReplyRepository;
pub use user::UserRepository;

use chrono::Utc;
use sqlx::SqlitePool;

/// Soft delete condiviso: marca la riga come cancellata e registra chi l'ha fatto.
/// `table` è sempre una costante interna, mai input del client.
pub(crate) async fn soft_delete(
    pool: &SqlitePool,
    table: &'static str,
    id: i32,
    actor: i32,
) -> Result<(), sqlx::Error> {
    let sql = format!(
        "UPDATE {} SET is_deleted = 1, updated_at = ?, updated_by = ? WHERE id = ? AND is_deleted = 0",
        table
    );
    let result = sqlx::query(&sql)
        .bind(Utc::now())
        .bind(actor)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(sqlx::Error::RowNotFound);
    }
    Ok(())
}

/// Pattern `%term%` per le ricerche con LIKE (case-insensitive per ASCII in SQLite)
///
/// `%`, `_` e `\` nel termine sono letterali; le query usano `ESCAPE '\'`.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
