//! Application State - Stato globale dell'applicazione
//!
//! Contiene tutti i repository, configurazioni e stato condiviso
//! necessario per gestire l'applicazione.

use crate::core::config::{AuthSettings, StorageSettings};
use crate::core::storage::FileStorage;
use crate::core::tokens::RefreshTokenStore;
use crate::repositories::{
    ActivityLogRepository, CommentRepository, DashboardRepository, DocumentRepository,
    DynamicTableRepository, EventRepository, OrganizationUnitRepository, ProvinceRepository,
    RegionRepository, SchoolRepository, TaskReplyRepository, TaskRepository, UserRepository,
};
use chrono::Duration;
use sqlx::SqlitePool;

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    /// Utenti e ruoli
    pub user: UserRepository,
    pub activity_log: ActivityLogRepository,

    /// Gerarchia di riferimento
    pub province: ProvinceRepository,
    pub region: RegionRepository,
    pub school: SchoolRepository,
    pub organization_unit: OrganizationUnitRepository,
    pub dynamic_table: DynamicTableRepository,

    /// Eventi e tutto ciò che vi è collegato
    pub event: EventRepository,
    pub task: TaskRepository,
    pub task_reply: TaskReplyRepository,
    pub comment: CommentRepository,
    pub document: DocumentRepository,
    pub dashboard: DashboardRepository,

    /// Impostazioni JWT
    pub auth: AuthSettings,

    /// Refresh token emessi e non ancora usati
    pub refresh_tokens: RefreshTokenStore,

    /// Storage dei file caricati
    pub storage: FileStorage,
}

impl AppState {
    /// Crea una nuova istanza di AppState inizializzando tutti i repository
    /// con il pool di connessioni fornito.
    ///
    /// # Arguments
    /// * `pool` - Pool di connessioni SQLite condiviso
    /// * `auth` - Impostazioni per firma e durata dei token
    /// * `storage` - Directory e limiti per gli upload
    pub fn new(pool: SqlitePool, auth: AuthSettings, storage: StorageSettings) -> Self {
        let refresh_tokens = RefreshTokenStore::new(Duration::days(auth.refresh_token_days));
        Self {
            user: UserRepository::new(pool.clone()),
            activity_log: ActivityLogRepository::new(pool.clone()),
            province: ProvinceRepository::new(pool.clone()),
            region: RegionRepository::new(pool.clone()),
            school: SchoolRepository::new(pool.clone()),
            organization_unit: OrganizationUnitRepository::new(pool.clone()),
            dynamic_table: DynamicTableRepository::new(pool.clone()),
            event: EventRepository::new(pool.clone()),
            task: TaskRepository::new(pool.clone()),
            task_reply: TaskReplyRepository::new(pool.clone()),
            comment: CommentRepository::new(pool.clone()),
            document: DocumentRepository::new(pool.clone()),
            dashboard: DashboardRepository::new(pool),
            auth,
            refresh_tokens,
            storage: FileStorage::new(&storage),
        }
    }
}
