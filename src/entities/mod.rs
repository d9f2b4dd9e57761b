//! Entities module - Entità del dominio applicativo
//!
//! Questo modulo contiene tutte le entità (models) che rappresentano i dati persistiti nel database.
//! Ogni entity corrisponde a una tabella nel database.

pub mod activity_log;
pub mod comment;
pub mod document;
pub mod dynamic_table;
pub mod enums;
pub mod event;
pub mod organization_unit;
pub mod province;
pub mod region;
pub mod school;
pub mod task;
pub mod task_reply;
pub mod user;

// Re-exports per facilitare l'import
pub use activity_log::UserActivityLog;
pub use comment::Comment;
pub use document::DocumentMetadata;
pub use dynamic_table::DynamicTable;
pub use enums::{ProgressCalculationMethod, Role, UnitType};
pub use event::{EVENT_STATUS_REGISTERED, Event};
pub use organization_unit::OrganizationUnit;
pub use province::Province;
pub use region::Region;
pub use school::School;
pub use task::{EventTask, TASK_STATUS_COMPLETED, TASK_STATUS_NEW};
pub use task_reply::TaskReply;
pub use user::User;
