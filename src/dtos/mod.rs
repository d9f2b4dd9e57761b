//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati per la comunicazione client-server.
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).

pub mod activity_log;
pub mod auth;
pub mod comment;
pub mod dashboard;
pub mod document;
pub mod dynamic_table;
pub mod event;
pub mod nullable;
pub mod organization_unit;
pub mod province;
pub mod query;
pub mod region;
pub mod school;
pub mod task;
pub mod task_reply;
pub mod user;
pub mod validation;

pub use activity_log::{ActivityLogDTO, CreateActivityLogDTO};
pub use auth::{ChangePasswordDTO, LoginDTO, LoginResponseDTO, RefreshTokenDTO};
pub use comment::{CommentDTO, CreateCommentDTO, UpdateCommentDTO};
pub use dashboard::{DashboardStatsDTO, RecentEventDTO, StatusCountDTO};
pub use document::{CreateDocumentDTO, DocumentDTO};
pub use dynamic_table::{ByTableQuery, CreateDynamicTableDTO, DynamicTableDTO, UpdateDynamicTableDTO};
pub use event::{CreateEventDTO, EventDTO, EventDetailsDTO, UpdateEventDTO, UpdateStatusDTO};
pub use organization_unit::{
    CreateOrganizationUnitDTO, OrganizationUnitDTO, OrganizationUnitNodeDTO,
    OrganizationUnitQuery, UpdateOrganizationUnitDTO,
};
pub use province::{CreateProvinceDTO, ProvinceDTO, UpdateProvinceDTO};
pub use query::{PaginationQuery, SearchQuery, UserListQuery};
pub use region::{CreateRegionDTO, RegionDTO, UpdateRegionDTO};
pub use school::{CreateSchoolDTO, SchoolDTO, UpdateSchoolDTO};
pub use task::{CreateTaskDTO, TaskDTO, TaskDetailsDTO, UpdateProgressDTO, UpdateTaskDTO};
pub use task_reply::{CreateTaskReplyDTO, TaskReplyDTO, UpdateTaskReplyDTO};
pub use user::{CreateUserDTO, ResetPasswordDTO, UpdateUserDTO, UserDTO, parse_roles};
