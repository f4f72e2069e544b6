//! Table records and request payloads

pub mod change;
pub mod common;
pub mod credentials;
pub mod incident;
pub mod knowledge;
pub mod problem;
pub mod sla;
pub mod user;

pub use change::{ChangeRequest, ChangeState, ChangeType, ChangeUpdate, CreateChangeRequest};
pub use common::{lenient, ListResponse, RecordRef, SingleResponse};
pub use credentials::{AuthType, Credentials};
pub use incident::{CreateIncidentRequest, Incident, IncidentUpdate};
pub use knowledge::{CreateKbArticleRequest, KbArticleUpdate, KbWorkflowState, KnowledgeArticle};
pub use problem::{CreateProblemRequest, Problem, ProblemUpdate};
pub use sla::{IncidentMetrics, Sla};
pub use user::{Group, User};
