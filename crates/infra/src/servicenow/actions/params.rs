//! Parameter shapes for each action
//!
//! Every struct defaults missing fields, so an absent required value is
//! reported by the client's validation as `MISSING_PARAMETER` rather than by
//! serde. Unrecognised keys are refused outright and surface as
//! `INVALID_PARAMETER`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use snowgate_domain::{
    ChangeUpdate, CreateChangeRequest, CreateIncidentRequest, CreateKbArticleRequest,
    CreateProblemRequest, IncidentUpdate, KbArticleUpdate, ProblemUpdate,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateIncidentParams {
    pub incident: CreateIncidentRequest,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateIncidentParams {
    pub sys_id: String,
    pub incident: IncidentUpdate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveIncidentParams {
    pub sys_id: String,
    pub resolution_notes: Option<String>,
    pub close_code: Option<String>,
}

/// Lookup by `number`, or by `sys_id` when no number is given
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordLookupParams {
    pub sys_id: Option<String>,
    pub number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchIncidentsParams {
    pub query: String,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssignIncidentParams {
    pub sys_id: String,
    pub assigned_to: Option<String>,
    pub assignment_group: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommentParams {
    pub sys_id: String,
    pub comment: String,
}

/// Generic ticket parameters
///
/// `table` defaults to `incident`, the only table ticket actions support.
/// `ticket` is decoded as an incident payload once the table is accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TicketParams {
    pub table: Option<String>,
    pub sys_id: Option<String>,
    pub number: Option<String>,
    pub ticket: Option<Value>,
    pub close_notes: Option<String>,
    pub work_notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateChangeParams {
    pub change: CreateChangeRequest,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateChangeParams {
    pub sys_id: String,
    pub change: ChangeUpdate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssessChangeRiskParams {
    pub sys_id: String,
    pub risk_impact_analysis: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApproveChangeParams {
    pub sys_id: String,
    pub approver_notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleChangeParams {
    pub sys_id: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateProblemParams {
    pub problem: CreateProblemRequest,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkIncidentsParams {
    /// Problem sys_id
    pub sys_id: String,
    pub incident_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateProblemParams {
    pub sys_id: String,
    pub problem: ProblemUpdate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveProblemParams {
    pub sys_id: String,
    pub root_cause: String,
    pub workaround: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchKnowledgeParams {
    pub search_query: String,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateKbArticleParams {
    pub article: CreateKbArticleRequest,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateKbArticleParams {
    pub sys_id: String,
    pub article: KbArticleUpdate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserLookupParams {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GroupLookupParams {
    pub group_id: Option<String>,
    pub group_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssignToGroupParams {
    pub task_sys_id: String,
    pub group_id: String,
    pub table: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IncidentMetricsParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlaStatusParams {
    pub task_sys_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateReportParams {
    pub report_type: String,
    pub filters: Option<Value>,
}
