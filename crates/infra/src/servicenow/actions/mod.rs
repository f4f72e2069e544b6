//! Typed `{action, parameters}` surface over [`ServiceNowClient`]
//!
//! ```no_run
//! # async fn run(client: &snowgate_infra::ServiceNowClient) {
//! use snowgate_infra::servicenow::actions::handle;
//!
//! let response = handle(
//!     client,
//!     serde_json::json!({"action": "get-incident", "parameters": {"number": "INC0010001"}}),
//! )
//! .await;
//! assert!(response.success || response.error.is_some());
//! # }
//! ```

mod params;

use std::time::Instant;

pub use params::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use snowgate_core::require_present;
use snowgate_domain::constants::{
    DEFAULT_RESOLUTION_NOTES, DEFAULT_TICKET_CLOSE_NOTES, TABLE_INCIDENT,
};
use snowgate_domain::{CreateIncidentRequest, IncidentUpdate, Result, ServiceNowError};
use tracing::{error, info};

use super::client::ServiceNowClient;

/// Message attached to every successful [`ActionResponse`]
pub const SUCCESS_MESSAGE: &str = "Operation completed successfully";

/// Every action name accepted by [`ServiceNowAction::from_request`]
pub const ACTION_NAMES: [&str; 31] = [
    "create-incident",
    "update-incident",
    "resolve-incident",
    "get-incident",
    "search-incidents",
    "assign-incident",
    "add-comment",
    "create-ticket",
    "update-ticket",
    "close-ticket",
    "get-ticket-status",
    "add-work-notes",
    "create-change-request",
    "update-change-request",
    "assess-change-risk",
    "approve-change",
    "schedule-change",
    "create-problem",
    "link-incidents-to-problem",
    "update-problem",
    "resolve-problem",
    "search-knowledge",
    "create-kb-article",
    "update-kb-article",
    "get-kb-article",
    "get-user-info",
    "get-group-info",
    "assign-to-group",
    "get-incident-metrics",
    "get-sla-status",
    "generate-report",
];

/// One client operation with its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "parameters", rename_all = "kebab-case")]
pub enum ServiceNowAction {
    CreateIncident(CreateIncidentParams),
    UpdateIncident(UpdateIncidentParams),
    ResolveIncident(ResolveIncidentParams),
    GetIncident(RecordLookupParams),
    SearchIncidents(SearchIncidentsParams),
    AssignIncident(AssignIncidentParams),
    AddComment(CommentParams),

    CreateTicket(TicketParams),
    UpdateTicket(TicketParams),
    CloseTicket(TicketParams),
    GetTicketStatus(TicketParams),
    AddWorkNotes(TicketParams),

    CreateChangeRequest(CreateChangeParams),
    UpdateChangeRequest(UpdateChangeParams),
    AssessChangeRisk(AssessChangeRiskParams),
    ApproveChange(ApproveChangeParams),
    ScheduleChange(ScheduleChangeParams),

    CreateProblem(CreateProblemParams),
    LinkIncidentsToProblem(LinkIncidentsParams),
    UpdateProblem(UpdateProblemParams),
    ResolveProblem(ResolveProblemParams),

    SearchKnowledge(SearchKnowledgeParams),
    CreateKbArticle(CreateKbArticleParams),
    UpdateKbArticle(UpdateKbArticleParams),
    GetKbArticle(RecordLookupParams),

    GetUserInfo(UserLookupParams),
    GetGroupInfo(GroupLookupParams),
    AssignToGroup(AssignToGroupParams),

    GetIncidentMetrics(IncidentMetricsParams),
    GetSlaStatus(SlaStatusParams),
    GenerateReport(GenerateReportParams),
}

impl ServiceNowAction {
    /// Parse an inbound `{"action": ..., "parameters": {...}}` value.
    ///
    /// # Errors
    /// `MISSING_PARAMETER` without an action name, `UNKNOWN_ACTION` for names
    /// outside [`ACTION_NAMES`], `INVALID_PARAMETER` when the parameters do
    /// not match the action's shape.
    pub fn from_request(request: Value) -> Result<Self> {
        let Value::Object(mut object) = request else {
            return Err(ServiceNowError::invalid_parameter("Action request must be a JSON object"));
        };

        let action = match object.get("action") {
            Some(Value::String(action)) if !action.trim().is_empty() => action.clone(),
            Some(Value::String(_)) | None | Some(Value::Null) => {
                return Err(ServiceNowError::missing_parameter(&["action"]))
            }
            Some(other) => {
                return Err(ServiceNowError::invalid_parameter(format!(
                    "action must be a string, got {other}"
                )))
            }
        };

        if !ACTION_NAMES.contains(&action.as_str()) {
            return Err(ServiceNowError::unknown_action(&action));
        }

        match object.get("parameters") {
            None | Some(Value::Null) => {
                object.insert("parameters".to_string(), Value::Object(Map::new()));
            }
            Some(_) => {}
        }

        serde_json::from_value(Value::Object(object)).map_err(|err| {
            ServiceNowError::invalid_parameter(format!("Invalid parameters for {action}: {err}"))
        })
    }

    /// Wire name of this action
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateIncident(_) => "create-incident",
            Self::UpdateIncident(_) => "update-incident",
            Self::ResolveIncident(_) => "resolve-incident",
            Self::GetIncident(_) => "get-incident",
            Self::SearchIncidents(_) => "search-incidents",
            Self::AssignIncident(_) => "assign-incident",
            Self::AddComment(_) => "add-comment",
            Self::CreateTicket(_) => "create-ticket",
            Self::UpdateTicket(_) => "update-ticket",
            Self::CloseTicket(_) => "close-ticket",
            Self::GetTicketStatus(_) => "get-ticket-status",
            Self::AddWorkNotes(_) => "add-work-notes",
            Self::CreateChangeRequest(_) => "create-change-request",
            Self::UpdateChangeRequest(_) => "update-change-request",
            Self::AssessChangeRisk(_) => "assess-change-risk",
            Self::ApproveChange(_) => "approve-change",
            Self::ScheduleChange(_) => "schedule-change",
            Self::CreateProblem(_) => "create-problem",
            Self::LinkIncidentsToProblem(_) => "link-incidents-to-problem",
            Self::UpdateProblem(_) => "update-problem",
            Self::ResolveProblem(_) => "resolve-problem",
            Self::SearchKnowledge(_) => "search-knowledge",
            Self::CreateKbArticle(_) => "create-kb-article",
            Self::UpdateKbArticle(_) => "update-kb-article",
            Self::GetKbArticle(_) => "get-kb-article",
            Self::GetUserInfo(_) => "get-user-info",
            Self::GetGroupInfo(_) => "get-group-info",
            Self::AssignToGroup(_) => "assign-to-group",
            Self::GetIncidentMetrics(_) => "get-incident-metrics",
            Self::GetSlaStatus(_) => "get-sla-status",
            Self::GenerateReport(_) => "generate-report",
        }
    }

    /// Run the action and return its result as JSON.
    pub async fn dispatch(&self, client: &ServiceNowClient) -> Result<Value> {
        match self {
            Self::CreateIncident(p) => to_data(client.create_incident(&p.incident).await?),
            Self::UpdateIncident(p) => {
                to_data(client.update_incident(&p.sys_id, &p.incident).await?)
            }
            Self::ResolveIncident(p) => {
                let notes = p.resolution_notes.as_deref().unwrap_or(DEFAULT_RESOLUTION_NOTES);
                to_data(client.resolve_incident(&p.sys_id, notes, p.close_code.as_deref()).await?)
            }
            Self::GetIncident(p) => {
                to_data(client.get_incident(p.sys_id.as_deref(), p.number.as_deref()).await?)
            }
            Self::SearchIncidents(p) => to_data(client.search_incidents(&p.query, p.limit).await?),
            Self::AssignIncident(p) => to_data(
                client
                    .assign_incident(
                        &p.sys_id,
                        p.assigned_to.as_deref(),
                        p.assignment_group.as_deref(),
                    )
                    .await?,
            ),
            Self::AddComment(p) => to_data(client.add_incident_comment(&p.sys_id, &p.comment).await?),

            Self::CreateTicket(p) => {
                incident_table(p)?;
                let request: CreateIncidentRequest = ticket_payload(p)?;
                to_data(client.create_incident(&request).await?)
            }
            Self::UpdateTicket(p) => {
                incident_table(p)?;
                let sys_id = required(&p.sys_id, "sys_id")?;
                let update: IncidentUpdate = ticket_payload(p)?;
                to_data(client.update_incident(sys_id, &update).await?)
            }
            Self::CloseTicket(p) => {
                incident_table(p)?;
                let sys_id = required(&p.sys_id, "sys_id")?;
                let notes = p.close_notes.as_deref().unwrap_or(DEFAULT_TICKET_CLOSE_NOTES);
                to_data(client.resolve_incident(sys_id, notes, None).await?)
            }
            Self::GetTicketStatus(p) => {
                incident_table(p)?;
                to_data(client.get_incident(p.sys_id.as_deref(), p.number.as_deref()).await?)
            }
            Self::AddWorkNotes(p) => {
                incident_table(p)?;
                require_present(&[
                    ("sys_id", p.sys_id.as_deref()),
                    ("work_notes", p.work_notes.as_deref()),
                ])?;
                let sys_id = p.sys_id.as_deref().unwrap_or_default();
                let notes = p.work_notes.as_deref().unwrap_or_default();
                to_data(client.add_incident_work_notes(sys_id, notes).await?)
            }

            Self::CreateChangeRequest(p) => to_data(client.create_change_request(&p.change).await?),
            Self::UpdateChangeRequest(p) => {
                to_data(client.update_change_request(&p.sys_id, &p.change).await?)
            }
            Self::AssessChangeRisk(p) => to_data(
                client.assess_change_risk(&p.sys_id, p.risk_impact_analysis.as_deref()).await?,
            ),
            Self::ApproveChange(p) => {
                to_data(client.approve_change(&p.sys_id, p.approver_notes.as_deref()).await?)
            }
            Self::ScheduleChange(p) => {
                to_data(client.schedule_change(&p.sys_id, &p.start_date, &p.end_date).await?)
            }

            Self::CreateProblem(p) => to_data(client.create_problem(&p.problem).await?),
            Self::LinkIncidentsToProblem(p) => {
                client.link_incidents_to_problem(&p.sys_id, &p.incident_ids).await?;
                Ok(json!({ "message": "Incidents linked successfully" }))
            }
            Self::UpdateProblem(p) => to_data(client.update_problem(&p.sys_id, &p.problem).await?),
            Self::ResolveProblem(p) => to_data(
                client.resolve_problem(&p.sys_id, &p.root_cause, p.workaround.as_deref()).await?,
            ),

            Self::SearchKnowledge(p) => {
                to_data(client.search_knowledge(&p.search_query, p.limit).await?)
            }
            Self::CreateKbArticle(p) => to_data(client.create_kb_article(&p.article).await?),
            Self::UpdateKbArticle(p) => {
                to_data(client.update_kb_article(&p.sys_id, &p.article).await?)
            }
            Self::GetKbArticle(p) => {
                to_data(client.get_kb_article(p.sys_id.as_deref(), p.number.as_deref()).await?)
            }

            Self::GetUserInfo(p) => {
                to_data(client.get_user_info(p.user_id.as_deref(), p.user_name.as_deref()).await?)
            }
            Self::GetGroupInfo(p) => to_data(
                client.get_group_info(p.group_id.as_deref(), p.group_name.as_deref()).await?,
            ),
            Self::AssignToGroup(p) => {
                client.assign_to_group(&p.task_sys_id, &p.group_id, p.table.as_deref()).await?;
                Ok(json!({ "message": "Assigned to group successfully" }))
            }

            Self::GetIncidentMetrics(p) => to_data(
                client.get_incident_metrics(p.start_date.as_deref(), p.end_date.as_deref()).await?,
            ),
            Self::GetSlaStatus(p) => to_data(client.get_sla_status(&p.task_sys_id).await?),
            Self::GenerateReport(p) => {
                client.generate_report(&p.report_type, p.filters.as_ref()).await
            }
        }
    }
}

fn incident_table(params: &TicketParams) -> Result<()> {
    match params.table.as_deref().map(str::trim) {
        None | Some("") | Some(TABLE_INCIDENT) => Ok(()),
        Some(other) => Err(ServiceNowError::unsupported_table(other)),
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    require_present(&[(name, value.as_deref())])?;
    Ok(value.as_deref().unwrap_or_default())
}

fn ticket_payload<T>(params: &TicketParams) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    match &params.ticket {
        None | Some(Value::Null) => Ok(T::default()),
        Some(ticket) => serde_json::from_value(ticket.clone()).map_err(|err| {
            ServiceNowError::invalid_parameter(format!("Invalid ticket fields: {err}"))
        }),
    }
}

fn to_data<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|err| ServiceNowError::invalid_response(format!("failed to encode result: {err}")))
}

/// Uniform envelope returned by [`handle`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_code: None,
            status_code: 200,
            message: Some(SUCCESS_MESSAGE.to_string()),
        }
    }

    pub fn failure(err: &ServiceNowError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.message.clone()),
            error_code: err.code_str().map(str::to_string),
            status_code: err.status_code,
            message: None,
        }
    }
}

impl From<Result<Value>> for ActionResponse {
    fn from(result: Result<Value>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::failure(&err),
        }
    }
}

/// Parse, dispatch and wrap one action call. Never fails; errors become an
/// unsuccessful [`ActionResponse`].
pub async fn handle(client: &ServiceNowClient, request: Value) -> ActionResponse {
    let started = Instant::now();
    let action_name = request.get("action").and_then(Value::as_str).unwrap_or("").to_string();
    info!(action = %action_name, "action started");

    let result = match ServiceNowAction::from_request(request) {
        Ok(action) => action.dispatch(client).await,
        Err(err) => Err(err),
    };
    let duration_ms = started.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => info!(action = %action_name, duration_ms, "action succeeded"),
        Err(err) => error!(
            action = %action_name,
            duration_ms,
            status_code = err.status_code,
            error_code = err.code_str().unwrap_or(""),
            error = %err,
            "action failed"
        ),
    }

    ActionResponse::from(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_name_parses_with_empty_parameters() {
        for name in ACTION_NAMES {
            let action = ServiceNowAction::from_request(json!({ "action": name })).unwrap();
            assert_eq!(action.name(), name);
        }
    }

    #[test]
    fn parses_typed_parameters() {
        let action = ServiceNowAction::from_request(json!({
            "action": "create-incident",
            "parameters": {"incident": {"short_description": "Printer on fire", "caller_id": "u1", "urgency": "1"}}
        }))
        .unwrap();

        let ServiceNowAction::CreateIncident(params) = action else {
            panic!("wrong variant");
        };
        assert_eq!(params.incident.short_description, "Printer on fire");
        assert_eq!(params.incident.urgency.as_deref(), Some("1"));
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = ServiceNowAction::from_request(json!({"action": "delete-everything"})).unwrap_err();
        assert_eq!(err.status_code, 400);
        assert_eq!(err.code_str(), Some("UNKNOWN_ACTION"));
        assert_eq!(err.message, "Unknown action: delete-everything");
    }

    #[test]
    fn malformed_parameters_are_invalid() {
        let err = ServiceNowAction::from_request(json!({
            "action": "search-incidents",
            "parameters": {"query": "active=true", "limit": "lots"}
        }))
        .unwrap_err();
        assert_eq!(err.code_str(), Some("INVALID_PARAMETER"));

        let err = ServiceNowAction::from_request(json!({"action": 7})).unwrap_err();
        assert_eq!(err.code_str(), Some("INVALID_PARAMETER"));

        let err = ServiceNowAction::from_request(json!({"parameters": {}})).unwrap_err();
        assert_eq!(err.code_str(), Some("MISSING_PARAMETER"));
    }

    #[test]
    fn misspelled_parameter_key_is_invalid() {
        let err = ServiceNowAction::from_request(json!({
            "action": "resolve-incident",
            "parameters": {"sys_id": "abc", "notes": "Rebooted the router"}
        }))
        .unwrap_err();

        assert_eq!(err.status_code, 400);
        assert_eq!(err.code_str(), Some("INVALID_PARAMETER"));
        assert!(err.message.contains("notes"), "{}", err.message);
    }

    #[test]
    fn ticket_actions_only_accept_incident_table() {
        let incident = TicketParams { table: Some("incident".into()), ..TicketParams::default() };
        let default_table = TicketParams::default();
        let problem = TicketParams { table: Some("problem".into()), ..TicketParams::default() };

        assert!(incident_table(&incident).is_ok());
        assert!(incident_table(&default_table).is_ok());
        let err = incident_table(&problem).unwrap_err();
        assert_eq!(err.code_str(), Some("UNSUPPORTED_TABLE"));
        assert_eq!(err.message, "Unsupported table: problem");
    }

    #[test]
    fn response_envelope_shapes() {
        let ok = serde_json::to_value(ActionResponse::ok(json!({"sys_id": "a"}))).unwrap();
        assert_eq!(
            ok,
            json!({"success": true, "data": {"sys_id": "a"}, "status_code": 200, "message": SUCCESS_MESSAGE})
        );

        let failed = ActionResponse::failure(&ServiceNowError::not_implemented("nope"));
        assert!(!failed.success);
        assert_eq!(failed.status_code, 501);
        assert_eq!(failed.error_code.as_deref(), Some("NOT_IMPLEMENTED"));
    }
}
