//! Incident operations on the `incident` table

use chrono::{SecondsFormat, Utc};
use serde_json::json;
use snowgate_core::{non_blank, require_any, require_fields};
use snowgate_domain::constants::{
    DEFAULT_CLOSE_CODE, DEFAULT_INCIDENT_SEARCH_LIMIT, INCIDENT_STATE_IN_PROGRESS,
    INCIDENT_STATE_RESOLVED, TABLE_INCIDENT,
};
use snowgate_domain::{CreateIncidentRequest, Incident, IncidentUpdate, Result};
use tracing::info;

use super::client::ServiceNowClient;

/// Current instant as an RFC 3339 UTC timestamp with millisecond precision
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl ServiceNowClient {
    /// Create an incident.
    ///
    /// # Errors
    /// `MISSING_PARAMETER` without `short_description` or `caller_id`; no
    /// request is sent in that case.
    pub async fn create_incident(&self, request: &CreateIncidentRequest) -> Result<Incident> {
        require_fields(&[
            ("short_description", request.short_description.as_str()),
            ("caller_id", request.caller_id.as_str()),
        ])?;

        info!(short_description = %request.short_description, "creating incident");
        self.create_record(TABLE_INCIDENT, request).await
    }

    pub async fn update_incident(&self, sys_id: &str, update: &IncidentUpdate) -> Result<Incident> {
        require_fields(&[("sys_id", sys_id)])?;

        info!(sys_id, "updating incident");
        self.update_record(TABLE_INCIDENT, sys_id, update).await
    }

    /// Move an incident to Resolved.
    ///
    /// `close_code` defaults to `Solved (Permanently)`.
    pub async fn resolve_incident(
        &self,
        sys_id: &str,
        resolution_notes: &str,
        close_code: Option<&str>,
    ) -> Result<Incident> {
        require_fields(&[("sys_id", sys_id)])?;

        let body = json!({
            "state": INCIDENT_STATE_RESOLVED,
            "close_notes": resolution_notes,
            "close_code": non_blank(close_code).unwrap_or(DEFAULT_CLOSE_CODE),
            "resolved_at": now_rfc3339(),
        });

        info!(sys_id, "resolving incident");
        self.update_record(TABLE_INCIDENT, sys_id, &body).await
    }

    /// Fetch by `number`, or by `sys_id` when no number is given.
    pub async fn get_incident(&self, sys_id: Option<&str>, number: Option<&str>) -> Result<Incident> {
        info!(sys_id, number, "fetching incident");
        self.find_by_number_or_id(TABLE_INCIDENT, sys_id, number, &[]).await
    }

    /// Run an encoded query. The query is sent verbatim; callers building it
    /// from user input should pass values through
    /// [`sanitize_input`](snowgate_core::sanitize_input) or
    /// [`EncodedQuery`](snowgate_core::EncodedQuery).
    pub async fn search_incidents(&self, query: &str, limit: Option<u32>) -> Result<Vec<Incident>> {
        require_fields(&[("query", query)])?;
        let limit = limit.unwrap_or(DEFAULT_INCIDENT_SEARCH_LIMIT);

        info!(query, limit, "searching incidents");
        self.list_records(
            TABLE_INCIDENT,
            &[("sysparm_query", query.to_string()), ("sysparm_limit", limit.to_string())],
        )
        .await
    }

    /// Assign to a user and/or group and mark the incident In Progress.
    pub async fn assign_incident(
        &self,
        sys_id: &str,
        assigned_to: Option<&str>,
        assignment_group: Option<&str>,
    ) -> Result<Incident> {
        require_fields(&[("sys_id", sys_id)])?;
        require_any(&[("assigned_to", assigned_to), ("assignment_group", assignment_group)])?;

        let mut body = json!({ "state": INCIDENT_STATE_IN_PROGRESS });
        if let Some(user) = non_blank(assigned_to) {
            body["assigned_to"] = json!(user);
        }
        if let Some(group) = non_blank(assignment_group) {
            body["assignment_group"] = json!(group);
        }

        info!(sys_id, assigned_to, assignment_group, "assigning incident");
        self.update_record(TABLE_INCIDENT, sys_id, &body).await
    }

    /// Append a customer-visible comment
    pub async fn add_incident_comment(&self, sys_id: &str, comment: &str) -> Result<Incident> {
        require_fields(&[("sys_id", sys_id), ("comment", comment)])?;

        info!(sys_id, "adding incident comment");
        self.update_record(TABLE_INCIDENT, sys_id, &json!({ "comments": comment })).await
    }

    pub async fn add_incident_work_notes(&self, sys_id: &str, work_notes: &str) -> Result<Incident> {
        require_fields(&[("sys_id", sys_id), ("work_notes", work_notes)])?;

        info!(sys_id, "adding incident work notes");
        self.update_record(TABLE_INCIDENT, sys_id, &json!({ "work_notes": work_notes })).await
    }
}
