//! Problem management on the `problem` table

use serde_json::json;
use snowgate_core::{non_blank, require_fields};
use snowgate_domain::constants::{PROBLEM_STATE_RESOLVED, TABLE_INCIDENT, TABLE_PROBLEM};
use snowgate_domain::{
    CreateProblemRequest, Incident, Problem, ProblemUpdate, Result, ServiceNowError,
};
use tracing::{info, warn};

use super::client::ServiceNowClient;
use super::incidents::now_rfc3339;

impl ServiceNowClient {
    pub async fn create_problem(&self, request: &CreateProblemRequest) -> Result<Problem> {
        require_fields(&[("short_description", request.short_description.as_str())])?;

        info!(short_description = %request.short_description, "creating problem");
        self.create_record(TABLE_PROBLEM, request).await
    }

    /// Point each incident's `problem_id` at `problem_id`.
    ///
    /// Incidents are patched one at a time in order. There is no rollback: on
    /// the first failure the error carries `details.linked` (already patched)
    /// and `details.failed` (the failing id and everything after it).
    /// An empty list or any blank id is rejected before the first patch.
    pub async fn link_incidents_to_problem(
        &self,
        problem_id: &str,
        incident_ids: &[String],
    ) -> Result<()> {
        require_fields(&[("sys_id", problem_id)])?;
        if incident_ids.is_empty() || incident_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(ServiceNowError::missing_parameter(&["incident_ids"]));
        }

        info!(problem_id, incident_count = incident_ids.len(), "linking incidents to problem");

        let body = json!({ "problem_id": problem_id });
        for (index, incident_id) in incident_ids.iter().enumerate() {
            let linked =
                self.update_record::<Incident, _>(TABLE_INCIDENT, incident_id, &body).await;

            if let Err(err) = linked {
                warn!(problem_id, incident_id = %incident_id, error = %err, "linking incident failed");
                let message = format!(
                    "Failed to link incident {incident_id} to problem {problem_id}: {}",
                    err.message
                );
                let details = json!({
                    "linked": &incident_ids[..index],
                    "failed": &incident_ids[index..],
                    "cause": &err,
                });
                return Err(ServiceNowError { message, details: Some(details), ..err });
            }
        }

        Ok(())
    }

    pub async fn update_problem(&self, sys_id: &str, update: &ProblemUpdate) -> Result<Problem> {
        require_fields(&[("sys_id", sys_id)])?;

        info!(sys_id, "updating problem");
        self.update_record(TABLE_PROBLEM, sys_id, update).await
    }

    /// Mark the problem Resolved with its root cause.
    pub async fn resolve_problem(
        &self,
        sys_id: &str,
        root_cause: &str,
        workaround: Option<&str>,
    ) -> Result<Problem> {
        require_fields(&[("sys_id", sys_id), ("root_cause", root_cause)])?;

        let mut body = json!({
            "state": PROBLEM_STATE_RESOLVED,
            "root_cause": root_cause,
            "resolved_at": now_rfc3339(),
        });
        if let Some(workaround) = non_blank(workaround) {
            body["workaround"] = json!(workaround);
        }

        info!(sys_id, "resolving problem");
        self.update_record(TABLE_PROBLEM, sys_id, &body).await
    }
}
