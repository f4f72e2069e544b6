//! Incident metrics, SLA status and reports

use serde_json::Value;
use snowgate_core::{compute_incident_metrics, non_blank, require_fields, EncodedQuery};
use snowgate_domain::constants::{TABLE_INCIDENT, TABLE_TASK_SLA};
use snowgate_domain::{Incident, IncidentMetrics, Result, ServiceNowError, Sla};
use tracing::info;

use super::client::ServiceNowClient;

impl ServiceNowClient {
    /// Aggregate incidents created between `start_date` and `end_date`.
    ///
    /// The range applies only when both bounds are given; otherwise every
    /// incident the caller can read is counted. Aggregation happens locally
    /// over display values.
    pub async fn get_incident_metrics(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<IncidentMetrics> {
        let mut query = vec![("sysparm_display_value", "true".to_string())];
        if let (Some(start), Some(end)) = (non_blank(start_date), non_blank(end_date)) {
            let range = EncodedQuery::new().between("sys_created_on", start, end);
            query.push(("sysparm_query", range.build()));
        }

        info!(start_date, end_date, "computing incident metrics");
        let incidents: Vec<Incident> = self.list_records(TABLE_INCIDENT, &query).await?;
        Ok(compute_incident_metrics(&incidents))
    }

    /// SLA records attached to a task
    pub async fn get_sla_status(&self, task_sys_id: &str) -> Result<Vec<Sla>> {
        require_fields(&[("task_sys_id", task_sys_id)])?;

        info!(task_sys_id, "fetching SLA status");
        self.list_records(
            TABLE_TASK_SLA,
            &[
                ("sysparm_query", EncodedQuery::new().eq("task", task_sys_id).build()),
                ("sysparm_display_value", "true".to_string()),
            ],
        )
        .await
    }

    /// Always fails with `NOT_IMPLEMENTED` once `report_type` is present.
    pub async fn generate_report(&self, report_type: &str, filters: Option<&Value>) -> Result<Value> {
        require_fields(&[("report_type", report_type)])?;

        info!(report_type, has_filters = filters.is_some(), "report requested");
        Err(ServiceNowError::not_implemented("Report generation not yet implemented"))
    }
}
