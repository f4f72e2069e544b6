//! Change management on the `change_request` table

use serde_json::json;
use snowgate_core::{non_blank, require_fields};
use snowgate_domain::constants::{
    DEFAULT_APPROVAL_NOTES, DEFAULT_RISK_ANALYSIS, TABLE_CHANGE_REQUEST,
};
use snowgate_domain::{ChangeRequest, ChangeState, ChangeUpdate, CreateChangeRequest, Result};
use tracing::info;

use super::client::ServiceNowClient;

impl ServiceNowClient {
    /// # Errors
    /// `MISSING_PARAMETER` without `short_description`, `type` or
    /// `requested_by`.
    pub async fn create_change_request(
        &self,
        request: &CreateChangeRequest,
    ) -> Result<ChangeRequest> {
        let change_type = request.change_type.map(|t| t.as_str()).unwrap_or_default();
        require_fields(&[
            ("short_description", request.short_description.as_str()),
            ("type", change_type),
            ("requested_by", request.requested_by.as_str()),
        ])?;

        info!(
            short_description = %request.short_description,
            change_type,
            "creating change request"
        );
        self.create_record(TABLE_CHANGE_REQUEST, request).await
    }

    pub async fn update_change_request(
        &self,
        sys_id: &str,
        update: &ChangeUpdate,
    ) -> Result<ChangeRequest> {
        require_fields(&[("sys_id", sys_id)])?;

        info!(sys_id, "updating change request");
        self.update_record(TABLE_CHANGE_REQUEST, sys_id, update).await
    }

    /// Record the risk and impact analysis and move the change to Assess.
    pub async fn assess_change_risk(
        &self,
        sys_id: &str,
        analysis: Option<&str>,
    ) -> Result<ChangeRequest> {
        require_fields(&[("sys_id", sys_id)])?;

        let body = json!({
            "risk_impact_analysis": non_blank(analysis).unwrap_or(DEFAULT_RISK_ANALYSIS),
            "state": ChangeState::Assess.as_str(),
        });

        info!(sys_id, "assessing change risk");
        self.update_record(TABLE_CHANGE_REQUEST, sys_id, &body).await
    }

    pub async fn approve_change(&self, sys_id: &str, notes: Option<&str>) -> Result<ChangeRequest> {
        require_fields(&[("sys_id", sys_id)])?;

        let body = json!({
            "approval": "approved",
            "state": ChangeState::Authorize.as_str(),
            "work_notes": non_blank(notes).unwrap_or(DEFAULT_APPROVAL_NOTES),
        });

        info!(sys_id, "approving change");
        self.update_record(TABLE_CHANGE_REQUEST, sys_id, &body).await
    }

    /// Set the implementation window. Dates are passed through in the
    /// instance's format.
    pub async fn schedule_change(
        &self,
        sys_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<ChangeRequest> {
        require_fields(&[("sys_id", sys_id), ("start_date", start_date), ("end_date", end_date)])?;

        let body = json!({
            "start_date": start_date,
            "end_date": end_date,
            "state": ChangeState::Scheduled.as_str(),
        });

        info!(sys_id, start_date, end_date, "scheduling change");
        self.update_record(TABLE_CHANGE_REQUEST, sys_id, &body).await
    }
}
