//! Incident records and payloads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::RecordRef;

/// Incident as returned by the `incident` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    #[serde(default)]
    pub sys_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys_created_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys_updated_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys_created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys_updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 1 High, 2 Medium, 3 Low
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// 1 New, 2 In Progress, 3 On Hold, 6 Resolved, 7 Closed, 8 Canceled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_group: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_id: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,
    /// Fields without a dedicated member
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for creating an incident
///
/// `short_description` and `caller_id` are required. They default to empty
/// when absent from JSON so validation, not deserialization, reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateIncidentRequest {
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub caller_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl CreateIncidentRequest {
    pub fn new(short_description: impl Into<String>, caller_id: impl Into<String>) -> Self {
        Self {
            short_description: short_description.into(),
            caller_id: caller_id.into(),
            ..Self::default()
        }
    }
}

/// Partial update for an incident. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncidentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn incident_keeps_unknown_fields() {
        let incident: Incident = serde_json::from_value(json!({
            "sys_id": "9d385017c611228701d22104cc95c371",
            "number": "INC0000001",
            "state": "2",
            "caller_id": {"link": "https://x/api/now/table/sys_user/5137", "value": "5137"},
            "u_custom_field": "kept"
        }))
        .unwrap();

        assert_eq!(incident.number.as_deref(), Some("INC0000001"));
        assert_eq!(incident.caller_id.as_ref().and_then(RecordRef::id), Some("5137"));
        assert_eq!(incident.extra["u_custom_field"], "kept");

        let back = serde_json::to_value(&incident).unwrap();
        assert_eq!(back["u_custom_field"], "kept");
    }

    #[test]
    fn create_request_omits_absent_optionals() {
        let request = CreateIncidentRequest {
            urgency: Some("2".into()),
            ..CreateIncidentRequest::new("Email down", "user123")
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"short_description": "Email down", "caller_id": "user123", "urgency": "2"})
        );
    }

    #[test]
    fn create_request_tolerates_missing_required_but_not_unknown() {
        let empty: CreateIncidentRequest = serde_json::from_value(json!({})).unwrap();
        assert!(empty.short_description.is_empty());

        assert!(serde_json::from_value::<CreateIncidentRequest>(json!({"bogus": 1})).is_err());
    }
}
