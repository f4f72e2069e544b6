//! Change request records and payloads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::RecordRef;
use crate::impl_choice_conversions;

/// Change model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Standard,
    Normal,
    Emergency,
}

impl_choice_conversions!(ChangeType {
    Standard => "standard",
    Normal => "normal",
    Emergency => "emergency",
});

/// Lifecycle states written by the change operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeState {
    New,
    Assess,
    Authorize,
    Scheduled,
    Implement,
    Review,
    Closed,
}

impl_choice_conversions!(ChangeState {
    New => "new",
    Assess => "assess",
    Authorize => "authorize",
    Scheduled => "scheduled",
    Implement => "implement",
    Review => "review",
    Closed => "closed",
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeRequest {
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
    /// Kept as text; instances may use numeric or custom values
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_group: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_impact_analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for creating a change request
///
/// `short_description`, `type` and `requested_by` are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateChangeRequest {
    #[serde(default)]
    pub short_description: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<ChangeType>,
    #[serde(default)]
    pub requested_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl CreateChangeRequest {
    pub fn new(
        short_description: impl Into<String>,
        change_type: ChangeType,
        requested_by: impl Into<String>,
    ) -> Self {
        Self {
            short_description: short_description.into(),
            change_type: Some(change_type),
            requested_by: requested_by.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ChangeState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn create_request_renames_type() {
        let request = CreateChangeRequest::new("Patch DB", ChangeType::Emergency, "user1");

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"short_description": "Patch DB", "type": "emergency", "requested_by": "user1"})
        );
    }

    #[test]
    fn state_parses_case_insensitively() {
        assert_eq!("Scheduled".parse::<ChangeState>().unwrap(), ChangeState::Scheduled);
        assert_eq!(ChangeState::Authorize.to_string(), "authorize");
        assert!("rolled-back".parse::<ChangeState>().is_err());
    }

    #[test]
    fn change_record_accepts_numeric_type() {
        let record: ChangeRequest =
            serde_json::from_value(json!({"sys_id": "c1", "type": "normal", "state": "-4"})).unwrap();
        assert_eq!(record.change_type.as_deref(), Some("normal"));
        assert_eq!(record.state.as_deref(), Some("-4"));
    }
}
