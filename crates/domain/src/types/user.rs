//! Users and assignment groups

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{lenient, RecordRef};

/// Row of `sys_user`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub sys_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::bool_opt")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys_created_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys_updated_on: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Row of `sys_user_group`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub sys_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub group_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::bool_opt")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys_created_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys_updated_on: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn user_parses_string_boolean() {
        let user: User = serde_json::from_value(json!({
            "sys_id": "u1",
            "user_name": "abel.tuter",
            "active": "true",
            "department": {"value": "d1", "link": "https://x/api/now/table/cmn_department/d1"}
        }))
        .unwrap();

        assert_eq!(user.active, Some(true));
        assert_eq!(user.department.as_ref().and_then(RecordRef::id), Some("d1"));
    }

    #[test]
    fn group_renames_type() {
        let group: Group =
            serde_json::from_value(json!({"sys_id": "g1", "name": "Service Desk", "type": "itil"}))
                .unwrap();
        assert_eq!(group.group_type.as_deref(), Some("itil"));
        assert_eq!(serde_json::to_value(&group).unwrap()["type"], "itil");
    }
}
