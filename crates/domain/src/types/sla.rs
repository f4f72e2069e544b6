//! Task SLA records and computed incident metrics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{lenient, RecordRef};

/// Row of `task_sla`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sla {
    #[serde(default)]
    pub sys_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla_definition: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::bool_opt")]
    pub has_breached: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::f64_opt")]
    pub percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::f64_opt")]
    pub business_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_duration: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Aggregates over the incidents in a reporting window
///
/// `avg_resolution_time` is the mean of `resolved_at - sys_created_on` in
/// seconds over incidents where both parse, and `None` when there are none.
/// `breached_sla_count` is not derivable from incident rows and is always
/// `None`; use [`Sla`] records per task instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentMetrics {
    pub total_incidents: u64,
    pub open_incidents: u64,
    pub resolved_incidents: u64,
    pub closed_incidents: u64,
    pub avg_resolution_time: Option<f64>,
    pub breached_sla_count: Option<u64>,
    pub by_priority: BTreeMap<String, u64>,
    pub by_state: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn sla_parses_display_value_rendering() {
        let sla: Sla = serde_json::from_value(json!({
            "sys_id": "s1",
            "task": {"display_value": "INC0010001", "link": "https://x/api/now/table/incident/i1"},
            "has_breached": "false",
            "percentage": "37.2",
            "stage": "In progress",
            "planned_end_time": "2026-01-02 10:00:00"
        }))
        .unwrap();

        assert_eq!(sla.has_breached, Some(false));
        assert_eq!(sla.percentage, Some(37.2));
        assert_eq!(sla.task.as_ref().and_then(RecordRef::display), Some("INC0010001"));
    }
}
