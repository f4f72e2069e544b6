//! Client-side incident metrics
//!
//! Incident lists are fetched with display values, so `state` may hold
//! either the choice code (`"2"`) or its label (`"In Progress"`). Both are
//! understood for the out-of-the-box choices.

use std::collections::BTreeMap;

use snowgate_domain::constants::{
    INCIDENT_OPEN_STATES, INCIDENT_STATE_CLOSED, INCIDENT_STATE_RESOLVED,
};
use snowgate_domain::{Incident, IncidentMetrics};

use crate::time::parse_servicenow_date;

/// Bucket an incident lands in for the open/resolved/closed counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateBucket {
    Open,
    Resolved,
    Closed,
    Other,
}

pub fn classify_state(state: &str) -> StateBucket {
    let state = state.trim();
    if INCIDENT_OPEN_STATES.contains(&state) {
        return StateBucket::Open;
    }
    if state == INCIDENT_STATE_RESOLVED {
        return StateBucket::Resolved;
    }
    if state == INCIDENT_STATE_CLOSED {
        return StateBucket::Closed;
    }
    match state.to_ascii_lowercase().as_str() {
        "new" | "in progress" | "on hold" => StateBucket::Open,
        "resolved" => StateBucket::Resolved,
        "closed" => StateBucket::Closed,
        _ => StateBucket::Other,
    }
}

/// Aggregate a window of incidents.
///
/// Incidents with no `state` or `priority` are counted under `"unknown"`.
/// `avg_resolution_time` only considers incidents whose `sys_created_on` and
/// `resolved_at` both parse and are ordered.
pub fn compute_incident_metrics(incidents: &[Incident]) -> IncidentMetrics {
    let mut metrics = IncidentMetrics { total_incidents: incidents.len() as u64, ..IncidentMetrics::default() };
    let mut resolution_total = 0.0_f64;
    let mut resolution_samples = 0_u32;

    for incident in incidents {
        let state = incident.state.as_deref().unwrap_or_default();
        match classify_state(state) {
            StateBucket::Open => metrics.open_incidents += 1,
            StateBucket::Resolved => metrics.resolved_incidents += 1,
            StateBucket::Closed => metrics.closed_incidents += 1,
            StateBucket::Other => {}
        }

        *metrics.by_state.entry(bucket_key(incident.state.as_deref())).or_default() += 1;
        *metrics.by_priority.entry(bucket_key(incident.priority.as_deref())).or_default() += 1;

        if let Some(seconds) = resolution_seconds(incident) {
            resolution_total += seconds;
            resolution_samples += 1;
        }
    }

    if resolution_samples > 0 {
        metrics.avg_resolution_time = Some(resolution_total / f64::from(resolution_samples));
    }
    metrics
}

fn bucket_key(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "unknown".to_string(),
    }
}

fn resolution_seconds(incident: &Incident) -> Option<f64> {
    let created = parse_servicenow_date(incident.sys_created_on.as_deref()?)?;
    let resolved = parse_servicenow_date(incident.resolved_at.as_deref()?)?;
    let elapsed = resolved.signed_duration_since(created).num_seconds();
    (elapsed >= 0).then_some(elapsed as f64)
}
