//! Table names, choice codes and client defaults
//!
//! Numeric state codes are the platform's out-of-the-box values. Instances
//! with customised choice lists may differ.

// Table API
pub const TABLE_API_PREFIX: &str = "/api/now/table";
pub const OAUTH_TOKEN_PATH: &str = "/oauth_token.do";

pub const TABLE_INCIDENT: &str = "incident";
pub const TABLE_CHANGE_REQUEST: &str = "change_request";
pub const TABLE_PROBLEM: &str = "problem";
pub const TABLE_KNOWLEDGE: &str = "kb_knowledge";
pub const TABLE_USER: &str = "sys_user";
pub const TABLE_GROUP: &str = "sys_user_group";
pub const TABLE_TASK_SLA: &str = "task_sla";

// Incident states
pub const INCIDENT_STATE_NEW: &str = "1";
pub const INCIDENT_STATE_IN_PROGRESS: &str = "2";
pub const INCIDENT_STATE_ON_HOLD: &str = "3";
pub const INCIDENT_STATE_RESOLVED: &str = "6";
pub const INCIDENT_STATE_CLOSED: &str = "7";
pub const INCIDENT_STATE_CANCELED: &str = "8";

/// States counted as open in incident metrics
pub const INCIDENT_OPEN_STATES: [&str; 3] =
    [INCIDENT_STATE_NEW, INCIDENT_STATE_IN_PROGRESS, INCIDENT_STATE_ON_HOLD];

// Problem states (1 New, 2 Assess, 3 RCA, 4 Fix in Progress, 5 Resolved)
pub const PROBLEM_STATE_RESOLVED: &str = "5";

pub const DEFAULT_CLOSE_CODE: &str = "Solved (Permanently)";
pub const DEFAULT_RESOLUTION_NOTES: &str = "Issue resolved";
pub const DEFAULT_TICKET_CLOSE_NOTES: &str = "Ticket closed";
pub const DEFAULT_APPROVAL_NOTES: &str = "Change approved";
pub const DEFAULT_RISK_ANALYSIS: &str = "Risk assessment performed";

// Query limits
pub const DEFAULT_INCIDENT_SEARCH_LIMIT: u32 = 100;
pub const DEFAULT_KNOWLEDGE_SEARCH_LIMIT: u32 = 50;

// Client defaults
pub const DEFAULT_SECRET_NAME: &str = "servicenow/credentials";
pub const DEFAULT_MAX_REQUESTS: u32 = 100;
pub const DEFAULT_WINDOW_MS: u64 = 60_000;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;
pub const DEFAULT_MAX_RETRY_DELAY_MS: u64 = 10_000;
pub const DEFAULT_TOKEN_EXPIRY_BUFFER_SECS: i64 = 60;
