//! Conversions from third-party errors into [`ServiceNowError`](snowgate_domain::ServiceNowError)

mod conversions;

pub use conversions::InfraError;
