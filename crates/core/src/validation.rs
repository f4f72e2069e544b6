//! Required-parameter checks run before any request is sent

use snowgate_domain::{Result, ServiceNowError};

/// Fail with `MISSING_PARAMETER` listing every blank field.
///
/// `fields` pairs a parameter name with its value; a value that is empty
/// or whitespace counts as missing.
///
/// ```
/// use snowgate_core::require_fields;
///
/// let err = require_fields(&[("short_description", ""), ("caller_id", "u1")]).unwrap_err();
/// assert_eq!(err.message, "Missing required parameters: short_description");
/// ```
pub fn require_fields(fields: &[(&str, &str)]) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ServiceNowError::missing_parameter(&missing))
    }
}

/// Same as [`require_fields`] for optional inputs.
pub fn require_present(fields: &[(&str, Option<&str>)]) -> Result<()> {
    let flattened: Vec<(&str, &str)> =
        fields.iter().map(|(name, value)| (*name, value.unwrap_or_default())).collect();
    require_fields(&flattened)
}

/// Require at least one of several alternatives.
///
/// The error lists the names joined with ` or `.
pub fn require_any(fields: &[(&str, Option<&str>)]) -> Result<()> {
    let any = fields.iter().any(|(_, value)| value.is_some_and(|v| !v.trim().is_empty()));
    if any {
        return Ok(());
    }
    let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    Err(ServiceNowError::missing_parameter(&[names.join(" or ")]))
}

/// Non-blank value of an optional input
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
