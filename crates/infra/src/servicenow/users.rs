//! User and group lookups, and group assignment for task records

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use snowgate_core::{non_blank, require_any, require_fields, EncodedQuery};
use snowgate_domain::constants::{TABLE_GROUP, TABLE_INCIDENT, TABLE_USER};
use snowgate_domain::{Group, Result, ServiceNowError, User};
use tracing::info;

use super::client::ServiceNowClient;

impl ServiceNowClient {
    /// Look up a user by `user_name`, or by `sys_id` when no name is given.
    pub async fn get_user_info(&self, user_id: Option<&str>, user_name: Option<&str>) -> Result<User> {
        require_any(&[("user_id", user_id), ("user_name", user_name)])?;

        info!(user_id, user_name, "fetching user");
        self.find_by_field_or_id(TABLE_USER, user_id, "user_name", user_name, "User").await
    }

    /// Look up a group by `name`, or by `sys_id` when no name is given.
    pub async fn get_group_info(
        &self,
        group_id: Option<&str>,
        group_name: Option<&str>,
    ) -> Result<Group> {
        require_any(&[("group_id", group_id), ("group_name", group_name)])?;

        info!(group_id, group_name, "fetching group");
        self.find_by_field_or_id(TABLE_GROUP, group_id, "name", group_name, "Group").await
    }

    /// Set `assignment_group` on a task record. `table` defaults to
    /// `incident`.
    pub async fn assign_to_group(
        &self,
        task_sys_id: &str,
        group_id: &str,
        table: Option<&str>,
    ) -> Result<()> {
        require_fields(&[("task_sys_id", task_sys_id), ("group_id", group_id)])?;
        let table = non_blank(table).unwrap_or(TABLE_INCIDENT);

        info!(task_sys_id, group_id, table, "assigning task to group");
        self.update_record::<Value, _>(table, task_sys_id, &json!({ "assignment_group": group_id }))
            .await?;
        Ok(())
    }

    async fn find_by_field_or_id<T: DeserializeOwned>(
        &self,
        table: &str,
        sys_id: Option<&str>,
        field: &str,
        value: Option<&str>,
        label: &str,
    ) -> Result<T> {
        let Some(value) = non_blank(value) else {
            return match non_blank(sys_id) {
                Some(sys_id) => self.get_record(table, sys_id, &[]).await,
                None => Err(ServiceNowError::missing_parameter(&[field])),
            };
        };

        self.list_records(
            table,
            &[
                ("sysparm_query", EncodedQuery::new().eq(field, value).build()),
                ("sysparm_limit", "1".to_string()),
            ],
        )
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ServiceNowError::not_found(format!("{label} not found: {value}")))
    }
}
