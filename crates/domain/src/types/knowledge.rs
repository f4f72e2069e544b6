//! Knowledge base articles

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{lenient, RecordRef};
use crate::impl_choice_conversions;

/// Article workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KbWorkflowState {
    Draft,
    Published,
    Retired,
}

impl_choice_conversions!(KbWorkflowState {
    Draft => "draft",
    Published => "published",
    Retired => "retired",
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeArticle {
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
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kb_knowledge_base: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kb_category: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<RecordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::f64_opt")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::u64_opt")]
    pub sys_view_count: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for creating an article
///
/// `short_description`, `text`, `kb_knowledge_base` and `author` are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateKbArticleRequest {
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub kb_knowledge_base: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kb_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_state: Option<KbWorkflowState>,
}

impl CreateKbArticleRequest {
    pub fn new(
        short_description: impl Into<String>,
        text: impl Into<String>,
        kb_knowledge_base: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            short_description: short_description.into(),
            text: text.into(),
            kb_knowledge_base: kb_knowledge_base.into(),
            author: author.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KbArticleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kb_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_state: Option<KbWorkflowState>,
}
