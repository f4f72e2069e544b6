//! Knowledge base articles on `kb_knowledge`

use snowgate_core::{require_fields, EncodedQuery};
use snowgate_domain::constants::{DEFAULT_KNOWLEDGE_SEARCH_LIMIT, TABLE_KNOWLEDGE};
use snowgate_domain::{CreateKbArticleRequest, KbArticleUpdate, KnowledgeArticle, Result};
use tracing::info;

use super::client::ServiceNowClient;

impl ServiceNowClient {
    /// Articles whose title or body contains `text`, with display values.
    pub async fn search_knowledge(
        &self,
        text: &str,
        limit: Option<u32>,
    ) -> Result<Vec<KnowledgeArticle>> {
        require_fields(&[("search_query", text)])?;
        let limit = limit.unwrap_or(DEFAULT_KNOWLEDGE_SEARCH_LIMIT);

        let query = EncodedQuery::new().like("short_description", text).or_like("text", text);

        info!(query = text, limit, "searching knowledge base");
        self.list_records(
            TABLE_KNOWLEDGE,
            &[
                ("sysparm_query", query.build()),
                ("sysparm_limit", limit.to_string()),
                ("sysparm_display_value", "true".to_string()),
            ],
        )
        .await
    }

    pub async fn create_kb_article(&self, request: &CreateKbArticleRequest) -> Result<KnowledgeArticle> {
        require_fields(&[
            ("short_description", request.short_description.as_str()),
            ("text", request.text.as_str()),
            ("kb_knowledge_base", request.kb_knowledge_base.as_str()),
            ("author", request.author.as_str()),
        ])?;

        info!(short_description = %request.short_description, "creating knowledge article");
        self.create_record(TABLE_KNOWLEDGE, request).await
    }

    pub async fn update_kb_article(
        &self,
        sys_id: &str,
        update: &KbArticleUpdate,
    ) -> Result<KnowledgeArticle> {
        require_fields(&[("sys_id", sys_id)])?;

        info!(sys_id, "updating knowledge article");
        self.update_record(TABLE_KNOWLEDGE, sys_id, update).await
    }

    pub async fn get_kb_article(
        &self,
        sys_id: Option<&str>,
        number: Option<&str>,
    ) -> Result<KnowledgeArticle> {
        info!(sys_id, number, "fetching knowledge article");
        self.find_by_number_or_id(TABLE_KNOWLEDGE, sys_id, number, &[]).await
    }
}
