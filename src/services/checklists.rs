//! Checklist template service

use crate::{
    error::AppResult,
    models::checklist::{ChecklistTemplateItem, CreateTemplateItem},
    repository::Repository,
};

#[derive(Clone)]
pub struct ChecklistsService {
    repository: Repository,
}

impl ChecklistsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Active prompts of a category in sequence order
    pub async fn list(&self, category_id: i32) -> AppResult<Vec<ChecklistTemplateItem>> {
        self.repository.reference.get_category(category_id).await?;
        self.repository.checklists.list_active(category_id).await
    }

    /// Every prompt of a category, inactive ones included
    pub async fn list_all(&self, category_id: i32) -> AppResult<Vec<ChecklistTemplateItem>> {
        self.repository.reference.get_category(category_id).await?;
        self.repository.checklists.list_all(category_id).await
    }

    /// Append a prompt at the end of a category's checklist
    pub async fn append(
        &self,
        category_id: i32,
        data: &CreateTemplateItem,
    ) -> AppResult<ChecklistTemplateItem> {
        self.repository.reference.get_category(category_id).await?;
        self.repository
            .checklists
            .append(category_id, &data.prompt)
            .await
    }

    /// Soft-delete a prompt, keeping its sequence number reserved
    pub async fn soft_delete(&self, id: i32) -> AppResult<()> {
        self.repository.checklists.soft_delete(id).await
    }
}
