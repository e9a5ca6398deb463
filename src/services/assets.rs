//! Asset and reference-data service

use crate::{
    error::AppResult,
    models::{
        asset::{Asset, CreateAsset, UpdateAsset},
        reference::{Category, CreateCategory, CreateLocation, Location},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AssetsService {
    repository: Repository,
}

impl AssetsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<Asset>> {
        self.repository.assets.list(include_inactive).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Asset> {
        self.repository.assets.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateAsset) -> AppResult<Asset> {
        self.repository.reference.get_category(data.category_id).await?;
        self.repository.assets.create(data).await
    }

    pub async fn update(&self, id: i32, data: &UpdateAsset) -> AppResult<Asset> {
        if let Some(category_id) = data.category_id {
            self.repository.reference.get_category(category_id).await?;
        }
        self.repository.assets.update(id, data).await
    }

    pub async fn deactivate(&self, id: i32) -> AppResult<()> {
        self.repository.assets.deactivate(id).await
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repository.reference.list_categories().await
    }

    pub async fn create_category(&self, data: &CreateCategory) -> AppResult<Category> {
        self.repository.reference.create_category(data).await
    }

    pub async fn list_locations(&self) -> AppResult<Vec<Location>> {
        self.repository.reference.list_locations().await
    }

    pub async fn create_location(&self, data: &CreateLocation) -> AppResult<Location> {
        self.repository.reference.create_location(data).await
    }
}
