//! Asset and reference-data endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::{
        asset::{Asset, CreateAsset, UpdateAsset},
        reference::{Category, CreateCategory, CreateLocation, Location},
    },
};

use super::validate_body;

/// Asset list filter
#[derive(Deserialize, IntoParams)]
pub struct AssetListQuery {
    /// Include deactivated assets
    #[serde(default)]
    pub include_inactive: bool,
}

/// List assets
#[utoipa::path(
    get,
    path = "/assets",
    tag = "assets",
    params(AssetListQuery),
    responses(
        (status = 200, description = "Assets ordered by name", body = Vec<Asset>)
    )
)]
pub async fn list_assets(
    State(state): State<crate::AppState>,
    Query(query): Query<AssetListQuery>,
) -> AppResult<Json<Vec<Asset>>> {
    let assets = state.services.assets.list(query.include_inactive).await?;
    Ok(Json(assets))
}

/// Get an asset
#[utoipa::path(
    get,
    path = "/assets/{id}",
    tag = "assets",
    params(("id" = i32, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset", body = Asset),
        (status = 404, description = "Asset not found")
    )
)]
pub async fn get_asset(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Asset>> {
    let asset = state.services.assets.get_by_id(id).await?;
    Ok(Json(asset))
}

/// Create an asset
#[utoipa::path(
    post,
    path = "/assets",
    tag = "assets",
    request_body = CreateAsset,
    responses(
        (status = 201, description = "Asset created", body = Asset),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn create_asset(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateAsset>,
) -> AppResult<(StatusCode, Json<Asset>)> {
    validate_body(&request)?;
    let asset = state.services.assets.create(&request).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

/// Update an asset
#[utoipa::path(
    put,
    path = "/assets/{id}",
    tag = "assets",
    request_body = UpdateAsset,
    params(("id" = i32, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset updated", body = Asset),
        (status = 404, description = "Asset not found"),
        (status = 409, description = "Total units below issued stock")
    )
)]
pub async fn update_asset(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateAsset>,
) -> AppResult<Json<Asset>> {
    validate_body(&request)?;
    let asset = state.services.assets.update(id, &request).await?;
    Ok(Json(asset))
}

/// Deactivate an asset
#[utoipa::path(
    delete,
    path = "/assets/{id}",
    tag = "assets",
    params(("id" = i32, Path, description = "Asset ID")),
    responses(
        (status = 204, description = "Asset deactivated"),
        (status = 404, description = "Asset not found")
    )
)]
pub async fn deactivate_asset(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.assets.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "reference",
    responses(
        (status = 200, description = "Categories", body = Vec<Category>)
    )
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Category>>> {
    let categories = state.services.assets.list_categories().await?;
    Ok(Json(categories))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "reference",
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category)
    )
)]
pub async fn create_category(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    validate_body(&request)?;
    let category = state.services.assets.create_category(&request).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// List locations
#[utoipa::path(
    get,
    path = "/locations",
    tag = "reference",
    responses(
        (status = 200, description = "Locations", body = Vec<Location>)
    )
)]
pub async fn list_locations(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Location>>> {
    let locations = state.services.assets.list_locations().await?;
    Ok(Json(locations))
}

/// Create a location
#[utoipa::path(
    post,
    path = "/locations",
    tag = "reference",
    request_body = CreateLocation,
    responses(
        (status = 201, description = "Location created", body = Location)
    )
)]
pub async fn create_location(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateLocation>,
) -> AppResult<(StatusCode, Json<Location>)> {
    validate_body(&request)?;
    let location = state.services.assets.create_location(&request).await?;
    Ok((StatusCode::CREATED, Json(location)))
}
