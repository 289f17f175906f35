use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, warn};

use crate::error::CelebrateError;
use crate::middleware::{auth::RequireAdmin, json::ValidJson};
use crate::router::MarketState;
use crate::service::image_store::ImageKind;
use crate::types::category::{
    AddCategoryRequest, CategoryCreated, CategoryDeleted, CategoryEnvelope, CategoryList,
    DeleteCategoryQuery,
};
use crate::types::image::{ImageOutcome, ImageRemoval};
use crate::types::parse_id;

/// POST /api/admin/category/add
pub async fn add_category(
    State(state): State<MarketState>,
    RequireAdmin(admin): RequireAdmin,
    ValidJson(req): ValidJson<AddCategoryRequest>,
) -> Result<impl IntoResponse, CelebrateError> {
    let name = req.category_name.unwrap_or_default().trim().to_string();
    if state.storage.category_name_taken(&name).await? {
        info!(category = %name, "category rejected: name already taken");
        return Err(CelebrateError::CategoryExists);
    }

    // An image that fails to decode or write is reported, the category is still created.
    let (stored, outcome) = match req.image {
        None => (None, None),
        Some(upload) => match state.images.save(ImageKind::Category, &upload).await {
            Ok(image) => {
                let outcome = ImageOutcome::stored(0, &image);
                (Some(image), Some(outcome))
            }
            Err(e) => {
                warn!(category = %name, error = %e, "category image not stored");
                (None, Some(ImageOutcome::failed(0, &e)))
            }
        },
    };

    let description = req.description.unwrap_or_default();
    let category = state
        .storage
        .insert_category(&name, description.trim(), stored.as_ref())
        .await?;
    info!(id = category.id, admin = admin.id, "category created");

    Ok((
        StatusCode::CREATED,
        Json(CategoryCreated {
            message: "Category added successfully",
            category,
            image: outcome,
        }),
    ))
}

/// GET /api/admin/category/fetch
pub async fn fetch_categories(
    State(state): State<MarketState>,
) -> Result<Json<CategoryList>, CelebrateError> {
    let categories = state.storage.list_categories().await?;
    let count = state.storage.count_categories().await?;
    Ok(Json(CategoryList { categories, count }))
}

/// GET /api/admin/category/{id}
pub async fn get_category(
    State(state): State<MarketState>,
    Path(id): Path<String>,
) -> Result<Json<CategoryEnvelope>, CelebrateError> {
    let id = parse_id(&id, "category")?;
    let category = state
        .storage
        .get_category(id)
        .await?
        .ok_or(CelebrateError::NotFound("Category"))?;
    Ok(Json(CategoryEnvelope { category }))
}

/// DELETE /api/admin/category/delete?id=
///
/// The backing image goes first; its removal is best effort and only reported.
pub async fn delete_category(
    State(state): State<MarketState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<DeleteCategoryQuery>,
) -> Result<Json<CategoryDeleted>, CelebrateError> {
    let raw = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| CelebrateError::MissingFields(vec!["id"]))?;
    let id = parse_id(&raw, "category")?;

    let Some(category) = state.storage.get_category(id).await? else {
        info!(id, "category delete: not found");
        return Err(CelebrateError::NotFound("Category"));
    };

    let image = match &category.image {
        Some(stored) => state.images.remove(&stored.url).await,
        None => ImageRemoval::None,
    };

    if !state.storage.delete_category(id).await? {
        return Err(CelebrateError::NotFound("Category"));
    }
    info!(id, admin = admin.id, image = ?image, "category deleted");

    Ok(Json(CategoryDeleted {
        message: "Category deleted successfully",
        image,
    }))
}
