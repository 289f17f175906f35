use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use futures::future::join_all;
use tracing::{info, warn};

use crate::error::CelebrateError;
use crate::middleware::{auth::RequireAdmin, json::ValidJson};
use crate::router::MarketState;
use crate::service::image_store::{ImageKind, ImageStore};
use crate::types::image::{ImageOutcome, ImageUpload, StoredImage};
use crate::types::package::{AddPackageRequest, NewPackage, Package, PackageCreated, PackageList};
use crate::types::parse_id;

/// POST /api/admin/package/add
pub async fn add_package(
    State(state): State<MarketState>,
    RequireAdmin(admin): RequireAdmin,
    ValidJson(req): ValidJson<AddPackageRequest>,
) -> Result<impl IntoResponse, CelebrateError> {
    let category_id = req
        .category_id
        .as_ref()
        .ok_or_else(|| CelebrateError::MissingFields(vec!["CategoryId"]))?
        .resolve("category")?;
    if state.storage.get_category(category_id).await?.is_none() {
        info!(category_id, "package rejected: unknown category");
        return Err(CelebrateError::NotFound("Category"));
    }

    let (images, outcomes) = store_images(&state.images, &req.images).await;
    let failed = outcomes.len() - images.len();
    if failed > 0 {
        warn!(failed, total = outcomes.len(), "package created with a partial image set");
    }

    let text = |value: Option<String>| value.unwrap_or_default().trim().to_string();
    let package = state
        .storage
        .insert_package(NewPackage {
            category_id,
            package_name: text(req.package_name),
            package_desc: text(req.package_desc),
            price: text(req.price),
            discount_price: text(req.discount_price),
            package_review: text(req.package_review),
            experience: text(req.experience),
            location: text(req.location),
            policy: req.policy,
            need_to_know: req.need_to_know,
            images,
        })
        .await?;
    info!(id = package.id, category_id, admin = admin.id, "package created");

    Ok((
        StatusCode::CREATED,
        Json(PackageCreated {
            message: "Package added successfully",
            success: true,
            package,
            images: outcomes,
        }),
    ))
}

/// Decode and write every upload concurrently. Failed uploads are left out of
/// the returned images and reported at their index.
async fn store_images(
    store: &ImageStore,
    uploads: &[ImageUpload],
) -> (Vec<StoredImage>, Vec<ImageOutcome>) {
    let results = join_all(
        uploads
            .iter()
            .map(|upload| store.save(ImageKind::Package, upload)),
    )
    .await;

    let mut images = Vec::with_capacity(results.len());
    let mut outcomes = Vec::with_capacity(results.len());
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(image) => {
                outcomes.push(ImageOutcome::stored(index, &image));
                images.push(image);
            }
            Err(e) => {
                warn!(index, error = %e, "package image not stored");
                outcomes.push(ImageOutcome::failed(index, &e));
            }
        }
    }
    (images, outcomes)
}

/// GET /api/admin/package/fetch
///
/// Query parameters (the admin panel sends `categoryId`) are ignored.
pub async fn fetch_packages(
    State(state): State<MarketState>,
) -> Result<Json<PackageList>, CelebrateError> {
    let packages = state.storage.list_packages().await?;
    Ok(Json(PackageList {
        count: packages.len(),
        packages,
    }))
}

/// GET /api/admin/package/{id}
pub async fn get_package(
    State(state): State<MarketState>,
    Path(id): Path<String>,
) -> Result<Json<Package>, CelebrateError> {
    let id = parse_id(&id, "package")?;
    let package = state
        .storage
        .get_package(id)
        .await?
        .ok_or(CelebrateError::NotFound("Package"))?;
    Ok(Json(package))
}
