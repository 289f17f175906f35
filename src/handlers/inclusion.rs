use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use crate::error::CelebrateError;
use crate::middleware::{auth::RequireAdmin, json::ValidJson};
use crate::router::MarketState;
use crate::types::auth::Message;
use crate::types::inclusion::{
    AddInclusionRequest, DeleteInclusionRequest, Inclusion, InclusionCreated,
    InclusionWithPackage,
};
use crate::types::parse_id;

/// POST /api/admin/inclusions/add
///
/// No duplicate check: a package may collect several inclusion records.
pub async fn add_inclusion(
    State(state): State<MarketState>,
    RequireAdmin(admin): RequireAdmin,
    ValidJson(req): ValidJson<AddInclusionRequest>,
) -> Result<impl IntoResponse, CelebrateError> {
    let package_id = req
        .package_id
        .as_ref()
        .ok_or_else(|| CelebrateError::MissingFields(vec!["packageId"]))?
        .resolve("package")?;
    if !state.storage.package_exists(package_id).await? {
        info!(package_id, "inclusion rejected: unknown package");
        return Err(CelebrateError::NotFound("Package"));
    }

    let points = req.points.unwrap_or_default();
    let inclusion = state.storage.insert_inclusion(package_id, &points).await?;
    info!(
        id = inclusion.id,
        package_id,
        points = points.len(),
        admin = admin.id,
        "inclusion created"
    );

    Ok((
        StatusCode::CREATED,
        Json(InclusionCreated {
            message: "Inclusion added successfully",
            inclusion,
        }),
    ))
}

/// GET /api/admin/inclusions/fetch
pub async fn fetch_inclusions(
    State(state): State<MarketState>,
) -> Result<Json<Vec<InclusionWithPackage>>, CelebrateError> {
    Ok(Json(state.storage.list_inclusions().await?))
}

/// GET /api/admin/inclusions/{id}
pub async fn get_inclusion(
    State(state): State<MarketState>,
    Path(id): Path<String>,
) -> Result<Json<InclusionWithPackage>, CelebrateError> {
    let id = parse_id(&id, "inclusion")?;
    let inclusion = state
        .storage
        .get_inclusion_with_package(id)
        .await?
        .ok_or(CelebrateError::NotFound("Inclusion"))?;
    Ok(Json(inclusion))
}

/// GET /api/admin/inclusions/package/{package_id}
pub async fn inclusions_for_package(
    State(state): State<MarketState>,
    Path(package_id): Path<String>,
) -> Result<Json<Vec<Inclusion>>, CelebrateError> {
    let package_id = parse_id(&package_id, "package")?;
    Ok(Json(
        state.storage.list_inclusions_for_package(package_id).await?,
    ))
}

/// POST /api/admin/inclusions/delete
pub async fn delete_inclusion(
    State(state): State<MarketState>,
    RequireAdmin(admin): RequireAdmin,
    ValidJson(req): ValidJson<DeleteInclusionRequest>,
) -> Result<Json<Message>, CelebrateError> {
    let id = req
        .id
        .as_ref()
        .ok_or_else(|| CelebrateError::MissingFields(vec!["id"]))?
        .resolve("inclusion")?;

    if !state.storage.delete_inclusion(id).await? {
        info!(id, "inclusion delete: not found");
        return Err(CelebrateError::NotFound("Inclusion"));
    }
    info!(id, admin = admin.id, "inclusion deleted");
    Ok(Json(Message {
        message: "Inclusion deleted successfully",
    }))
}
