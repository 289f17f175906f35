use axum::{
    Json,
    extract::{Query, State},
};
use tracing::debug;

use crate::error::CelebrateError;
use crate::router::MarketState;
use crate::types::package::{StorefrontPackage, StorefrontQuery};

/// GET /api/packages?category=
///
/// `category` is matched exactly against category names. `all`, an empty
/// value or no parameter lists everything, and so does a name that matches
/// no category.
pub async fn list_packages(
    State(state): State<MarketState>,
    Query(query): Query<StorefrontQuery>,
) -> Result<Json<Vec<StorefrontPackage>>, CelebrateError> {
    let filter = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "all");

    let category_id = match filter {
        Some(name) => {
            let found = state.storage.find_category_id_by_name(name).await?;
            if found.is_none() {
                debug!(category = %name, "unknown storefront category, listing all packages");
            }
            found
        }
        None => None,
    };

    let packages = match category_id {
        Some(id) => state.storage.list_packages_in_category(id).await?,
        None => state.storage.list_packages().await?,
    };

    Ok(Json(
        packages
            .into_iter()
            .map(|pkg| StorefrontPackage::from_package(pkg, &state.placeholder_image))
            .collect(),
    ))
}
