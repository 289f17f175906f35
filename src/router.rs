use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    routing::{delete, get, post},
};
use axum_extra::extract::cookie::Key;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::Config;
use crate::db::MarketStorage;
use crate::handlers::{auth, category, contact, inclusion, package, storefront};
use crate::service::image_store::ImageStore;
use crate::service::mailer::Mailer;
use crate::service::session::SessionSettings;

/// Handles every request handler can reach. Built once in `main` (or a test) and injected.
#[derive(Clone)]
pub struct MarketState {
    pub storage: MarketStorage,
    pub images: ImageStore,
    pub mailer: Arc<dyn Mailer>,
    pub cookie_key: Key,
    pub sessions: SessionSettings,
    pub bcrypt_cost: u32,
    pub placeholder_image: Arc<str>,
    pub body_limit: usize,
}

impl MarketState {
    pub fn new(
        cfg: &Config,
        storage: MarketStorage,
        mailer: Arc<dyn Mailer>,
        cookie_key: Key,
    ) -> Self {
        Self {
            storage,
            images: ImageStore::new(&cfg.storage.upload_dir, &cfg.storage.public_prefix),
            mailer,
            cookie_key,
            sessions: SessionSettings {
                ttl: chrono::Duration::hours(cfg.basic.session_ttl_hours),
                secure_cookie: !cfg.basic.insecure_cookie,
            },
            bcrypt_cost: cfg.basic.bcrypt_cost,
            placeholder_image: Arc::from(cfg.storage.placeholder_image.as_str()),
            body_limit: cfg.basic.body_limit_bytes,
        }
    }
}

impl FromRef<MarketState> for Key {
    fn from_ref(state: &MarketState) -> Self {
        state.cookie_key.clone()
    }
}

pub fn market_router(state: MarketState) -> Router {
    let uploads = ServeDir::new(state.images.root());
    let uploads_prefix = state.images.public_prefix().to_string();
    let body_limit = state.body_limit;

    let api = Router::new()
        // auth
        .route("/admin/auth/register", post(auth::register))
        .route("/admin/auth/login", post(auth::admin_login))
        .route("/admin/auth/check", get(auth::check))
        .route("/admin/logout", post(auth::logout))
        .route("/user/auth/login", post(auth::user_login))
        .route("/user/fetch", get(auth::list_users))
        // categories
        .route("/admin/category/add", post(category::add_category))
        .route("/admin/category/fetch", get(category::fetch_categories))
        .route("/admin/category/delete", delete(category::delete_category))
        .route("/admin/category/{id}", get(category::get_category))
        // packages
        .route("/admin/package/add", post(package::add_package))
        .route("/admin/package/fetch", get(package::fetch_packages))
        .route("/admin/package/{id}", get(package::get_package))
        // inclusions
        .route("/admin/inclusions/add", post(inclusion::add_inclusion))
        .route("/admin/inclusions/fetch", get(inclusion::fetch_inclusions))
        .route("/admin/inclusions/delete", post(inclusion::delete_inclusion))
        .route(
            "/admin/inclusions/package/{package_id}",
            get(inclusion::inclusions_for_package),
        )
        .route("/admin/inclusions/{id}", get(inclusion::get_inclusion))
        // storefront
        .route("/packages", get(storefront::list_packages))
        .route("/contact", post(contact::submit_contact));

    Router::new()
        .nest("/api", api)
        .nest_service(&uploads_prefix, uploads)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
