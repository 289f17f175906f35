use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use base64::Engine;
use chrono::{Duration, Utc};
use rand::Rng;
use tracing::{info, warn};

use crate::db::MarketStorage;
use crate::error::CelebrateError;
use crate::types::auth::{UserType, UserView};

pub const ADMIN_COOKIE: &str = "admin-token";

/// Session lifetime and cookie flags.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub ttl: Duration,
    pub secure_cookie: bool,
}

/// 32 random bytes, URL-safe base64 without padding.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Persist a fresh session for `user_id` and return the jar carrying its cookie.
pub async fn open_session(
    storage: &MarketStorage,
    settings: SessionSettings,
    jar: PrivateCookieJar,
    user_id: i64,
) -> Result<PrivateCookieJar, CelebrateError> {
    let token = generate_token();
    storage
        .insert_session(&token, user_id, Utc::now() + settings.ttl)
        .await?;
    info!(user_id, "admin session opened");
    Ok(jar.add(session_cookie(token, settings)))
}

/// Drop the server-side session (if any) and clear the cookie.
pub async fn close_session(
    storage: &MarketStorage,
    jar: PrivateCookieJar,
) -> Result<PrivateCookieJar, CelebrateError> {
    if let Some(token) = jar.get(ADMIN_COOKIE).map(|c| c.value().to_owned()) {
        storage.delete_session(&token).await?;
        info!("admin session closed");
    }
    Ok(jar.remove(clear_cookie()))
}

/// Resolve the admin behind the request's cookie.
///
/// `Ok(None)` covers every "not an admin" outcome (no cookie, cookie that fails
/// to decrypt, expired or unknown session, user gone, wrong role); the caller
/// picks the rejection.
pub async fn current_admin(
    storage: &MarketStorage,
    jar: &PrivateCookieJar,
) -> Result<Option<UserView>, CelebrateError> {
    let Some(token) = jar.get(ADMIN_COOKIE).map(|c| c.value().to_owned()) else {
        return Ok(None);
    };
    let Some(session) = storage.load_session(&token).await? else {
        return Ok(None);
    };
    let Some(user) = storage.get_user(session.user_id).await? else {
        warn!(user_id = session.user_id, "session points at a missing user");
        return Ok(None);
    };
    if user.user_type != UserType::Admin {
        warn!(user_id = user.id, "session holder is not an admin");
        return Ok(None);
    }
    Ok(Some(user.into()))
}

fn session_cookie(token: String, settings: SessionSettings) -> Cookie<'static> {
    Cookie::build(Cookie::new(ADMIN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(settings.secure_cookie)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(settings.ttl.num_seconds()))
        .build()
}

fn clear_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(ADMIN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
