use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Key, PrivateCookieJar};

use crate::error::CelebrateError;
use crate::router::MarketState;
use crate::service::session::current_admin;
use crate::types::auth::UserView;

/// Guard for admin write endpoints: the request must carry a live admin session.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub UserView);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    MarketState: FromRef<S>,
    Key: FromRef<S>,
{
    type Rejection = CelebrateError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::<Key>::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };
        let market = MarketState::from_ref(state);
        current_admin(&market.storage, &jar)
            .await?
            .map(RequireAdmin)
            .ok_or(CelebrateError::Unauthenticated("Not authenticated"))
    }
}
