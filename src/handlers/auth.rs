use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::{info, warn};

use crate::db::DbUser;
use crate::db::models::NewUser;
use crate::error::CelebrateError;
use crate::middleware::{auth::RequireAdmin, json::ValidJson};
use crate::router::MarketState;
use crate::service::password::{hash_password, verify_password};
use crate::service::session::{close_session, current_admin, open_session};
use crate::types::Validate;
use crate::types::auth::{
    AuthCheck, AuthOutput, LoginRequest, Message, RegisterRequest, UserList, UserType, UserView,
};

/// POST /api/admin/auth/register
///
/// Registering a `user` is open. Registering an `admin` needs an admin session
/// once the first admin exists.
pub async fn register(
    State(state): State<MarketState>,
    jar: PrivateCookieJar,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<impl IntoResponse, CelebrateError> {
    let (Some(contact_num), Some(user_type)) = (req.contact_num, req.user_type) else {
        return Err(CelebrateError::MissingFields(req.missing_fields()));
    };
    if user_type == UserType::Admin
        && state.storage.any_user_of_type(UserType::Admin).await?
        && current_admin(&state.storage, &jar).await?.is_none()
    {
        warn!("admin registration refused without an admin session");
        return Err(CelebrateError::Unauthenticated(
            "Only an admin can register another admin",
        ));
    }

    if state.storage.contact_num_taken(contact_num).await? {
        info!(contact_num, "registration rejected: contact number taken");
        return Err(CelebrateError::UserExists);
    }

    let hashed = hash_password(req.password.unwrap_or_default(), state.bcrypt_cost).await?;
    let user = state
        .storage
        .insert_user(NewUser {
            contact_num,
            username: req.username.unwrap_or_default().trim().to_string(),
            email: req.email.unwrap_or_default().trim().to_string(),
            hashed_pass: hashed.hash,
            salt_pass: hashed.salt,
            user_type,
        })
        .await?;
    info!(id = user.id, user_type = %user.user_type, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthOutput {
            message: "User Registered Successfully",
            output: user.into(),
        }),
    ))
}

/// POST /api/admin/auth/login
///
/// On success the response carries a fresh `admin-token` session cookie.
pub async fn admin_login(
    State(state): State<MarketState>,
    jar: PrivateCookieJar,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<impl IntoResponse, CelebrateError> {
    let user = authenticate(&state, req).await?;
    if user.user_type != UserType::Admin {
        warn!(id = user.id, "admin login by a non-admin account");
        return Err(CelebrateError::RoleMismatch);
    }

    let jar = open_session(&state.storage, state.sessions, jar, user.id).await?;
    info!(id = user.id, "admin logged in");
    Ok((
        jar,
        Json(AuthOutput {
            message: "User authenticated",
            output: user.into(),
        }),
    ))
}

/// POST /api/user/auth/login
///
/// Same checks as the admin login, without a session.
pub async fn user_login(
    State(state): State<MarketState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<Json<AuthOutput>, CelebrateError> {
    let user = authenticate(&state, req).await?;
    info!(id = user.id, "user logged in");
    Ok(Json(AuthOutput {
        message: "User authenticated",
        output: user.into(),
    }))
}

/// Unknown email, wrong password and wrong role are three distinct failures.
async fn authenticate(state: &MarketState, req: LoginRequest) -> Result<DbUser, CelebrateError> {
    let email = req.email.unwrap_or_default();
    let Some(user) = state.storage.find_user_by_email(email.trim()).await? else {
        info!("login rejected: unknown email");
        return Err(CelebrateError::UserNotFound);
    };

    if !verify_password(req.password.unwrap_or_default(), user.hashed_pass.clone()).await? {
        info!(id = user.id, "login rejected: wrong password");
        return Err(CelebrateError::InvalidCredentials);
    }

    if req.user_type.as_deref().map(str::trim) != Some(user.user_type.as_str()) {
        info!(id = user.id, "login rejected: role mismatch");
        return Err(CelebrateError::RoleMismatch);
    }
    Ok(user)
}

/// GET /api/admin/auth/check
pub async fn check(
    State(state): State<MarketState>,
    jar: PrivateCookieJar,
) -> Result<Json<AuthCheck>, CelebrateError> {
    let admin = current_admin(&state.storage, &jar)
        .await?
        .ok_or(CelebrateError::Unauthenticated("Not authenticated"))?;
    Ok(Json(AuthCheck {
        authenticated: true,
        user: (&admin).into(),
    }))
}

/// POST /api/admin/logout
pub async fn logout(
    State(state): State<MarketState>,
    jar: PrivateCookieJar,
) -> Result<impl IntoResponse, CelebrateError> {
    let jar = close_session(&state.storage, jar).await?;
    Ok((
        jar,
        Json(Message {
            message: "Logged out successfully",
        }),
    ))
}

/// GET /api/user/fetch
pub async fn list_users(
    State(state): State<MarketState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<UserList>, CelebrateError> {
    let output = state
        .storage
        .list_users()
        .await?
        .into_iter()
        .map(UserView::from)
        .collect();
    Ok(Json(UserList {
        message: "Fetched All Users",
        output,
    }))
}
