use std::sync::Arc;

use axum::Json;
use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use modkit_auth::axum_ext::CurrentUser;
use modkit_errors::{ApiResult, ErrorBody, JsonBody};

use super::dto::{
    LoginReq, RegisterReq, SessionResponse, UpdateProfileReq, UserEnvelope, UserMessageEnvelope,
};
use super::routes::ConcreteService;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "User registered", body = SessionResponse),
        (status = 400, description = "Missing field or duplicate username/email", body = ErrorBody),
        (status = 429, description = "Rate limited", body = ErrorBody),
    )
)]
pub async fn register(
    Extension(svc): Extension<Arc<ConcreteService>>,
    JsonBody(req): JsonBody<RegisterReq>,
) -> ApiResult<impl IntoResponse> {
    let session = svc.register(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse::new("User registered successfully", session)),
    ))
}

/// Log in with username or email
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Logged in", body = SessionResponse),
        (status = 400, description = "Missing credentials", body = ErrorBody),
        (status = 401, description = "Invalid username or password", body = ErrorBody),
        (status = 403, description = "Account inactive", body = ErrorBody),
        (status = 429, description = "Rate limited", body = ErrorBody),
    )
)]
pub async fn login(
    Extension(svc): Extension<Arc<ConcreteService>>,
    JsonBody(req): JsonBody<LoginReq>,
) -> ApiResult<Json<SessionResponse>> {
    let session = svc
        .authenticate(
            req.username.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(SessionResponse::new("Login successful", session)))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = "Auth",
    responses(
        (status = 200, description = "Profile", body = UserEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    Extension(svc): Extension<Arc<ConcreteService>>,
    CurrentUser(user_id): CurrentUser,
) -> ApiResult<Json<UserEnvelope>> {
    let user = svc.get_profile(user_id).await?;
    Ok(Json(UserEnvelope { user: user.into() }))
}

/// Update the current user's profile
#[utoipa::path(
    put,
    path = "/api/auth/profile",
    tag = "Auth",
    request_body = UpdateProfileReq,
    responses(
        (status = 200, description = "Profile updated", body = UserMessageEnvelope),
        (status = 400, description = "Email already in use", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    Extension(svc): Extension<Arc<ConcreteService>>,
    CurrentUser(user_id): CurrentUser,
    JsonBody(req): JsonBody<UpdateProfileReq>,
) -> ApiResult<Json<UserMessageEnvelope>> {
    let user = svc.update_profile(user_id, req.into()).await?;
    Ok(Json(UserMessageEnvelope {
        message: "Profile updated successfully".to_owned(),
        user: user.into(),
    }))
}
