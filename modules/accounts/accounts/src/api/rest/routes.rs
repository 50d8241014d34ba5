use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router, middleware};
use modkit_auth::TokenValidator;
use modkit_auth::axum_ext::{BearerAuthState, require_bearer};
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use crate::domain::service::AccountsService;
use crate::infra::storage::OrmUsersRepository;

/// Type alias for the concrete service type.
pub type ConcreteService = AccountsService<OrmUsersRepository>;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register,
        handlers::login,
        handlers::get_profile,
        handlers::update_profile,
    ),
    components(schemas(
        dto::UserDto,
        dto::RegisterReq,
        dto::LoginReq,
        dto::UpdateProfileReq,
        dto::SessionResponse,
        dto::UserEnvelope,
        dto::UserMessageEnvelope,
        modkit_errors::ErrorBody,
    )),
    tags((name = "Auth", description = "User registration, login and profile"))
)]
pub struct AccountsApiDoc;

/// Register and login are public; the profile routes require a bearer token.
pub fn register_routes(
    router: Router,
    service: Arc<ConcreteService>,
    validator: Arc<dyn TokenValidator>,
) -> Router {
    let public = Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login));

    let protected = Router::new()
        .route(
            "/api/auth/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route_layer(middleware::from_fn_with_state(
            BearerAuthState::new(validator),
            require_bearer,
        ));

    router.merge(public.merge(protected).layer(Extension(service)))
}
