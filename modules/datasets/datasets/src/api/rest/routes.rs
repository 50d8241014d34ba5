use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router, middleware};
use modkit_auth::TokenValidator;
use modkit_auth::axum_ext::{BearerAuthState, require_bearer};
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use crate::domain::service::DatasetsService;
use crate::infra::storage::OrmDatasetsRepository;

/// Type alias for the concrete service type.
pub type ConcreteService = DatasetsService<OrmDatasetsRepository>;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_datasets,
        handlers::get_dataset,
        handlers::create_dataset,
        handlers::update_dataset,
        handlers::delete_dataset,
    ),
    components(schemas(
        dto::DatasetDto,
        dto::CreateDatasetReq,
        dto::UpdateDatasetReq,
        dto::DatasetListResponse,
        dto::DatasetEnvelope,
        dto::DatasetMessageEnvelope,
        dto::MessageResponse,
        modkit_errors::ErrorBody,
    )),
    tags((name = "Datasets", description = "Dataset Registry"))
)]
pub struct DatasetsApiDoc;

/// Every dataset route requires a bearer token.
pub fn register_routes(
    router: Router,
    service: Arc<ConcreteService>,
    validator: Arc<dyn TokenValidator>,
) -> Router {
    let datasets = Router::new()
        .route(
            "/api/datasets",
            get(handlers::list_datasets).post(handlers::create_dataset),
        )
        .route(
            "/api/datasets/{dataset_id}",
            get(handlers::get_dataset)
                .put(handlers::update_dataset)
                .delete(handlers::delete_dataset),
        )
        .route_layer(middleware::from_fn_with_state(
            BearerAuthState::new(validator),
            require_bearer,
        ))
        .layer(Extension(service));

    router.merge(datasets)
}
