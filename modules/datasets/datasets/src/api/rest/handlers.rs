use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use modkit_errors::{ApiResult, ErrorBody, JsonBody, QueryParams};
use tracing::info;

use super::dto::{
    CreateDatasetReq, DatasetEnvelope, DatasetListResponse, DatasetMessageEnvelope,
    ListDatasetsQuery, MessageResponse, UpdateDatasetReq,
};
use super::routes::ConcreteService;

/// List datasets
#[utoipa::path(
    get,
    path = "/api/datasets",
    tag = "Datasets",
    params(ListDatasetsQuery),
    responses(
        (status = 200, description = "One page of datasets", body = DatasetListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_datasets(
    Extension(svc): Extension<Arc<ConcreteService>>,
    QueryParams(query): QueryParams<ListDatasetsQuery>,
) -> ApiResult<Json<DatasetListResponse>> {
    let page = svc
        .list_datasets(query.filter(), query.page_request())
        .await?;
    Ok(Json(DatasetListResponse {
        datasets: page.items.into_iter().map(Into::into).collect(),
        total: page.total,
        page: page.page,
        per_page: page.per_page,
        pages: page.pages,
    }))
}

/// Get a dataset by id
#[utoipa::path(
    get,
    path = "/api/datasets/{dataset_id}",
    tag = "Datasets",
    params(("dataset_id" = String, Path, description = "Dataset id")),
    responses(
        (status = 200, description = "The dataset", body = DatasetEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Dataset not found", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_dataset(
    Extension(svc): Extension<Arc<ConcreteService>>,
    Path(dataset_id): Path<String>,
) -> ApiResult<Json<DatasetEnvelope>> {
    let dataset = svc.get_dataset(&dataset_id).await?;
    Ok(Json(DatasetEnvelope {
        dataset: dataset.into(),
    }))
}

/// Register a dataset
#[utoipa::path(
    post,
    path = "/api/datasets",
    tag = "Datasets",
    request_body = CreateDatasetReq,
    responses(
        (status = 201, description = "Dataset created", body = DatasetMessageEnvelope),
        (status = 400, description = "Missing field, duplicate id or unknown upstream ids", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_dataset(
    Extension(svc): Extension<Arc<ConcreteService>>,
    JsonBody(req): JsonBody<CreateDatasetReq>,
) -> ApiResult<impl IntoResponse> {
    let created = svc.create_dataset(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(DatasetMessageEnvelope {
            message: "Dataset created successfully".to_owned(),
            dataset: created.into(),
        }),
    ))
}

/// Partially update a dataset
#[utoipa::path(
    put,
    path = "/api/datasets/{dataset_id}",
    tag = "Datasets",
    params(("dataset_id" = String, Path, description = "Dataset id")),
    request_body = UpdateDatasetReq,
    responses(
        (status = 200, description = "Dataset updated", body = DatasetMessageEnvelope),
        (status = 400, description = "Unknown upstream ids", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Dataset not found", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_dataset(
    Extension(svc): Extension<Arc<ConcreteService>>,
    Path(dataset_id): Path<String>,
    JsonBody(req): JsonBody<UpdateDatasetReq>,
) -> ApiResult<Json<DatasetMessageEnvelope>> {
    let updated = svc.update_dataset(&dataset_id, req.into()).await?;
    Ok(Json(DatasetMessageEnvelope {
        message: "Dataset updated successfully".to_owned(),
        dataset: updated.into(),
    }))
}

/// Delete a dataset
///
/// Datasets that list it upstream keep the dangling id.
#[utoipa::path(
    delete,
    path = "/api/datasets/{dataset_id}",
    tag = "Datasets",
    params(("dataset_id" = String, Path, description = "Dataset id")),
    responses(
        (status = 200, description = "Dataset deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Dataset not found", body = ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_dataset(
    Extension(svc): Extension<Arc<ConcreteService>>,
    Path(dataset_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    svc.delete_dataset(&dataset_id).await?;
    info!(%dataset_id, "dataset removed via REST");
    Ok(Json(MessageResponse {
        message: "Dataset deleted successfully".to_owned(),
    }))
}
