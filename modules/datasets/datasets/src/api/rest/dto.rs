use datasets_sdk::{Dataset, DatasetFilter, DatasetPatch, NewDataset, PageRequest};
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};

/// REST DTO for a dataset.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DatasetDto {
    pub dataset_id: String,
    pub dataset_name: String,
    pub dataset_type: String,
    pub layer: String,
    pub upstream_dependencies: Vec<String>,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_ts: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_ts: OffsetDateTime,
}

impl From<Dataset> for DatasetDto {
    fn from(d: Dataset) -> Self {
        Self {
            dataset_id: d.dataset_id,
            dataset_name: d.dataset_name,
            dataset_type: d.dataset_type,
            layer: d.layer,
            upstream_dependencies: d.upstream_dependencies,
            status: d.status,
            created_ts: d.created_ts,
            updated_ts: d.updated_ts,
        }
    }
}

/// Body of `POST /api/datasets`.
///
/// Every field is optional on the wire so that a missing one is reported as
/// `"<field> is required"` rather than as a JSON shape error.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateDatasetReq {
    pub dataset_id: Option<String>,
    pub dataset_name: Option<String>,
    pub dataset_type: Option<String>,
    pub layer: Option<String>,
    pub upstream_dependencies: Option<Vec<String>>,
    /// Defaults to `active`.
    pub status: Option<String>,
}

impl From<CreateDatasetReq> for NewDataset {
    fn from(req: CreateDatasetReq) -> Self {
        Self {
            dataset_id: req.dataset_id.unwrap_or_default(),
            dataset_name: req.dataset_name.unwrap_or_default(),
            dataset_type: req.dataset_type.unwrap_or_default(),
            layer: req.layer.unwrap_or_default(),
            upstream_dependencies: req.upstream_dependencies.unwrap_or_default(),
            status: req.status,
        }
    }
}

/// Body of `PUT /api/datasets/{dataset_id}`. Absent or `null` scalar fields
/// are left unchanged; `upstream_dependencies: null` clears the list.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateDatasetReq {
    pub dataset_name: Option<String>,
    pub dataset_type: Option<String>,
    pub layer: Option<String>,
    #[serde(deserialize_with = "present")]
    #[schema(value_type = Option<Vec<String>>)]
    pub upstream_dependencies: Option<Option<Vec<String>>>,
    pub status: Option<String>,
}

// Distinguishes a key sent as `null` from one that was never sent.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl From<UpdateDatasetReq> for DatasetPatch {
    fn from(req: UpdateDatasetReq) -> Self {
        Self {
            dataset_name: req.dataset_name,
            dataset_type: req.dataset_type,
            layer: req.layer,
            upstream_dependencies: req.upstream_dependencies.map(Option::unwrap_or_default),
            status: req.status,
        }
    }
}

/// Query string of `GET /api/datasets`.
///
/// Paging values that are not positive integers fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListDatasetsQuery {
    pub status: Option<String>,
    pub dataset_type: Option<String>,
    pub layer: Option<String>,
    #[param(value_type = Option<u64>, minimum = 1)]
    pub page: Option<String>,
    #[param(value_type = Option<u64>, minimum = 1)]
    pub per_page: Option<String>,
}

impl ListDatasetsQuery {
    #[must_use]
    pub fn filter(&self) -> DatasetFilter {
        DatasetFilter {
            status: self.status.clone(),
            dataset_type: self.dataset_type.clone(),
            layer: self.layer.clone(),
        }
    }

    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        let parse = |v: &Option<String>| v.as_deref().and_then(|s| s.trim().parse::<u64>().ok());
        PageRequest {
            page: parse(&self.page),
            per_page: parse(&self.per_page),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DatasetListResponse {
    pub datasets: Vec<DatasetDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub pages: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DatasetEnvelope {
    pub dataset: DatasetDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DatasetMessageEnvelope {
    pub message: String,
    pub dataset: DatasetDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
