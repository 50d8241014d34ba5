//! Dataset Registry contract.
//!
//! Consumers resolve the registry from the `ClientHub`:
//! ```ignore
//! let datasets = hub.get::<dyn DatasetsApi>()?;
//! let page = datasets.list_datasets(DatasetFilter::default(), PageRequest::default()).await?;
//! ```

pub mod api;
pub mod errors;
pub mod models;

pub use api::DatasetsApi;
pub use errors::DatasetsError;
pub use models::{Dataset, DatasetFilter, DatasetPage, DatasetPatch, NewDataset, PageRequest};
