#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Dataset Registry module.
//!
//! The public API is defined in `datasets-sdk` and re-exported here.

pub use datasets_sdk::{
    Dataset, DatasetFilter, DatasetPage, DatasetPatch, DatasetsApi, DatasetsError, NewDataset,
    PageRequest,
};

pub mod module;
pub use module::DatasetsModule;

pub mod local_client;

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
