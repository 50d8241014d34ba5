#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! User Store module.
//!
//! The public API is defined in `accounts-sdk` and re-exported here.

pub use accounts_sdk::{AccountsApi, AccountsError, AuthSession, NewUser, ProfilePatch, User};

pub mod module;
pub use module::AccountsModule;

pub mod local_client;

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
