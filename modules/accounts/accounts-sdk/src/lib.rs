//! User Store contract.
//!
//! Registration, credential checks and profile management. Consumers resolve
//! the store from the `ClientHub` as `Arc<dyn AccountsApi>`.

pub mod api;
pub mod errors;
pub mod models;

pub use api::AccountsApi;
pub use errors::AccountsError;
pub use models::{AuthSession, NewUser, ProfilePatch, User};
