pub mod cascade;
pub mod constants;
pub mod error;
pub mod models;
pub mod tree;
pub mod tree_view;
pub mod utils;

#[cfg(feature = "client")]
pub mod api;
#[cfg(feature = "client")]
pub mod categories;
#[cfg(feature = "client")]
pub mod config;
#[cfg(feature = "client")]
pub mod currencies;
#[cfg(feature = "client")]
pub mod session;

// Re-export types at crate root for convenient importing
pub use crate::cascade::{DeletionCascade, DependentGroup};
pub use crate::error::{ApiError, ApiResult};
pub use crate::tree::{CategoryNode, build_tree};
pub use crate::tree_view::TreeViewState;

#[cfg(feature = "client")]
pub use crate::api::ApiClient;
#[cfg(feature = "client")]
pub use crate::session::{SessionStore, TokenStorage};
