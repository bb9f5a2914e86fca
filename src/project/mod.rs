//! Project registry and per-project state.
//!
//! ## Main Parts
//!
//! - [`ProjectState`] - The declared configuration read from `iproj.json`
//! - [`ProjectContext`] - One project bound to one workspace folder, caching its state
//! - [`ProjectRegistry`] - The table of loaded projects and the active-project pointer

pub mod context;
pub mod registry;
pub mod state;

pub use context::ProjectContext;
pub use registry::{ProjectRegistry, StoreFactory};
pub use state::ProjectState;

/// File name of the project metadata at the workspace root.
pub const METADATA_FILE: &str = "iproj.json";

/// File name of the project environment file at the workspace root.
pub const ENV_FILE: &str = ".env";
