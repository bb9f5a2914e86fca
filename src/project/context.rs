//! Per-workspace project context.

use std::{
    fmt::{Display, Formatter},
    sync::{Arc, PoisonError, RwLock},
};

use tracing::warn;

use crate::{
    host::{EnvValues, MetadataStore},
    project::ProjectState,
    workspace::WorkspaceFolder,
};

/// One project, bound to one open workspace folder.
///
/// The parsed metadata is cached after the first successful read. The cache
/// is never held across an await, so two expansions racing to fill it both
/// read the store and the last write wins; readers only ever observe a
/// complete state or none.
pub struct ProjectContext {
    folder: WorkspaceFolder,
    store: Arc<dyn MetadataStore>,
    state: RwLock<Option<Arc<ProjectState>>>,
}

impl ProjectContext {
    #[must_use]
    pub fn new(folder: WorkspaceFolder, store: Arc<dyn MetadataStore>) -> Self {
        Self {
            folder,
            store,
            state: RwLock::new(None),
        }
    }

    #[must_use]
    pub const fn folder(&self) -> &WorkspaceFolder {
        &self.folder
    }

    /// Name of the project, which is the name of its workspace folder.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.folder.name
    }

    #[must_use]
    pub fn store(&self) -> &dyn MetadataStore {
        self.store.as_ref()
    }

    /// Project metadata, read through the store on first use.
    ///
    /// Store failures are logged and reported as `None` so callers treat an
    /// unreadable project the same as an unconfigured one.
    pub async fn state(&self) -> Option<Arc<ProjectState>> {
        if let Some(state) = self.cached_state() {
            return Some(state);
        }

        match self.store.get_state().await {
            Ok(Some(state)) => {
                let state = Arc::new(state);
                *self.state.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&state));
                Some(state)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(project = %self.folder, "Failed to read project metadata: {e:#}");
                None
            }
        }
    }

    /// Drop the cached metadata so the next [`state`](Self::state) reads it again.
    pub fn invalidate(&self) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub async fn project_file_exists(&self, name: &str) -> bool {
        match self.store.project_file_exists(name).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!(project = %self.folder, file = name, "Failed to probe project file: {e:#}");
                false
            }
        }
    }

    pub async fn env(&self) -> Option<EnvValues> {
        match self.store.get_env().await {
            Ok(env) => env,
            Err(e) => {
                warn!(project = %self.folder, "Failed to read environment file: {e:#}");
                None
            }
        }
    }

    pub async fn variables(&self) -> Option<Vec<String>> {
        match self.store.get_variables().await {
            Ok(variables) => Some(variables),
            Err(e) => {
                warn!(project = %self.folder, "Failed to read project variables: {e:#}");
                None
            }
        }
    }

    fn cached_state(&self) -> Option<Arc<ProjectState>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Display for ProjectContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.folder)
    }
}
