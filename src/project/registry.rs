//! Registry of loaded projects.
//!
//! The [`ProjectRegistry`] maps each open workspace folder to its
//! [`ProjectContext`] and tracks which project is active. The hosting
//! application owns one registry for the lifetime of the process and shares
//! it (behind an `Arc`) with the tree explorer.
//!
//! No query on the registry fails: a missing project is `None`, never an
//! error.

use std::{
    collections::BTreeMap,
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};

use futures::future::join_all;
use tracing::{debug, info};

use crate::{
    host::{MetadataStore, ProjectChoice, ProjectPicker},
    project::ProjectContext,
    workspace::WorkspaceFolder,
};

/// Creates the metadata store for a newly loaded workspace folder.
pub type StoreFactory = Box<dyn Fn(&WorkspaceFolder) -> Arc<dyn MetadataStore> + Send + Sync>;

#[derive(Default)]
struct Table {
    /// Keyed by workspace folder index
    loaded: BTreeMap<usize, Arc<ProjectContext>>,

    /// Not cleared by [`ProjectRegistry::clear`]; may outlive its table entry
    active: Option<Arc<ProjectContext>>,
}

/// Process-wide table of project contexts.
pub struct ProjectRegistry {
    table: RwLock<Table>,
    store_factory: StoreFactory,
}

impl ProjectRegistry {
    #[must_use]
    pub fn new(store_factory: StoreFactory) -> Self {
        Self {
            table: RwLock::new(Table::default()),
            store_factory,
        }
    }

    /// Register a project for `folder` unless one is already registered.
    ///
    /// The first project loaded while none is active becomes the active one.
    /// Loading the same folder again keeps the existing context, so its
    /// cached metadata survives.
    ///
    /// # Arguments
    ///
    /// * `folder` - The workspace folder to register; its store is created
    ///   with the registry's [`StoreFactory`]
    pub fn load(&self, folder: &WorkspaceFolder) {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);

        if table.loaded.contains_key(&folder.index) {
            return;
        }

        let store = (self.store_factory)(folder);
        let context = Arc::new(ProjectContext::new(folder.clone(), store));
        info!(project = %folder, "Loaded project");

        if table.active.is_none() {
            table.active = Some(Arc::clone(&context));
        }

        table.loaded.insert(folder.index, context);
    }

    /// [`load`](Self::load) every folder, in order.
    pub fn load_all<'a, I>(&self, folders: I)
    where
        I: IntoIterator<Item = &'a WorkspaceFolder>,
    {
        for folder in folders {
            self.load(folder);
        }
    }

    /// Look up the project registered for `folder`.
    ///
    /// # Arguments
    ///
    /// * `folder` - The workspace folder, matched by its index
    ///
    /// # Returns
    ///
    /// The shared context, or `None` if `folder` was never loaded or the
    /// registry has been cleared since.
    #[must_use]
    pub fn get(&self, folder: &WorkspaceFolder) -> Option<Arc<ProjectContext>> {
        self.read().loaded.get(&folder.index).cloned()
    }

    /// Make the project registered for `folder` active.
    ///
    /// If nothing is registered for `folder` there is no active project
    /// afterwards.
    pub fn set_active(&self, folder: &WorkspaceFolder) {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        table.active = table.loaded.get(&folder.index).cloned();
    }

    #[must_use]
    pub fn active(&self) -> Option<Arc<ProjectContext>> {
        self.read().active.clone()
    }

    /// Forget every registered project. The active project is left alone.
    pub fn clear(&self) {
        self.table
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .loaded
            .clear();
    }

    pub fn clear_active(&self) {
        self.table
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .active = None;
    }

    /// Snapshot of the registered projects, in workspace folder order.
    #[must_use]
    pub fn list(&self) -> Vec<Arc<ProjectContext>> {
        self.read().loaded.values().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().loaded.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().loaded.is_empty()
    }

    /// The project whose workspace root contains `path`.
    ///
    /// When workspace roots are nested the deepest one wins.
    ///
    /// # Arguments
    ///
    /// * `path` - Any local path, typically the file open in the editor
    ///
    /// # Returns
    ///
    /// The matching context, or `None` if `path` lies outside every
    /// registered workspace folder.
    #[must_use]
    pub fn find_by_path(&self, path: &Path) -> Option<Arc<ProjectContext>> {
        self.read()
            .loaded
            .values()
            .filter(|context| context.folder().contains(path))
            .max_by_key(|context| context.folder().root.components().count())
            .cloned()
    }

    /// Resolve which project the user means.
    ///
    /// With a single project it is returned without prompting. With several,
    /// every project whose metadata can be read is offered through `picker`,
    /// in registry order, and the choice is matched back by workspace folder
    /// index. Projects without readable metadata are left out of the prompt.
    ///
    /// # Arguments
    ///
    /// * `picker` - Prompt used to ask the user, and to report that no
    ///   workspace folder is open
    ///
    /// # Returns
    ///
    /// The chosen project, or `None` if there is none or the prompt was
    /// dismissed.
    pub async fn select_interactively(
        &self,
        picker: &dyn ProjectPicker,
    ) -> Option<Arc<ProjectContext>> {
        let projects = self.list();

        match projects.len() {
            0 => {
                picker.report_error("Please open a local workspace folder.");
                None
            }
            1 => projects.into_iter().next(),
            _ => {
                let described = join_all(projects.iter().map(|context| async move {
                    context.state().await.map(|state| ProjectChoice {
                        index: context.folder().index,
                        label: context.name().to_string(),
                        description: state.description.clone(),
                    })
                }))
                .await;

                let candidates: Vec<ProjectChoice> = described.into_iter().flatten().collect();
                debug!(candidates = candidates.len(), "Prompting for project");

                let selected = picker.pick(candidates).await?;

                projects
                    .into_iter()
                    .find(|context| context.folder().index == selected.index)
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Table> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }
}
