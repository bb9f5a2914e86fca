//! Lazy project tree.
//!
//! [`ProjectExplorer`] answers "what are the children of this node?" for the
//! project panel. Children are computed on demand from the registry, the
//! include path resolver, the library list parser and the host connection,
//! and are never cached. Every missing prerequisite turns into a placeholder
//! node instead of an error, so one broken subtree never stops its siblings
//! from rendering.

use std::{
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};

use futures::{FutureExt, future::BoxFuture};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::{
    host::{Connection, Deployment, FileProbe, IfsEntryKind},
    include_path::{IncludePathResolver, ResolveError},
    library::{LibraryEntry, object_libraries, parse_library_list},
    project::{ENV_FILE, METADATA_FILE, ProjectContext, ProjectRegistry, ProjectState},
    tree::node::{Command, OPEN_FOLDER, TreeItem, TreeNode, object_type},
    workspace::WorkspaceFolder,
};

/// Label of the placeholder shown for a blank include path entry.
const EMPTY_INCLUDE_PATH: &str = "(empty)";

/// Extra children appended under every project node.
pub type ChildContributor = Arc<dyn Fn(&ProjectContext) -> Vec<TreeNode> + Send + Sync>;

/// Published when part of the tree should be fetched again.
#[derive(Clone, Debug, PartialEq)]
pub enum RefreshEvent {
    All,
    Node(TreeNode),
}

/// A node with its children already expanded, as produced by [`ProjectExplorer::expand`].
#[derive(Clone, Debug, Serialize)]
pub struct ExpandedNode {
    #[serde(flatten)]
    pub item: TreeItem,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ExpandedNode>,
}

/// Computes the project tree on demand.
///
/// The explorer owns nothing but the list of open workspace folders and the
/// registered contributors; projects live in the shared [`ProjectRegistry`]
/// and remote data is fetched through the [`Connection`] each time a node is
/// expanded.
pub struct ProjectExplorer {
    registry: Arc<ProjectRegistry>,
    connection: Option<Arc<dyn Connection>>,
    probe: Arc<dyn FileProbe>,
    folders: RwLock<Vec<WorkspaceFolder>>,
    contributors: RwLock<Vec<ChildContributor>>,
    refresh: broadcast::Sender<RefreshEvent>,
}

impl ProjectExplorer {
    /// Creates a new explorer.
    ///
    /// # Arguments
    ///
    /// * `registry` - Registry the root listing loads projects into
    /// * `connection` - Host session, `None` while disconnected
    /// * `probe` - Local filesystem used to resolve include paths
    ///
    /// # Returns
    ///
    /// An explorer with no workspace folders open. Call
    /// [`set_workspace_folders`](Self::set_workspace_folders) before listing
    /// the root.
    #[must_use]
    pub fn new(
        registry: Arc<ProjectRegistry>,
        connection: Option<Arc<dyn Connection>>,
        probe: Arc<dyn FileProbe>,
    ) -> Self {
        let (refresh, _) = broadcast::channel(16);

        Self {
            registry,
            connection,
            probe,
            folders: RwLock::new(Vec::new()),
            contributors: RwLock::new(Vec::new()),
            refresh,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<ProjectRegistry> {
        &self.registry
    }

    /// Replace the open workspace folders.
    ///
    /// Projects of the previous folders are dropped from the registry and the
    /// new folders are loaded; the first of them becomes active. A
    /// [`RefreshEvent::All`] is published afterwards.
    ///
    /// # Arguments
    ///
    /// * `folders` - The folders now open, in workspace order
    pub fn set_workspace_folders(&self, folders: Vec<WorkspaceFolder>) {
        self.registry.clear();
        self.registry.clear_active();
        self.registry.load_all(&folders);
        *self.folders.write().unwrap_or_else(PoisonError::into_inner) = folders;
        self.refresh();
    }

    /// Register extra children for project nodes. They follow the built-in
    /// children, in registration order.
    pub fn push_extensible_children<F>(&self, contributor: F)
    where
        F: Fn(&ProjectContext) -> Vec<TreeNode> + Send + Sync + 'static,
    {
        self.contributors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(contributor));
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.refresh.subscribe()
    }

    /// Ask for the whole tree to be fetched again. Cached project metadata
    /// is dropped so it is read again on the next expansion.
    pub fn refresh(&self) {
        for context in self.registry.list() {
            context.invalidate();
        }
        // No receivers just means nobody is showing the tree.
        let _ = self.refresh.send(RefreshEvent::All);
    }

    /// Ask for the subtree under `node` to be fetched again.
    ///
    /// The cached metadata of the project `node` belongs to is dropped and a
    /// [`RefreshEvent::Node`] carrying `node` is published.
    ///
    /// # Arguments
    ///
    /// * `node` - Root of the subtree to fetch again
    pub fn refresh_node(&self, node: &TreeNode) {
        if let Some(context) = node.folder().and_then(|folder| self.context(folder)) {
            context.invalidate();
        }
        let _ = self.refresh.send(RefreshEvent::Node(node.clone()));
    }

    /// Children of `node`, or the top-level nodes when `node` is `None`.
    ///
    /// Listing the top level loads a project for every open workspace folder
    /// that has none yet. Expanding any other node only reads: a node whose
    /// workspace folder has no registered project has no children.
    ///
    /// # Arguments
    ///
    /// * `node` - The node being expanded, `None` for the root
    ///
    /// # Returns
    ///
    /// The child nodes in display order. Failures of the store, the host or
    /// the local filesystem are logged and show up as placeholders or as a
    /// shorter list, never as an error.
    pub async fn children(&self, node: Option<&TreeNode>) -> Vec<TreeNode> {
        let Some(node) = node else {
            return self.root_children().await;
        };
        debug!(kind = node.kind().context_value(), "Expanding node");

        match node {
            TreeNode::Project { folder, .. } => self.project_children(folder).await,
            TreeNode::Variables { folder, .. } => self.variable_children(folder).await,
            TreeNode::LibraryList { folder } => self.library_list_children(folder).await,
            TreeNode::ObjectLibrary { folder } => self.object_library_children(folder).await,
            TreeNode::IncludePaths { folder } => self.include_path_children(folder).await,
            TreeNode::Library { folder, library } => self.library_children(folder, library).await,
            TreeNode::ObjectFile {
                folder,
                object,
                path,
            } => self.member_children(folder, &object.library, &object.name, path).await,
            TreeNode::IfsFolder { path, .. } | TreeNode::RemoteIncludePath { path, .. } => {
                self.ifs_children(path).await
            }
            TreeNode::LocalIncludePath { path, .. } | TreeNode::LocalDirectory { path } => {
                self.local_children(path).await
            }
            TreeNode::Placeholder { .. }
            | TreeNode::Streamfile { .. }
            | TreeNode::Variable { .. }
            | TreeNode::MemberFile { .. }
            | TreeNode::LocalFile { .. }
            | TreeNode::Contributed(_) => Vec::new(),
        }
    }

    /// Expand the tree from the top down.
    ///
    /// # Arguments
    ///
    /// * `depth` - Number of levels to list, counted from the root: `1` lists
    ///   the top-level nodes only
    ///
    /// # Returns
    ///
    /// The top-level nodes with their expandable descendants filled in down to
    /// `depth`.
    pub async fn expand(&self, depth: usize) -> Vec<ExpandedNode> {
        self.expand_children(None, depth).await
    }

    /// Expand `node` itself and `depth` levels below it.
    pub async fn expand_node(&self, node: &TreeNode, depth: usize) -> ExpandedNode {
        let children = if node.is_expandable() {
            self.expand_children(Some(node), depth).await
        } else {
            Vec::new()
        };

        ExpandedNode {
            item: node.item(),
            children,
        }
    }

    fn expand_children<'a>(
        &'a self,
        node: Option<&'a TreeNode>,
        depth: usize,
    ) -> BoxFuture<'a, Vec<ExpandedNode>> {
        async move {
            if depth == 0 {
                return Vec::new();
            }

            let mut expanded = Vec::new();
            for child in self.children(node).await {
                let children = if child.is_expandable() {
                    self.expand_children(Some(&child), depth - 1).await
                } else {
                    Vec::new()
                };
                expanded.push(ExpandedNode {
                    item: child.item(),
                    children,
                });
            }
            expanded
        }
        .boxed()
    }

    fn connection(&self) -> Option<&dyn Connection> {
        self.connection
            .as_deref()
            .filter(|connection| connection.is_connected())
    }

    fn deployment(&self) -> Deployment {
        self.connection()
            .map(|connection| connection.deployment())
            .unwrap_or_default()
    }

    fn folders(&self) -> Vec<WorkspaceFolder> {
        self.folders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The registered project of `folder`. Never registers one: only the
    /// root listing loads projects.
    fn context(&self, folder: &WorkspaceFolder) -> Option<Arc<ProjectContext>> {
        let context = self.registry.get(folder).filter(|context| context.folder() == folder);
        if context.is_none() {
            debug!(project = %folder, "No project registered for node");
        }
        context
    }

    async fn root_children(&self) -> Vec<TreeNode> {
        if self.connection().is_none() {
            return vec![not_connected()];
        }

        let folders = self.folders();
        if folders.is_empty() {
            return vec![TreeNode::Placeholder {
                folder: None,
                label: "Please open a local workspace folder.".to_string(),
                description: None,
                command: Some(Command::new(OPEN_FOLDER, "Open folder", Vec::new())),
            }];
        }

        let mut items = Vec::with_capacity(folders.len());
        for folder in folders {
            self.registry.load(&folder);
            let Some(context) = self.context(&folder) else {
                continue;
            };

            if context.project_file_exists(METADATA_FILE).await {
                let description = context.state().await.map(|state| state.description.clone());
                items.push(TreeNode::Project {
                    folder,
                    description,
                });
            } else {
                items.push(TreeNode::unconfigured(
                    &folder,
                    folder.name.clone(),
                    "Please configure project metadata.",
                    Some(Command::create_project(&folder)),
                ));
            }
        }

        items
    }

    async fn project_children(&self, folder: &WorkspaceFolder) -> Vec<TreeNode> {
        let Some(context) = self.context(folder) else {
            return Vec::new();
        };

        let (has_env, variables, env) = tokio::join!(
            context.project_file_exists(ENV_FILE),
            context.variables(),
            context.env(),
        );

        let mut items = Vec::new();

        match self.deployment().get(&folder.root) {
            Some(remote_dir) => items.push(TreeNode::IfsFolder {
                path: remote_dir.clone(),
                label: Some("Source".to_string()),
            }),
            None => items.push(TreeNode::unconfigured(
                folder,
                "Source",
                "Please configure remote directory.",
                Some(Command::set_deploy_location(folder)),
            )),
        }

        if has_env {
            let unresolved = match (variables, env) {
                (Some(variables), Some(env)) => variables
                    .iter()
                    .filter(|name| env.get(*name).is_none_or(String::is_empty))
                    .count(),
                _ => 0,
            };
            items.push(TreeNode::Variables {
                folder: folder.clone(),
                unresolved,
            });
        } else {
            items.push(TreeNode::unconfigured(
                folder,
                "Variables",
                "Please configure environment file.",
                Some(Command::create_env(folder)),
            ));
        }

        items.push(TreeNode::LibraryList {
            folder: folder.clone(),
        });
        items.push(TreeNode::ObjectLibrary {
            folder: folder.clone(),
        });
        items.push(TreeNode::IncludePaths {
            folder: folder.clone(),
        });

        let contributors = self
            .contributors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for contributor in contributors {
            items.extend(contributor(&context));
        }

        items
    }

    async fn variable_children(&self, folder: &WorkspaceFolder) -> Vec<TreeNode> {
        let Some(context) = self.context(folder) else {
            return Vec::new();
        };

        let Some(variables) = context.variables().await else {
            return vec![TreeNode::unconfigured(
                folder,
                "Variables",
                "Unable to read variables.",
                None,
            )];
        };

        let Some(env) = context.env().await else {
            return vec![TreeNode::unconfigured(
                folder,
                "Variables",
                "Unable to retrieve environment variables",
                Some(Command::create_env(folder)),
            )];
        };

        variables
            .into_iter()
            .map(|name| {
                let value = env.get(&name).filter(|value| !value.is_empty()).cloned();
                TreeNode::Variable {
                    folder: folder.clone(),
                    name,
                    value,
                }
            })
            .collect()
    }

    async fn library_list_children(&self, folder: &WorkspaceFolder) -> Vec<TreeNode> {
        let Some(connection) = self.connection() else {
            return vec![not_connected()];
        };
        let Some(state) = self.state(folder).await else {
            return Vec::new();
        };

        match connection.library_list(&state).await {
            Ok(lines) => library_nodes(folder, parse_library_list(&lines)),
            Err(e) => {
                warn!(project = %folder, "Failed to retrieve library list: {e:#}");
                Vec::new()
            }
        }
    }

    async fn object_library_children(&self, folder: &WorkspaceFolder) -> Vec<TreeNode> {
        match self.state(folder).await {
            Some(state) => library_nodes(folder, object_libraries(&state)),
            None => Vec::new(),
        }
    }

    async fn include_path_children(&self, folder: &WorkspaceFolder) -> Vec<TreeNode> {
        let Some(state) = self.state(folder).await else {
            return Vec::new();
        };

        let deployment = self.deployment();
        let resolver = IncludePathResolver::new(self.probe.as_ref());
        let mut items = Vec::with_capacity(state.include_path.len());

        for declared in &state.include_path {
            match resolver.resolve(declared, &folder.root, &deployment).await {
                Ok(resolved) => items.push(TreeNode::include_path(folder, declared, resolved)),
                Err(ResolveError::UnmappedDeployment { .. }) => {
                    items.push(TreeNode::unconfigured(
                        folder,
                        declared.clone(),
                        "Please configure remote directory.",
                        Some(Command::set_deploy_location(folder)),
                    ));
                }
                Err(ResolveError::Empty) => {
                    items.push(TreeNode::unconfigured(
                        folder,
                        EMPTY_INCLUDE_PATH,
                        "Include path is empty.",
                        None,
                    ));
                }
            }
        }

        items
    }

    async fn library_children(
        &self,
        folder: &WorkspaceFolder,
        library: &LibraryEntry,
    ) -> Vec<TreeNode> {
        let Some(connection) = self.connection() else {
            return vec![not_connected()];
        };

        let objects = match connection.object_list(&library.name).await {
            Ok(objects) => objects,
            Err(e) => {
                warn!(library = %library, "Failed to list objects: {e:#}");
                return Vec::new();
            }
        };

        let library_path = library.qsys_path();
        objects
            .into_iter()
            .map(|object| TreeNode::ObjectFile {
                folder: folder.clone(),
                path: format!("{library_path}/{}.{}", object.name, object_type(&object)),
                object,
            })
            .collect()
    }

    async fn member_children(
        &self,
        folder: &WorkspaceFolder,
        library: &str,
        file: &str,
        file_path: &str,
    ) -> Vec<TreeNode> {
        let Some(connection) = self.connection() else {
            return vec![not_connected()];
        };

        match connection.member_list(library, file).await {
            Ok(members) => members
                .into_iter()
                .map(|member| TreeNode::MemberFile {
                    folder: folder.clone(),
                    path: format!("{file_path}/{}.{}", member.name, member.extension),
                    member,
                })
                .collect(),
            Err(e) => {
                warn!(library, file, "Failed to list members: {e:#}");
                Vec::new()
            }
        }
    }

    async fn ifs_children(&self, remote_path: &str) -> Vec<TreeNode> {
        let Some(connection) = self.connection() else {
            return vec![not_connected()];
        };

        match connection.file_list(remote_path).await {
            Ok(entries) => entries
                .into_iter()
                .map(|entry| match entry.kind {
                    IfsEntryKind::Directory => TreeNode::IfsFolder {
                        path: entry.path,
                        label: None,
                    },
                    IfsEntryKind::Streamfile => TreeNode::Streamfile { path: entry.path },
                })
                .collect(),
            Err(e) => {
                warn!(path = remote_path, "Failed to list remote directory: {e:#}");
                Vec::new()
            }
        }
    }

    async fn local_children(&self, path: &Path) -> Vec<TreeNode> {
        match self.probe.read_dir(path).await {
            Ok(entries) => entries
                .into_iter()
                .map(|entry| {
                    if entry.is_dir {
                        TreeNode::LocalDirectory { path: entry.path }
                    } else {
                        TreeNode::LocalFile { path: entry.path }
                    }
                })
                .collect(),
            Err(e) => {
                warn!(path = %path.display(), "Failed to list local directory: {e:#}");
                Vec::new()
            }
        }
    }

    async fn state(&self, folder: &WorkspaceFolder) -> Option<Arc<ProjectState>> {
        self.context(folder)?.state().await
    }
}

fn not_connected() -> TreeNode {
    TreeNode::message("Please connect to an IBM i.")
}

fn library_nodes(folder: &WorkspaceFolder, libraries: Vec<LibraryEntry>) -> Vec<TreeNode> {
    libraries
        .into_iter()
        .map(|library| TreeNode::Library {
            folder: folder.clone(),
            library,
        })
        .collect()
}
