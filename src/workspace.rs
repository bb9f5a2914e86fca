//! Workspace folder identity.
//!
//! Every open workspace root gets one [`WorkspaceFolder`]. Its `index` is the
//! stable key the project registry uses for the lifetime of the open folder.

use std::{
    fmt::{Display, Formatter, Result},
    path::{Path, PathBuf},
};

use serde::Serialize;

/// A local directory open in the development environment.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct WorkspaceFolder {
    /// Position of the folder in the workspace, used as the registry key
    pub index: usize,

    /// Display name, usually the last component of `root`
    pub name: String,

    /// Absolute path of the folder on local disk
    pub root: PathBuf,
}

impl WorkspaceFolder {
    /// Create a folder whose name is derived from the last path component.
    ///
    /// Falls back to the full path when the root has no final component
    /// (for example `/`).
    #[must_use]
    pub fn new(index: usize, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .and_then(|n| n.to_str())
            .map_or_else(|| root.display().to_string(), ToString::to_string);

        Self { index, name, root }
    }

    /// Build the folder list for a set of roots, indexed in the given order.
    #[must_use]
    pub fn from_roots<I, P>(roots: I) -> Vec<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        roots
            .into_iter()
            .enumerate()
            .map(|(index, root)| Self::new(index, root))
            .collect()
    }

    /// Whether `path` lies inside this folder.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }
}

impl Display for WorkspaceFolder {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} ({})", self.name, self.root.display())
    }
}
