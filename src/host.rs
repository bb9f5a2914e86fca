//! Collaborator interfaces.
//!
//! The explorer never talks to disk, the project files or the IBM i host
//! directly. It goes through the traits in this module so that the hosting
//! application (or a test) decides how each of these is reached:
//!
//! - [`MetadataStore`] - per-project access to `iproj.json` and `.env`
//! - [`Connection`] - the remote host session (deployment mapping and listings)
//! - [`FileProbe`] - local filesystem existence checks and directory listings
//! - [`ProjectPicker`] - the interactive prompt used to disambiguate projects

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::project::ProjectState;

/// Mapping from a local workspace root to its remote deployment directory.
pub type Deployment = HashMap<PathBuf, String>;

/// Variable values read from a project's environment file.
pub type EnvValues = HashMap<String, String>;

/// Kind of an entry in a remote (IFS) directory listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IfsEntryKind {
    Directory,
    Streamfile,
}

/// One entry of a remote directory listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IfsEntry {
    /// Absolute remote path
    pub path: String,
    pub kind: IfsEntryKind,
}

/// One object of a library listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ObjectInfo {
    pub library: String,
    pub name: String,

    /// Object type as reported by the host, e.g. `*FILE` or `*PGM`
    #[serde(rename = "type")]
    pub kind: String,

    /// Object attribute, e.g. `PF` for physical files
    pub attribute: String,
    pub text: String,
}

/// One member of a source or physical file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemberInfo {
    pub library: String,
    pub file: String,
    pub name: String,
    pub extension: String,
    pub text: String,
}

/// One entry of a local directory listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LocalEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Access to the metadata files of a single project.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Whether `name` exists at the project root.
    async fn project_file_exists(&self, name: &str) -> Result<bool>;

    /// Parsed project metadata, `None` when there is none to read.
    async fn get_state(&self) -> Result<Option<ProjectState>>;

    /// Values from the environment file, `None` when it does not exist.
    async fn get_env(&self) -> Result<Option<EnvValues>>;

    /// Names of the variables the project metadata references, in order.
    async fn get_variables(&self) -> Result<Vec<String>>;
}

/// The remote host session.
#[async_trait]
pub trait Connection: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Current local root to remote directory mapping.
    fn deployment(&self) -> Deployment;

    /// Fixed-format library list lines for a job set up from `state`.
    async fn library_list(&self, state: &ProjectState) -> Result<Vec<String>>;

    async fn file_list(&self, remote_path: &str) -> Result<Vec<IfsEntry>>;

    async fn object_list(&self, library: &str) -> Result<Vec<ObjectInfo>>;

    async fn member_list(&self, library: &str, file: &str) -> Result<Vec<MemberInfo>>;
}

/// Local filesystem surface used for existence probes.
#[async_trait]
pub trait FileProbe: Send + Sync {
    /// `false` means "does not exist"; the reason is never inspected.
    async fn exists(&self, path: &Path) -> bool;

    async fn read_dir(&self, path: &Path) -> Result<Vec<LocalEntry>>;
}

/// [`FileProbe`] backed by the real filesystem.
pub struct OsFileProbe;

#[async_trait]
impl FileProbe for OsFileProbe {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<LocalEntry>> {
        let mut entries = Vec::new();
        let mut dir = tokio::fs::read_dir(path).await?;

        while let Some(entry) = dir.next_entry().await? {
            let is_dir = entry.file_type().await?.is_dir();
            entries.push(LocalEntry {
                path: entry.path(),
                is_dir,
            });
        }

        entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.path.cmp(&b.path)));

        Ok(entries)
    }
}

/// A project offered in the selection prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectChoice {
    /// Index of the project's workspace folder
    pub index: usize,

    /// Workspace folder name
    pub label: String,

    /// Project description from its metadata
    pub description: String,
}

/// Interactive prompt used when more than one project could be meant.
#[async_trait]
pub trait ProjectPicker: Send + Sync {
    /// Tell the user why nothing could be offered.
    fn report_error(&self, message: &str);

    /// Let the user choose one of `candidates`; `None` when dismissed.
    async fn pick(&self, candidates: Vec<ProjectChoice>) -> Option<ProjectChoice>;
}
