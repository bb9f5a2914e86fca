//! Tree node model.
//!
//! A [`TreeNode`] is a plain value describing one row of the project tree.
//! Nodes are rebuilt on every expansion; nothing about them is kept between
//! refreshes. [`TreeNode::kind`] gives the tag the explorer dispatches on and
//! [`TreeNode::item`] the presentation handed to the UI.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::{Value, json};

use crate::{
    host::{MemberInfo, ObjectInfo},
    include_path::ResolvedIncludePath,
    library::{LibraryEntry, LibraryKind},
    workspace::WorkspaceFolder,
};

pub const CREATE_PROJECT: &str = "vscode-ibmi-projectexplorer.createProject";
pub const CREATE_ENV: &str = "vscode-ibmi-projectexplorer.createEnv";
pub const UPDATE_VARIABLE: &str = "vscode-ibmi-projectexplorer.updateVariable";
pub const SET_DEPLOY_LOCATION: &str = "code-for-ibmi.setDeployLocation";
pub const OPEN_FOLDER: &str = "workbench.action.files.openFolder";

/// An action attached to a node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Command {
    pub command: String,
    pub title: String,
    pub arguments: Vec<Value>,
}

impl Command {
    #[must_use]
    pub fn new(command: &str, title: &str, arguments: Vec<Value>) -> Self {
        Self {
            command: command.to_string(),
            title: title.to_string(),
            arguments,
        }
    }

    #[must_use]
    pub fn create_project(folder: &WorkspaceFolder) -> Self {
        Self::new(CREATE_PROJECT, "Create project iproj.json", vec![json!(folder)])
    }

    #[must_use]
    pub fn create_env(folder: &WorkspaceFolder) -> Self {
        Self::new(CREATE_ENV, "Create project .env", vec![json!(folder)])
    }

    #[must_use]
    pub fn set_deploy_location(folder: &WorkspaceFolder) -> Self {
        Self::new(
            SET_DEPLOY_LOCATION,
            "Set deploy location",
            vec![json!({}), json!(folder.root)],
        )
    }
}

/// Tag identifying what a node is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Project,
    Placeholder,
    IfsFolder,
    Streamfile,
    Variables,
    Variable,
    LibraryList,
    ObjectLibrary,
    IncludePaths,
    Library,
    ObjectFile,
    MemberFile,
    LocalIncludePath,
    RemoteIncludePath,
    LocalDirectory,
    LocalFile,
    Contributed,
}

impl NodeKind {
    #[must_use]
    pub const fn context_value(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Placeholder => "error",
            Self::IfsFolder => "ifsFolder",
            Self::Streamfile => "streamfile",
            Self::Variables => "variables",
            Self::Variable => "variable",
            Self::LibraryList => "libraryList",
            Self::ObjectLibrary => "objectLibrary",
            Self::IncludePaths => "includePaths",
            Self::Library => "library",
            Self::ObjectFile => "objectFile",
            Self::MemberFile => "memberFile",
            Self::LocalIncludePath => "localIncludePath",
            Self::RemoteIncludePath => "remoteIncludePath",
            Self::LocalDirectory => "localDirectory",
            Self::LocalFile => "localFile",
            Self::Contributed => "contributed",
        }
    }
}

/// A leaf contributed by code outside the explorer.
#[derive(Clone, Debug, PartialEq)]
pub struct ContributedNode {
    pub folder: WorkspaceFolder,
    pub label: String,
    pub description: Option<String>,
    pub context_value: String,
    pub icon: Option<String>,
    pub command: Option<Command>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TreeNode {
    Project {
        folder: WorkspaceFolder,
        description: Option<String>,
    },

    /// Stands in for something that could not be shown, optionally with a fix
    Placeholder {
        folder: Option<WorkspaceFolder>,
        label: String,
        description: Option<String>,
        command: Option<Command>,
    },

    IfsFolder {
        path: String,
        label: Option<String>,
    },
    Streamfile {
        path: String,
    },
    Variables {
        folder: WorkspaceFolder,
        unresolved: usize,
    },
    Variable {
        folder: WorkspaceFolder,
        name: String,
        value: Option<String>,
    },
    LibraryList {
        folder: WorkspaceFolder,
    },
    ObjectLibrary {
        folder: WorkspaceFolder,
    },
    IncludePaths {
        folder: WorkspaceFolder,
    },
    Library {
        folder: WorkspaceFolder,
        library: LibraryEntry,
    },
    ObjectFile {
        folder: WorkspaceFolder,
        object: ObjectInfo,
        path: String,
    },
    MemberFile {
        folder: WorkspaceFolder,
        member: MemberInfo,
        path: String,
    },
    LocalIncludePath {
        folder: WorkspaceFolder,
        declared: String,
        path: PathBuf,
    },
    RemoteIncludePath {
        folder: WorkspaceFolder,
        declared: String,
        path: String,
    },
    LocalDirectory {
        path: PathBuf,
    },
    LocalFile {
        path: PathBuf,
    },
    Contributed(ContributedNode),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collapsible {
    None,
    Collapsed,
}

/// What the UI shows for a node.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeItem {
    pub label: String,
    pub description: Option<String>,
    pub tooltip: Option<String>,
    pub icon: String,
    pub collapsible: Collapsible,
    pub context_value: String,
    pub command: Option<Command>,
}

impl TreeNode {
    /// Placeholder without a remediation command.
    #[must_use]
    pub fn message(label: impl Into<String>) -> Self {
        Self::Placeholder {
            folder: None,
            label: label.into(),
            description: None,
            command: None,
        }
    }

    /// Placeholder for a missing prerequisite of `folder`.
    #[must_use]
    pub fn unconfigured(
        folder: &WorkspaceFolder,
        label: impl Into<String>,
        description: impl Into<String>,
        command: Option<Command>,
    ) -> Self {
        Self::Placeholder {
            folder: Some(folder.clone()),
            label: label.into(),
            description: Some(description.into()),
            command,
        }
    }

    /// Node for an include path of `folder` after resolution.
    ///
    /// # Arguments
    ///
    /// * `folder` - Workspace folder the include path was declared in
    /// * `declared` - The include path as written in the project metadata
    /// * `resolved` - Where the resolver located it
    ///
    /// # Returns
    ///
    /// A local or remote include path node labelled with `declared`, whatever
    /// the resolved location looks like.
    #[must_use]
    pub fn include_path(
        folder: &WorkspaceFolder,
        declared: &str,
        resolved: ResolvedIncludePath,
    ) -> Self {
        let folder = folder.clone();
        let declared = declared.to_string();
        match resolved {
            ResolvedIncludePath::LocalAbsolute { path }
            | ResolvedIncludePath::LocalRelative { resolved: path, .. } => {
                Self::LocalIncludePath {
                    folder,
                    declared,
                    path,
                }
            }
            ResolvedIncludePath::RemoteAbsolute { path }
            | ResolvedIncludePath::RemoteRelative { resolved: path, .. } => {
                Self::RemoteIncludePath {
                    folder,
                    declared,
                    path,
                }
            }
        }
    }

    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Project { .. } => NodeKind::Project,
            Self::Placeholder { .. } => NodeKind::Placeholder,
            Self::IfsFolder { .. } => NodeKind::IfsFolder,
            Self::Streamfile { .. } => NodeKind::Streamfile,
            Self::Variables { .. } => NodeKind::Variables,
            Self::Variable { .. } => NodeKind::Variable,
            Self::LibraryList { .. } => NodeKind::LibraryList,
            Self::ObjectLibrary { .. } => NodeKind::ObjectLibrary,
            Self::IncludePaths { .. } => NodeKind::IncludePaths,
            Self::Library { .. } => NodeKind::Library,
            Self::ObjectFile { .. } => NodeKind::ObjectFile,
            Self::MemberFile { .. } => NodeKind::MemberFile,
            Self::LocalIncludePath { .. } => NodeKind::LocalIncludePath,
            Self::RemoteIncludePath { .. } => NodeKind::RemoteIncludePath,
            Self::LocalDirectory { .. } => NodeKind::LocalDirectory,
            Self::LocalFile { .. } => NodeKind::LocalFile,
            Self::Contributed(_) => NodeKind::Contributed,
        }
    }

    /// Workspace folder the node belongs to, if it belongs to one.
    #[must_use]
    pub const fn folder(&self) -> Option<&WorkspaceFolder> {
        match self {
            Self::Project { folder, .. }
            | Self::Variables { folder, .. }
            | Self::Variable { folder, .. }
            | Self::LibraryList { folder }
            | Self::ObjectLibrary { folder }
            | Self::IncludePaths { folder }
            | Self::Library { folder, .. }
            | Self::ObjectFile { folder, .. }
            | Self::MemberFile { folder, .. }
            | Self::LocalIncludePath { folder, .. }
            | Self::RemoteIncludePath { folder, .. }
            | Self::Contributed(ContributedNode { folder, .. }) => Some(folder),
            Self::Placeholder { folder, .. } => folder.as_ref(),
            Self::IfsFolder { .. }
            | Self::Streamfile { .. }
            | Self::LocalDirectory { .. }
            | Self::LocalFile { .. } => None,
        }
    }

    #[must_use]
    pub fn is_expandable(&self) -> bool {
        match self {
            Self::ObjectFile { object, .. } => object.attribute == "PF",
            Self::Placeholder { .. }
            | Self::Streamfile { .. }
            | Self::Variable { .. }
            | Self::MemberFile { .. }
            | Self::LocalFile { .. }
            | Self::Contributed(_) => false,
            _ => true,
        }
    }

    #[must_use]
    pub fn item(&self) -> TreeItem {
        let mut item = TreeItem {
            label: self.label(),
            description: None,
            tooltip: None,
            icon: self.icon().to_string(),
            collapsible: if self.is_expandable() {
                Collapsible::Collapsed
            } else {
                Collapsible::None
            },
            context_value: self.kind().context_value().to_string(),
            command: None,
        };

        match self {
            Self::Project { description, .. } => item.description.clone_from(description),
            Self::Placeholder {
                description,
                command,
                ..
            } => {
                item.description.clone_from(description);
                item.command.clone_from(command);
            }
            Self::Variables { unresolved, .. } if *unresolved > 0 => {
                item.description = Some(format!("{unresolved} unresolved"));
            }
            Self::Variable {
                folder,
                name,
                value,
            } => {
                item.description = Some(value.clone().unwrap_or_else(|| "No value".to_string()));
                item.command = Some(Command::new(
                    UPDATE_VARIABLE,
                    "Update value",
                    vec![json!(folder), json!(name), json!(value)],
                ));
            }
            Self::Library { library, .. } => {
                item.description = library_kind_label(library.kind).map(ToString::to_string);
                item.tooltip = Some(library.qsys_path());
            }
            Self::ObjectFile { object, path, .. } => {
                item.description = Some(object_description(object));
                item.tooltip = Some(object_tooltip(object, path));
            }
            Self::MemberFile { member, path, .. } => {
                if !member.text.trim().is_empty() {
                    item.description = Some(member.text.clone());
                }
                item.tooltip = Some(path.clone());
            }
            Self::RemoteIncludePath { path, .. } => item.tooltip = Some(path.clone()),
            Self::LocalIncludePath { path, .. } => item.tooltip = Some(path.display().to_string()),
            Self::Contributed(node) => {
                item.description.clone_from(&node.description);
                item.command.clone_from(&node.command);
                item.context_value.clone_from(&node.context_value);
            }
            _ => (),
        }

        item
    }

    fn label(&self) -> String {
        match self {
            Self::Project { folder, .. } => folder.name.clone(),
            Self::Placeholder { label, .. } => label.clone(),
            Self::IfsFolder { path, label } => label.clone().unwrap_or_else(|| basename(path)),
            Self::Streamfile { path } => basename(path),
            Self::Variables { .. } => "Variables".to_string(),
            Self::Variable { name, .. } => name.clone(),
            Self::LibraryList { .. } => "Library List".to_string(),
            Self::ObjectLibrary { .. } => "Object Libraries".to_string(),
            Self::IncludePaths { .. } => "Include Paths".to_string(),
            Self::Library { library, .. } => library.name.clone(),
            Self::ObjectFile { object, .. } => {
                format!("{}.{}", object.name, object_type(object))
            }
            Self::MemberFile { member, .. } => format!("{}.{}", member.name, member.extension),
            Self::LocalIncludePath { declared, .. } | Self::RemoteIncludePath { declared, .. } => {
                declared.clone()
            }
            Self::LocalDirectory { path } | Self::LocalFile { path } => path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned()),
            Self::Contributed(node) => node.label.clone(),
        }
    }

    fn icon(&self) -> &str {
        match self {
            Self::Project { .. } => "project",
            Self::Placeholder { .. } => "error",
            Self::IfsFolder { .. } | Self::LocalDirectory { .. } => "folder",
            Self::Streamfile { .. } | Self::LocalFile { .. } | Self::MemberFile { .. } => "file",
            Self::Variables { .. } => "symbol-variable",
            Self::Variable { .. } => "pencil",
            Self::LibraryList { .. } | Self::ObjectLibrary { .. } | Self::Library { .. } => {
                "library"
            }
            Self::IncludePaths { .. } => "list-flat",
            Self::LocalIncludePath { .. } | Self::RemoteIncludePath { .. } => "link",
            Self::ObjectFile { object, .. } => object_icon(&object_type(object)),
            Self::Contributed(node) => node.icon.as_deref().unwrap_or("symbol-misc"),
        }
    }
}

const fn library_kind_label(kind: LibraryKind) -> Option<&'static str> {
    match kind {
        LibraryKind::System => Some("System"),
        LibraryKind::Current => Some("Current"),
        LibraryKind::User => Some("User"),
        LibraryKind::Generic => None,
    }
}

/// Object type without the leading `*`.
pub(crate) fn object_type(object: &ObjectInfo) -> String {
    object.kind.strip_prefix('*').unwrap_or(&object.kind).to_string()
}

fn object_icon(kind: &str) -> &'static str {
    match kind.to_lowercase().as_str() {
        "file" => "database",
        "cmd" => "terminal",
        "module" => "extensions",
        "pgm" => "file-binary",
        "dtaara" => "clippy",
        "dtaq" => "list-ordered",
        "jobq" => "checklist",
        "lib" => "library",
        "meddfn" => "save-all",
        "outq" => "symbol-enum",
        "pnlgrp" => "book",
        "sbsd" => "server-process",
        "srvpgm" => "file-submodule",
        "usrspc" => "chrome-maximize",
        _ => "file",
    }
}

fn object_description(object: &ObjectInfo) -> String {
    let text = object.text.trim();
    let attribute = object.attribute.trim();

    match (text.is_empty(), attribute.is_empty()) {
        (false, false) => format!("{} ({attribute})", object.text),
        (false, true) => object.text.clone(),
        (true, false) => format!("({attribute})"),
        (true, true) => String::new(),
    }
}

fn object_tooltip(object: &ObjectInfo, path: &str) -> String {
    let mut lines = vec![format!("Name: {}", object.name), format!("Path: {path}")];
    if !object.text.trim().is_empty() {
        lines.push(format!("Text: {}", object.text));
    }
    if !object.attribute.is_empty() {
        lines.push(format!("Attribute: {}", object.attribute));
    }
    lines.push(format!("Type: {}", object.kind));

    lines.join("\n")
}

fn basename(path: &str) -> String {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(path)
        .to_string()
}
