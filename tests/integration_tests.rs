//! Integration tests for ibmi-project-explorer
//!
//! These tests create temporary workspace folders holding `iproj.json` and
//! `.env` files and drive the project tree through a scripted host
//! connection, the same way the project panel expands it node by node.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use tempfile::TempDir;

use ibmi_project_explorer::detached::DetachedHost;
use ibmi_project_explorer::host::{
    Connection, Deployment, IfsEntry, IfsEntryKind, MemberInfo, MetadataStore, ObjectInfo,
    OsFileProbe,
};
use ibmi_project_explorer::library::{LibraryEntry, LibraryKind};
use ibmi_project_explorer::project::{ProjectRegistry, ProjectState};
use ibmi_project_explorer::store::FsMetadataStore;
use ibmi_project_explorer::tree::node::{
    CREATE_ENV, CREATE_PROJECT, OPEN_FOLDER, SET_DEPLOY_LOCATION, UPDATE_VARIABLE,
};
use ibmi_project_explorer::tree::{
    Collapsible, ContributedNode, NodeKind, ProjectExplorer, RefreshEvent, TreeNode,
};
use ibmi_project_explorer::workspace::WorkspaceFolder;

/// Host connection answering from canned listings.
struct ScriptedHost {
    connected: bool,
    deployment: Deployment,
    library_list: Option<Vec<String>>,
    objects: Vec<ObjectInfo>,
    members: Vec<MemberInfo>,
    files: Vec<IfsEntry>,
}

impl ScriptedHost {
    fn connected() -> Self {
        Self {
            connected: true,
            deployment: Deployment::new(),
            library_list: Some(Vec::new()),
            objects: Vec::new(),
            members: Vec::new(),
            files: Vec::new(),
        }
    }

    fn deployed(mut self, root: &Path, remote: &str) -> Self {
        self.deployment.insert(root.to_path_buf(), remote.to_string());
        self
    }
}

#[async_trait]
impl Connection for ScriptedHost {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn deployment(&self) -> Deployment {
        self.deployment.clone()
    }

    async fn library_list(&self, _state: &ProjectState) -> Result<Vec<String>> {
        match &self.library_list {
            Some(lines) => Ok(lines.clone()),
            None => bail!("library list command failed"),
        }
    }

    async fn file_list(&self, remote_path: &str) -> Result<Vec<IfsEntry>> {
        Ok(self
            .files
            .iter()
            .filter(|entry| {
                Path::new(&entry.path).parent() == Some(Path::new(remote_path))
            })
            .cloned()
            .collect())
    }

    async fn object_list(&self, library: &str) -> Result<Vec<ObjectInfo>> {
        Ok(self
            .objects
            .iter()
            .filter(|object| object.library == library)
            .cloned()
            .collect())
    }

    async fn member_list(&self, library: &str, file: &str) -> Result<Vec<MemberInfo>> {
        Ok(self
            .members
            .iter()
            .filter(|member| member.library == library && member.file == file)
            .cloned()
            .collect())
    }
}

/// Helper function to create a file with specified content
fn create_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    fs::write(path, content).expect("Failed to write file");
}

/// Create a workspace folder, optionally holding project metadata and an env file
fn create_workspace(metadata: Option<&str>, env: Option<&str>) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    if let Some(metadata) = metadata {
        create_file(&dir.path().join("iproj.json"), metadata);
    }
    if let Some(env) = env {
        create_file(&dir.path().join(".env"), env);
    }
    dir
}

fn explorer_for<C>(connection: Option<C>, roots: &[&Path]) -> ProjectExplorer
where
    C: Connection + 'static,
{
    let registry = Arc::new(ProjectRegistry::new(Box::new(|folder: &WorkspaceFolder| {
        Arc::new(FsMetadataStore::new(&folder.root)) as Arc<dyn MetadataStore>
    })));
    let connection = connection.map(|c| Arc::new(c) as Arc<dyn Connection>);

    let explorer = ProjectExplorer::new(registry, connection, Arc::new(OsFileProbe));
    explorer.set_workspace_folders(WorkspaceFolder::from_roots(
        roots.iter().map(|root| root.to_path_buf()),
    ));
    explorer
}

async fn project_node(explorer: &ProjectExplorer) -> TreeNode {
    explorer
        .children(None)
        .await
        .into_iter()
        .find(|node| node.kind() == NodeKind::Project)
        .expect("no project node")
}

async fn child_of_kind(explorer: &ProjectExplorer, parent: &TreeNode, kind: NodeKind) -> TreeNode {
    explorer
        .children(Some(parent))
        .await
        .into_iter()
        .find(|node| node.kind() == kind)
        .expect("no child of the requested kind")
}

fn kinds(nodes: &[TreeNode]) -> Vec<NodeKind> {
    nodes.iter().map(TreeNode::kind).collect()
}

fn labels(nodes: &[TreeNode]) -> Vec<String> {
    nodes.iter().map(|node| node.item().label).collect()
}

fn record(name: &str, code: &str) -> String {
    format!("{name:<10}  {code}")
}

#[tokio::test]
async fn test_root_without_connection() {
    let dir = create_workspace(Some("{}"), None);
    let explorer = explorer_for(None::<ScriptedHost>, &[dir.path()]);

    let roots = explorer.children(None).await;

    assert_eq!(roots.len(), 1);
    let item = roots[0].item();
    assert_eq!(item.label, "Please connect to an IBM i.");
    assert!(item.command.is_none());
}

#[tokio::test]
async fn test_root_with_disconnected_host() {
    let dir = create_workspace(Some("{}"), None);
    let host = ScriptedHost {
        connected: false,
        ..ScriptedHost::connected()
    };
    let explorer = explorer_for(Some(host), &[dir.path()]);

    let roots = explorer.children(None).await;

    assert_eq!(labels(&roots), vec!["Please connect to an IBM i."]);
}

#[tokio::test]
async fn test_root_without_workspace_folders() {
    let explorer = explorer_for(Some(ScriptedHost::connected()), &[]);

    let roots = explorer.children(None).await;

    assert_eq!(roots.len(), 1);
    let item = roots[0].item();
    assert_eq!(item.label, "Please open a local workspace folder.");
    assert_eq!(item.command.map(|c| c.command), Some(OPEN_FOLDER.to_string()));
}

#[tokio::test]
async fn test_root_lists_projects_and_unconfigured_folders() {
    let payroll = create_workspace(Some(r#"{ "description": "Payroll" }"#), None);
    let scratch = create_workspace(None, None);
    let explorer = explorer_for(
        Some(ScriptedHost::connected()),
        &[payroll.path(), scratch.path()],
    );

    let roots = explorer.children(None).await;

    assert_eq!(kinds(&roots), vec![NodeKind::Project, NodeKind::Placeholder]);

    let project = roots[0].item();
    assert_eq!(project.description.as_deref(), Some("Payroll"));
    assert_eq!(project.collapsible, Collapsible::Collapsed);

    let placeholder = roots[1].item();
    let scratch_name = scratch.path().file_name().unwrap().to_string_lossy();
    assert_eq!(placeholder.label, scratch_name);
    assert_eq!(
        placeholder.description.as_deref(),
        Some("Please configure project metadata.")
    );
    assert_eq!(
        placeholder.command.map(|c| c.command),
        Some(CREATE_PROJECT.to_string())
    );
    assert_eq!(placeholder.collapsible, Collapsible::None);
}

#[tokio::test]
async fn test_project_children_in_fixed_order() {
    let dir = create_workspace(
        Some(r#"{ "curlib": "&CURLIB", "objlib": "&OBJLIB" }"#),
        Some("CURLIB=PAYLIB\nOBJLIB=\n"),
    );
    let host = ScriptedHost::connected().deployed(dir.path(), "/home/dev/payroll");
    let explorer = explorer_for(Some(host), &[dir.path()]);

    let project = project_node(&explorer).await;
    let children = explorer.children(Some(&project)).await;

    assert_eq!(
        kinds(&children),
        vec![
            NodeKind::IfsFolder,
            NodeKind::Variables,
            NodeKind::LibraryList,
            NodeKind::ObjectLibrary,
            NodeKind::IncludePaths,
        ]
    );
    assert_eq!(
        children[0],
        TreeNode::IfsFolder {
            path: "/home/dev/payroll".to_string(),
            label: Some("Source".to_string()),
        }
    );
    assert!(matches!(
        children[1],
        TreeNode::Variables { unresolved: 1, .. }
    ));
    assert_eq!(children[1].item().description.as_deref(), Some("1 unresolved"));
}

#[tokio::test]
async fn test_project_children_placeholders_for_missing_setup() {
    let dir = create_workspace(Some("{}"), None);
    let explorer = explorer_for(Some(ScriptedHost::connected()), &[dir.path()]);

    let project = project_node(&explorer).await;
    let children = explorer.children(Some(&project)).await;

    assert_eq!(children.len(), 5);

    let source = children[0].item();
    assert_eq!(source.label, "Source");
    assert_eq!(
        source.description.as_deref(),
        Some("Please configure remote directory.")
    );
    assert_eq!(
        source.command.map(|c| c.command),
        Some(SET_DEPLOY_LOCATION.to_string())
    );

    let variables = children[1].item();
    assert_eq!(variables.label, "Variables");
    assert_eq!(
        variables.description.as_deref(),
        Some("Please configure environment file.")
    );
    assert_eq!(
        variables.command.map(|c| c.command),
        Some(CREATE_ENV.to_string())
    );
}

#[tokio::test]
async fn test_variables_expand_to_values() {
    let dir = create_workspace(
        Some(r#"{ "curlib": "&CURLIB", "preUsrlibl": ["&TOOLS"] }"#),
        Some("CURLIB=PAYLIB\n"),
    );
    let explorer = explorer_for(Some(ScriptedHost::connected()), &[dir.path()]);

    let project = project_node(&explorer).await;
    let variables = child_of_kind(&explorer, &project, NodeKind::Variables).await;
    let children = explorer.children(Some(&variables)).await;

    assert_eq!(labels(&children), vec!["CURLIB", "TOOLS"]);

    let curlib = children[0].item();
    assert_eq!(curlib.description.as_deref(), Some("PAYLIB"));
    assert_eq!(
        curlib.command.map(|c| c.command),
        Some(UPDATE_VARIABLE.to_string())
    );
    assert_eq!(children[1].item().description.as_deref(), Some("No value"));
}

#[tokio::test]
async fn test_variables_without_env_file() {
    let dir = create_workspace(Some(r#"{ "curlib": "&CURLIB" }"#), None);
    let explorer = explorer_for(Some(ScriptedHost::connected()), &[dir.path()]);
    let folder = WorkspaceFolder::new(0, dir.path());

    let children = explorer
        .children(Some(&TreeNode::Variables {
            folder,
            unresolved: 0,
        }))
        .await;

    assert_eq!(children.len(), 1);
    let item = children[0].item();
    assert_eq!(
        item.description.as_deref(),
        Some("Unable to retrieve environment variables")
    );
    assert_eq!(item.command.map(|c| c.command), Some(CREATE_ENV.to_string()));
}

#[tokio::test]
async fn test_library_list_keeps_host_order() {
    let dir = create_workspace(Some(r#"{ "curlib": "PAYLIB" }"#), None);
    let host = ScriptedHost {
        library_list: Some(vec![
            record("QSYS", "SYS"),
            record("PAYLIB", "CUR"),
            record("ZTOOLS", "USR"),
            record("BROKEN", "XXX"),
            record("ATOOLS", "USR"),
        ]),
        ..ScriptedHost::connected()
    };
    let explorer = explorer_for(Some(host), &[dir.path()]);

    let project = project_node(&explorer).await;
    let library_list = child_of_kind(&explorer, &project, NodeKind::LibraryList).await;
    let children = explorer.children(Some(&library_list)).await;

    assert_eq!(labels(&children), vec!["QSYS", "PAYLIB", "ZTOOLS", "ATOOLS"]);
    let descriptions: Vec<_> = children
        .iter()
        .map(|node| node.item().description.unwrap_or_default())
        .collect();
    assert_eq!(descriptions, vec!["System", "Current", "User", "User"]);
}

#[tokio::test]
async fn test_library_list_failure_is_empty() {
    let dir = create_workspace(Some("{}"), None);
    let host = ScriptedHost {
        library_list: None,
        ..ScriptedHost::connected()
    };
    let explorer = explorer_for(Some(host), &[dir.path()]);

    let project = project_node(&explorer).await;
    let library_list = child_of_kind(&explorer, &project, NodeKind::LibraryList).await;

    assert!(explorer.children(Some(&library_list)).await.is_empty());
}

#[tokio::test]
async fn test_library_list_from_detached_host() {
    let dir = create_workspace(
        Some(r#"{ "curlib": "paylib", "preUsrlibl": ["tools"], "postUsrlibl": ["qgpl"] }"#),
        None,
    );
    let explorer = explorer_for(Some(DetachedHost::default()), &[dir.path()]);

    let project = project_node(&explorer).await;
    let library_list = child_of_kind(&explorer, &project, NodeKind::LibraryList).await;
    let children = explorer.children(Some(&library_list)).await;

    let libraries: Vec<_> = children
        .into_iter()
        .filter_map(|node| match node {
            TreeNode::Library { library, .. } => Some(library),
            _ => None,
        })
        .collect();
    assert_eq!(
        libraries,
        vec![
            LibraryEntry::new("PAYLIB", LibraryKind::Current),
            LibraryEntry::new("TOOLS", LibraryKind::User),
            LibraryEntry::new("QGPL", LibraryKind::User),
        ]
    );
}

#[tokio::test]
async fn test_object_libraries_are_deduplicated() {
    let dir = create_workspace(
        Some(r#"{ "curlib": "LIBA", "preUsrlibl": ["LIBB", "liba"], "objlib": "libb" }"#),
        None,
    );
    let explorer = explorer_for(Some(ScriptedHost::connected()), &[dir.path()]);

    let project = project_node(&explorer).await;
    let object_library = child_of_kind(&explorer, &project, NodeKind::ObjectLibrary).await;
    let children = explorer.children(Some(&object_library)).await;

    assert_eq!(labels(&children), vec!["LIBA", "LIBB"]);
}

#[tokio::test]
async fn test_include_paths_resolve_each_kind() {
    let dir = create_workspace(None, None);
    let local_headers = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("qprotosrc")).unwrap();
    create_file(&dir.path().join("qprotosrc").join("payroll.rpgleinc"), "");

    let metadata = format!(
        r#"{{ "includePath": ["qprotosrc", "/QIBM/include", "common/copy", "{}"] }}"#,
        local_headers.path().display()
    );
    create_file(&dir.path().join("iproj.json"), &metadata);

    let host = ScriptedHost::connected().deployed(dir.path(), "/home/dev/payroll");
    let explorer = explorer_for(Some(host), &[dir.path()]);

    let project = project_node(&explorer).await;
    let include_paths = child_of_kind(&explorer, &project, NodeKind::IncludePaths).await;
    let children = explorer.children(Some(&include_paths)).await;

    assert_eq!(
        kinds(&children),
        vec![
            NodeKind::LocalIncludePath,
            NodeKind::RemoteIncludePath,
            NodeKind::RemoteIncludePath,
            NodeKind::LocalIncludePath,
        ]
    );
    assert!(matches!(
        &children[0],
        TreeNode::LocalIncludePath { path, .. } if *path == dir.path().join("qprotosrc")
    ));
    assert!(matches!(
        &children[1],
        TreeNode::RemoteIncludePath { path, .. } if path == "/QIBM/include"
    ));
    assert!(matches!(
        &children[2],
        TreeNode::RemoteIncludePath { declared, path, .. }
            if declared == "common/copy" && path == "/home/dev/payroll/common/copy"
    ));
    assert!(matches!(
        &children[3],
        TreeNode::LocalIncludePath { path, .. } if path == local_headers.path()
    ));

    let files = explorer.children(Some(&children[0])).await;
    assert_eq!(
        files,
        vec![TreeNode::LocalFile {
            path: dir.path().join("qprotosrc").join("payroll.rpgleinc"),
        }]
    );
}

#[tokio::test]
async fn test_blank_include_path_is_placeholder() {
    let dir = create_workspace(Some(r#"{ "includePath": ["qprotosrc", "  "] }"#), None);
    fs::create_dir(dir.path().join("qprotosrc")).unwrap();
    let explorer = explorer_for(Some(ScriptedHost::connected()), &[dir.path()]);

    let project = project_node(&explorer).await;
    let include_paths = child_of_kind(&explorer, &project, NodeKind::IncludePaths).await;
    let children = explorer.children(Some(&include_paths)).await;

    assert_eq!(
        kinds(&children),
        vec![NodeKind::LocalIncludePath, NodeKind::Placeholder]
    );
    assert_eq!(children[1].item().label, "(empty)");
    assert_eq!(
        children[1].item().description.as_deref(),
        Some("Include path is empty.")
    );
}

#[tokio::test]
async fn test_include_path_without_deployment_is_placeholder() {
    let dir = create_workspace(Some(r#"{ "includePath": ["common/copy"] }"#), None);
    let explorer = explorer_for(Some(ScriptedHost::connected()), &[dir.path()]);

    let project = project_node(&explorer).await;
    let include_paths = child_of_kind(&explorer, &project, NodeKind::IncludePaths).await;
    let children = explorer.children(Some(&include_paths)).await;

    assert_eq!(children.len(), 1);
    let item = children[0].item();
    assert_eq!(item.label, "common/copy");
    assert_eq!(
        item.command.map(|c| c.command),
        Some(SET_DEPLOY_LOCATION.to_string())
    );
}

#[tokio::test]
async fn test_library_objects_and_members() {
    let dir = create_workspace(Some("{}"), None);
    let host = ScriptedHost {
        objects: vec![
            ObjectInfo {
                library: "PAYLIB".to_string(),
                name: "QRPGLESRC".to_string(),
                kind: "*FILE".to_string(),
                attribute: "PF".to_string(),
                text: "RPG sources".to_string(),
            },
            ObjectInfo {
                library: "PAYLIB".to_string(),
                name: "PAYCALC".to_string(),
                kind: "*PGM".to_string(),
                attribute: "RPGLE".to_string(),
                text: String::new(),
            },
        ],
        members: vec![MemberInfo {
            library: "PAYLIB".to_string(),
            file: "QRPGLESRC".to_string(),
            name: "PAYCALC".to_string(),
            extension: "RPGLE".to_string(),
            text: "Pay calculation".to_string(),
        }],
        ..ScriptedHost::connected()
    };
    let explorer = explorer_for(Some(host), &[dir.path()]);
    let library = TreeNode::Library {
        folder: WorkspaceFolder::new(0, dir.path()),
        library: LibraryEntry::new("PAYLIB", LibraryKind::User),
    };

    let objects = explorer.children(Some(&library)).await;

    assert_eq!(labels(&objects), vec!["QRPGLESRC.FILE", "PAYCALC.PGM"]);
    assert!(objects[0].is_expandable());
    assert!(!objects[1].is_expandable());
    assert!(matches!(
        &objects[0],
        TreeNode::ObjectFile { path, .. } if path == "/QSYS.LIB/PAYLIB.LIB/QRPGLESRC.FILE"
    ));

    let members = explorer.children(Some(&objects[0])).await;
    assert_eq!(labels(&members), vec!["PAYCALC.RPGLE"]);
    assert!(matches!(
        &members[0],
        TreeNode::MemberFile { path, .. }
            if path == "/QSYS.LIB/PAYLIB.LIB/QRPGLESRC.FILE/PAYCALC.RPGLE"
    ));
}

#[tokio::test]
async fn test_source_folder_lists_remote_directory() {
    let dir = create_workspace(Some("{}"), None);
    let host = ScriptedHost {
        files: vec![
            IfsEntry {
                path: "/home/dev/payroll/qrpglesrc".to_string(),
                kind: IfsEntryKind::Directory,
            },
            IfsEntry {
                path: "/home/dev/payroll/Rules.mk".to_string(),
                kind: IfsEntryKind::Streamfile,
            },
            IfsEntry {
                path: "/home/dev/payroll/qrpglesrc/paycalc.rpgle".to_string(),
                kind: IfsEntryKind::Streamfile,
            },
        ],
        ..ScriptedHost::connected().deployed(dir.path(), "/home/dev/payroll")
    };
    let explorer = explorer_for(Some(host), &[dir.path()]);

    let project = project_node(&explorer).await;
    let source = child_of_kind(&explorer, &project, NodeKind::IfsFolder).await;
    let children = explorer.children(Some(&source)).await;

    assert_eq!(kinds(&children), vec![NodeKind::IfsFolder, NodeKind::Streamfile]);
    assert_eq!(labels(&children), vec!["qrpglesrc", "Rules.mk"]);
}

#[tokio::test]
async fn test_contributed_children_follow_builtin_ones() {
    let dir = create_workspace(Some("{}"), None);
    let explorer = explorer_for(Some(ScriptedHost::connected()), &[dir.path()]);
    explorer.push_extensible_children(|context| {
        vec![TreeNode::Contributed(ContributedNode {
            folder: context.folder().clone(),
            label: "Job Log".to_string(),
            description: None,
            context_value: "jobLog".to_string(),
            icon: None,
            command: None,
        })]
    });

    let project = project_node(&explorer).await;
    let children = explorer.children(Some(&project)).await;

    assert_eq!(children.len(), 6);
    let contributed = children[5].item();
    assert_eq!(contributed.label, "Job Log");
    assert_eq!(contributed.context_value, "jobLog");
}

#[tokio::test]
async fn test_refresh_rereads_project_metadata() {
    let dir = create_workspace(Some(r#"{ "description": "Before" }"#), None);
    let explorer = explorer_for(Some(ScriptedHost::connected()), &[dir.path()]);
    let mut events = explorer.subscribe();

    let before = project_node(&explorer).await;
    assert_eq!(before.item().description.as_deref(), Some("Before"));

    create_file(&dir.path().join("iproj.json"), r#"{ "description": "After" }"#);
    let cached = project_node(&explorer).await;
    assert_eq!(cached.item().description.as_deref(), Some("Before"));

    explorer.refresh();
    assert_eq!(events.recv().await.unwrap(), RefreshEvent::All);

    let after = project_node(&explorer).await;
    assert_eq!(after.item().description.as_deref(), Some("After"));

    explorer.refresh_node(&after);
    assert_eq!(events.recv().await.unwrap(), RefreshEvent::Node(after));
}

#[tokio::test]
async fn test_expanding_nodes_of_unopened_folder_leaves_registry_alone() {
    let opened = create_workspace(Some("{}"), None);
    let closed = create_workspace(Some(r#"{ "curlib": "&CURLIB" }"#), Some("CURLIB=X\n"));
    let explorer = explorer_for(Some(ScriptedHost::connected()), &[opened.path()]);
    let registry = explorer.registry();
    registry.clear_active();

    let folder = WorkspaceFolder::new(7, closed.path());
    let nodes = [
        TreeNode::Project {
            folder: folder.clone(),
            description: None,
        },
        TreeNode::Variables {
            folder: folder.clone(),
            unresolved: 0,
        },
        TreeNode::LibraryList {
            folder: folder.clone(),
        },
        TreeNode::ObjectLibrary {
            folder: folder.clone(),
        },
        TreeNode::IncludePaths { folder },
    ];

    for node in &nodes {
        assert!(explorer.children(Some(node)).await.is_empty());
    }

    assert_eq!(registry.len(), 1);
    assert!(registry.active().is_none());
}

#[tokio::test]
async fn test_stale_node_does_not_reach_the_folder_now_at_its_index() {
    let old = create_workspace(Some(r#"{ "curlib": "OLDLIB" }"#), None);
    let new = create_workspace(Some(r#"{ "curlib": "NEWLIB" }"#), None);
    let explorer = explorer_for(Some(ScriptedHost::connected()), &[old.path()]);
    let stale = TreeNode::ObjectLibrary {
        folder: WorkspaceFolder::new(0, old.path()),
    };

    explorer.set_workspace_folders(WorkspaceFolder::from_roots([new.path().to_path_buf()]));

    assert!(explorer.children(Some(&stale)).await.is_empty());
    assert_eq!(explorer.registry().len(), 1);
}

#[tokio::test]
async fn test_workspace_folder_change_replaces_projects() {
    let first = create_workspace(Some("{}"), None);
    let second = create_workspace(Some("{}"), None);
    let explorer = explorer_for(Some(ScriptedHost::connected()), &[first.path()]);
    assert_eq!(explorer.registry().len(), 1);

    explorer.set_workspace_folders(WorkspaceFolder::from_roots([
        second.path().to_path_buf(),
    ]));

    let registry = explorer.registry();
    assert_eq!(registry.len(), 1);
    let active = registry.active().expect("no active project");
    assert_eq!(active.folder().root, second.path());
    assert!(
        registry
            .find_by_path(&first.path().join("qrpglesrc"))
            .is_none()
    );
}

#[tokio::test]
async fn test_expand_serializes_tree() {
    let dir = create_workspace(Some(r#"{ "description": "Payroll" }"#), None);
    let explorer = explorer_for(Some(ScriptedHost::connected()), &[dir.path()]);

    let tree = explorer.expand(2).await;

    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].children.len(), 5);
    assert!(tree[0].children.iter().all(|child| child.children.is_empty()));

    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json[0]["description"], "Payroll");
    assert_eq!(json[0]["contextValue"], "project");
    assert_eq!(json[0]["children"][2]["label"], "Library List");
}

#[tokio::test]
async fn test_expand_depth_one_lists_top_level_only() {
    let dir = create_workspace(Some("{}"), None);
    let explorer = explorer_for(Some(ScriptedHost::connected()), &[dir.path()]);

    let tree = explorer.expand(1).await;

    assert_eq!(tree.len(), 1);
    assert!(tree[0].children.is_empty());
}

#[tokio::test]
async fn test_project_lookup_by_path() {
    let dir = create_workspace(Some("{}"), None);
    let explorer = explorer_for(Some(ScriptedHost::connected()), &[dir.path()]);

    let file: PathBuf = dir.path().join("qrpglesrc").join("paycalc.rpgle");
    let context = explorer
        .registry()
        .find_by_path(&file)
        .expect("file not inside a project");

    assert_eq!(context.folder().root, dir.path());
}
