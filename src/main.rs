//! # ibmi-projects
//!
//! Show the IBM i projects found in one or more workspace folders as a tree.
//!
//! Every folder holding an `iproj.json` is a project. The tool expands each
//! project the way the project panel of an editor would: source directory,
//! variables from `.env`, library list, object libraries and include paths.
//! Nothing is sent to the host; remote locations come from the `[deployment]`
//! table of `~/.config/ibmi-projects/config.toml`.
//!
//! ## Usage
//!
//! ```bash
//! # Show the project in the current directory
//! ibmi-projects
//!
//! # Several workspace folders, two levels deep
//! ibmi-projects ~/work/payroll ~/work/billing --depth 2
//!
//! # Choose one project, print it as JSON
//! ibmi-projects ~/work/* --select --json
//! ```

mod cli;
mod picker;

use std::{path::PathBuf, process::exit, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::Cli;
use colored::Colorize;
use ibmi_project_explorer::{
    config::{FileConfig, init_tracing},
    detached::DetachedHost,
    host::{MetadataStore, OsFileProbe},
    project::ProjectRegistry,
    store::FsMetadataStore,
    tree::{Collapsible, ExpandedNode, NodeKind, ProjectExplorer, TreeNode},
    workspace::WorkspaceFolder,
};
use picker::InquirePicker;

/// Entry point for the ibmi-projects application.
///
/// This function handles all errors gracefully by calling [`inner_main`] and printing
/// any errors to stderr before exiting with a non-zero status code.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err:#}");

        exit(1);
    }
}

/// Main application logic that can return errors.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Loads the persistent configuration file (if present)
/// 3. Sets up tracing
/// 4. Opens the given directories as workspace folders
/// 5. Optionally lets the user pick a single project
/// 6. Expands the tree and prints it, as JSON when `--json` is active
///
/// # Errors
///
/// This function can return errors from:
/// - Resolving the workspace directories
/// - Starting the async runtime
/// - JSON serialization
fn inner_main() -> Result<()> {
    let args = Cli::parse();
    let json_mode = args.json();

    let file_config = match FileConfig::load() {
        Ok(config) => config,
        Err(e) => {
            if !json_mode {
                eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
            }
            FileConfig::default()
        }
    };

    init_tracing(file_config.log_level.as_deref());

    let select = args.select(&file_config);
    let depth = args.depth(&file_config);

    // --json is incompatible with --select
    if json_mode && select {
        bail!("--json and --select cannot be used together");
    }

    let roots = args
        .dirs
        .iter()
        .map(|dir| {
            dir.canonicalize()
                .with_context(|| format!("Cannot open workspace folder {}", dir.display()))
        })
        .collect::<Result<Vec<PathBuf>>>()?;

    let registry = Arc::new(ProjectRegistry::new(Box::new(|folder: &WorkspaceFolder| {
        Arc::new(FsMetadataStore::new(&folder.root)) as Arc<dyn MetadataStore>
    })));
    let host = DetachedHost::new(file_config.deployment());
    let explorer = ProjectExplorer::new(
        Arc::clone(&registry),
        Some(Arc::new(host)),
        Arc::new(OsFileProbe),
    );
    explorer.set_workspace_folders(WorkspaceFolder::from_roots(roots));

    let runtime = tokio::runtime::Runtime::new()?;
    let tree = runtime.block_on(async {
        if !select {
            return Some(explorer.expand(depth).await);
        }

        let context = registry.select_interactively(&InquirePicker).await?;
        registry.set_active(context.folder());

        let project = TreeNode::Project {
            folder: context.folder().clone(),
            description: context.state().await.map(|state| state.description.clone()),
        };
        Some(vec![
            explorer
                .expand_node(&project, depth.saturating_sub(1))
                .await,
        ])
    });

    let Some(tree) = tree else {
        println!("{}", "No project selected.".yellow());
        return Ok(());
    };

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else if tree.is_empty() {
        println!("{}", "No projects found.".yellow());
    } else {
        print_tree(&tree, 0);
    }

    Ok(())
}

/// Print expanded nodes as an indented tree.
///
/// # Output Format
///
/// ```text
/// ▾ payroll  Payroll application
///   ▸ Source
///   ▸ Variables  1 unresolved
///   ▾ Include Paths
///       common/copy  Please configure remote directory.
/// ```
fn print_tree(nodes: &[ExpandedNode], level: usize) {
    let indent = "  ".repeat(level);

    for node in nodes {
        let item = &node.item;
        let marker = match (item.collapsible, node.children.is_empty()) {
            (Collapsible::None, _) => " ",
            (Collapsible::Collapsed, true) => "▸",
            (Collapsible::Collapsed, false) => "▾",
        };

        let label = if item.context_value == NodeKind::Placeholder.context_value() {
            item.label.yellow()
        } else if item.context_value == NodeKind::Project.context_value() {
            item.label.bright_white().bold()
        } else {
            item.label.normal()
        };

        match &item.description {
            Some(description) => println!("{indent}{marker} {label}  {}", description.dimmed()),
            None => println!("{indent}{marker} {label}"),
        }

        print_tree(&node.children, level + 1);
    }
}
