//! Project tree for the explorer panel.
//!
//! ## Main Parts
//!
//! - [`TreeNode`] - One row of the tree, tagged by [`NodeKind`]
//! - [`TreeItem`] - The presentation of a node (label, icon, command, ...)
//! - [`ProjectExplorer`] - Computes the children of a node on demand and
//!   publishes refresh events

pub mod explorer;
pub mod node;

pub use explorer::{ChildContributor, ExpandedNode, ProjectExplorer, RefreshEvent};
pub use node::{Collapsible, Command, ContributedNode, NodeKind, TreeItem, TreeNode};
