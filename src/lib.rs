//! # ibmi-project-explorer
//!
//! Project registry, include-path resolution and a lazily expanded project
//! tree for IBM i development workspaces.
//!
//! Each open workspace folder may hold one project, described by an
//! `iproj.json` file at its root. This library keeps track of those projects,
//! resolves what they declare (include paths, library lists, environment
//! variables) against the local disk or the remote host, and exposes the
//! result as a tree whose children are only computed when a node is expanded.
//!
//! The host itself is reached through the traits in [`host`], so the same
//! tree can be driven by an editor integration, the bundled command line
//! tool or tests.

pub mod config;
pub mod detached;
pub mod host;
pub mod include_path;
pub mod library;
pub mod project;
pub mod store;
pub mod tree;
pub mod workspace;
