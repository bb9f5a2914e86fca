//! Include path resolution.
//!
//! A project declares its include directories as plain strings. Each one may
//! name a local directory (absolute, or relative to the workspace root) or a
//! directory on the host (absolute, or relative to where the project is
//! deployed). [`IncludePathResolver`] decides which, in this order:
//!
//! 1. the string as an absolute local path exists → [`ResolvedIncludePath::LocalAbsolute`]
//! 2. the string joined onto the workspace root exists → [`ResolvedIncludePath::LocalRelative`]
//! 3. the string starts with `/` → [`ResolvedIncludePath::RemoteAbsolute`]
//! 4. otherwise it is joined onto the deployment directory → [`ResolvedIncludePath::RemoteRelative`]
//!
//! Only the local rules probe for existence. Nothing is checked on the host,
//! so a local directory that cannot be read (for example because of sandbox
//! permissions) is classified as remote.

use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::host::{Deployment, FileProbe};

/// Where a declared include path points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResolvedIncludePath {
    LocalAbsolute {
        path: PathBuf,
    },
    LocalRelative {
        path: String,
        resolved: PathBuf,
    },
    RemoteAbsolute {
        path: String,
    },
    RemoteRelative {
        declared: String,
        resolved: String,
    },
}

impl ResolvedIncludePath {
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::LocalAbsolute { .. } | Self::LocalRelative { .. })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("include path is empty")]
    Empty,

    #[error("no remote deployment directory is configured for '{}'", .root.display())]
    UnmappedDeployment { root: PathBuf },
}

/// Resolves declared include paths against the local disk and the deployment mapping.
pub struct IncludePathResolver<'a> {
    probe: &'a dyn FileProbe,
}

impl<'a> IncludePathResolver<'a> {
    #[must_use]
    pub const fn new(probe: &'a dyn FileProbe) -> Self {
        Self { probe }
    }

    /// Classify `declared` for the workspace at `root`.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Empty`] when `declared` is blank
    /// - [`ResolveError::UnmappedDeployment`] when the path can only be
    ///   remote-relative and `deployment` has no entry for `root`
    pub async fn resolve(
        &self,
        declared: &str,
        root: &Path,
        deployment: &Deployment,
    ) -> Result<ResolvedIncludePath, ResolveError> {
        if declared.trim().is_empty() {
            return Err(ResolveError::Empty);
        }

        let absolute = as_local_absolute(declared);
        if self.probe.exists(&absolute).await {
            return Ok(ResolvedIncludePath::LocalAbsolute { path: absolute });
        }

        let relative = root.join(declared);
        if self.probe.exists(&relative).await {
            return Ok(ResolvedIncludePath::LocalRelative {
                path: declared.to_string(),
                resolved: relative,
            });
        }

        debug!(declared, "Include path not found locally, treating as remote");
        resolve_remote(declared, root, deployment)
    }
}

/// Rules 3 and 4: classification by syntax alone.
///
/// # Errors
///
/// Returns [`ResolveError::UnmappedDeployment`] when `declared` is relative
/// and `root` has no deployment directory.
pub fn resolve_remote(
    declared: &str,
    root: &Path,
    deployment: &Deployment,
) -> Result<ResolvedIncludePath, ResolveError> {
    if declared.starts_with('/') {
        return Ok(ResolvedIncludePath::RemoteAbsolute {
            path: declared.to_string(),
        });
    }

    let remote_dir = deployment
        .get(root)
        .ok_or_else(|| ResolveError::UnmappedDeployment {
            root: root.to_path_buf(),
        })?;

    Ok(ResolvedIncludePath::RemoteRelative {
        declared: declared.to_string(),
        resolved: posix_join(remote_dir, declared),
    })
}

/// Read `declared` as a local absolute path, rooting it if it is not one.
fn as_local_absolute(declared: &str) -> PathBuf {
    let path = Path::new(declared);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        Path::new(MAIN_SEPARATOR_STR).join(path)
    }
}

/// Join two remote paths with `/` separators and normalize the result.
///
/// `.` segments and empty segments are dropped and `..` removes the previous
/// segment, never climbing above the root of an absolute path.
#[must_use]
pub fn posix_join(base: &str, path: &str) -> String {
    let joined = if base.is_empty() {
        path.to_string()
    } else {
        format!("{base}/{path}")
    };
    let absolute = joined.starts_with('/');
    let mut out: Vec<&str> = Vec::new();

    for segment in joined.split('/') {
        match segment {
            "" | "." => (),
            ".." => match out.last() {
                Some(&"..") | None if !absolute => out.push(segment),
                Some(&"..") | None => (),
                Some(_) => {
                    out.pop();
                }
            },
            segment => out.push(segment),
        }
    }

    let body = out.join("/");
    match (absolute, body.is_empty()) {
        (true, _) => format!("/{body}"),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}
