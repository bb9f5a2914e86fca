//! Metadata store backed by the files in the workspace folder.
//!
//! A project keeps its metadata in `iproj.json` and its variable values in
//! `.env`, both at the workspace root. Variables are referenced from the
//! metadata as `&NAME` (for example `"curlib": "&CURLIB"`).

use std::{
    collections::HashSet,
    io::ErrorKind,
    path::PathBuf,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::{
    host::{EnvValues, MetadataStore},
    project::{ENV_FILE, METADATA_FILE, ProjectState},
};

/// Reads project files straight from disk.
pub struct FsMetadataStore {
    root: PathBuf,
}

impl FsMetadataStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Contents of a project file, `None` if it does not exist.
    async fn read(&self, name: &str) -> Result<Option<String>> {
        let path = self.root.join(name);

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

#[async_trait]
impl MetadataStore for FsMetadataStore {
    async fn project_file_exists(&self, name: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.path_of(name)).await?)
    }

    async fn get_state(&self) -> Result<Option<ProjectState>> {
        let Some(content) = self.read(METADATA_FILE).await? else {
            return Ok(None);
        };

        let state = ProjectState::from_json(&content).with_context(|| {
            format!("Failed to parse {}", self.path_of(METADATA_FILE).display())
        })?;

        Ok(Some(state))
    }

    async fn get_env(&self) -> Result<Option<EnvValues>> {
        let Some(content) = self.read(ENV_FILE).await? else {
            return Ok(None);
        };

        let values = dotenvy::from_read_iter(content.as_bytes())
            .collect::<Result<EnvValues, _>>()
            .with_context(|| format!("Failed to parse {}", self.path_of(ENV_FILE).display()))?;

        Ok(Some(values))
    }

    async fn get_variables(&self) -> Result<Vec<String>> {
        let Some(content) = self.read(METADATA_FILE).await? else {
            return Ok(Vec::new());
        };

        let metadata: Value = serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse {}", self.path_of(METADATA_FILE).display())
        })?;

        Ok(referenced_variables(&metadata))
    }
}

/// Every `&NAME` reference inside the string values of `metadata`, in the
/// order they first appear.
#[must_use]
pub fn referenced_variables(metadata: &Value) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    collect_references(metadata, &mut seen, &mut names);
    names
}

fn collect_references(value: &Value, seen: &mut HashSet<String>, names: &mut Vec<String>) {
    match value {
        Value::String(text) => {
            for name in variable_references(text) {
                if seen.insert(name.to_string()) {
                    names.push(name.to_string());
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_references(item, seen, names);
            }
        }
        Value::Object(map) => {
            for item in map.values() {
                collect_references(item, seen, names);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => (),
    }
}

fn variable_references(text: &str) -> impl Iterator<Item = &str> {
    text.split('&').skip(1).filter_map(|rest| {
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        (end > 0).then(|| &rest[..end])
    })
}
