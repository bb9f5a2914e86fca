//! Project metadata model.
//!
//! [`ProjectState`] mirrors the keys of a project's `iproj.json`. Keys the
//! explorer does not use are ignored on load.

use serde::{Deserialize, Serialize};

/// Declared configuration of a project.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectState {
    /// Free-form description shown next to the project name
    pub description: String,

    pub version: Option<String>,

    pub repository: Option<String>,

    /// Current library of the build job
    pub curlib: Option<String>,

    /// User libraries placed at the beginning of the library list
    pub pre_usrlibl: Vec<String>,

    /// User libraries placed at the end of the library list
    pub post_usrlibl: Vec<String>,

    /// Include search directories, as declared (unresolved)
    pub include_path: Vec<String>,

    /// Library that receives compiled objects
    pub objlib: Option<String>,

    pub build_command: Option<String>,

    pub compile_command: Option<String>,
}

impl ProjectState {
    /// Parse the contents of an `iproj.json` file.
    ///
    /// # Errors
    ///
    /// Returns an error when `content` is not valid JSON or a known key has
    /// the wrong shape.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}
