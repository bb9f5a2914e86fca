//! A [`Connection`] for running without a live host.
//!
//! The command line tool has no IBM i session. [`DetachedHost`] stands in for
//! one: it reports itself connected, serves the deployment mapping from the
//! configuration file and builds the library list from what the project
//! declares. Remote listings come back empty.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::{
    host::{Connection, Deployment, IfsEntry, MemberInfo, ObjectInfo},
    library::{LibraryEntry, LibraryKind},
    project::ProjectState,
};

#[derive(Clone, Debug, Default)]
pub struct DetachedHost {
    deployment: Deployment,
}

impl DetachedHost {
    #[must_use]
    pub const fn new(deployment: Deployment) -> Self {
        Self { deployment }
    }

    /// Library list records for `state`, as a job started for the project
    /// would report them.
    ///
    /// The current library comes first, then the pre user libraries and the
    /// post user libraries. Names are uppercased.
    #[must_use]
    pub fn library_records(state: &ProjectState) -> Vec<String> {
        let current = state
            .curlib
            .iter()
            .map(|name| LibraryEntry::new(name.to_uppercase(), LibraryKind::Current));

        let user = state
            .pre_usrlibl
            .iter()
            .chain(&state.post_usrlibl)
            .map(|name| LibraryEntry::new(name.to_uppercase(), LibraryKind::User));

        current
            .chain(user)
            .filter_map(|entry| entry.to_record())
            .collect()
    }
}

#[async_trait]
impl Connection for DetachedHost {
    fn is_connected(&self) -> bool {
        true
    }

    fn deployment(&self) -> Deployment {
        self.deployment.clone()
    }

    async fn library_list(&self, state: &ProjectState) -> Result<Vec<String>> {
        Ok(Self::library_records(state))
    }

    async fn file_list(&self, remote_path: &str) -> Result<Vec<IfsEntry>> {
        debug!("No host session, not listing {remote_path}");
        Ok(Vec::new())
    }

    async fn object_list(&self, library: &str) -> Result<Vec<ObjectInfo>> {
        debug!("No host session, not listing objects in {library}");
        Ok(Vec::new())
    }

    async fn member_list(&self, library: &str, file: &str) -> Result<Vec<MemberInfo>> {
        debug!("No host session, not listing members of {library}/{file}");
        Ok(Vec::new())
    }
}
