//! Library list parsing.
//!
//! The host reports a job's library list as fixed-format records: the library
//! name left-justified in the first 10 columns and a type code (`SYS`, `CUR`
//! or `USR`) from column 12 to the end of the line. [`parse_library_list`]
//! turns those records into [`LibraryEntry`] values in search order.
//!
//! [`object_libraries`] builds the separate "object library" view of a
//! project: every library it declares, folded to uppercase and de-duplicated.

use std::{
    collections::HashSet,
    fmt::{Display, Formatter, Result},
};

use serde::Serialize;

use crate::project::ProjectState;

/// Width of the name field in a library list record.
const NAME_WIDTH: usize = 10;

/// Column where the type code starts.
const TYPE_OFFSET: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryKind {
    System,
    Current,
    User,

    /// Position in the library list does not matter
    Generic,
}

impl LibraryKind {
    /// Parse a type code. Codes are matched exactly.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "SYS" => Some(Self::System),
            "CUR" => Some(Self::Current),
            "USR" => Some(Self::User),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> Option<&'static str> {
        match self {
            Self::System => Some("SYS"),
            Self::Current => Some("CUR"),
            Self::User => Some("USR"),
            Self::Generic => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LibraryEntry {
    pub name: String,
    pub kind: LibraryKind,
}

impl LibraryEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: LibraryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Integrated file system path of the library.
    #[must_use]
    pub fn qsys_path(&self) -> String {
        format!("/QSYS.LIB/{}.LIB", self.name)
    }

    /// Format the entry as a library list record.
    ///
    /// `None` for [`LibraryKind::Generic`], which has no type code.
    #[must_use]
    pub fn to_record(&self) -> Option<String> {
        self.kind
            .code()
            .map(|code| format!("{:<width$}  {code}", self.name, width = NAME_WIDTH))
    }
}

impl Display for LibraryEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.name)
    }
}

/// Parse library list records, keeping their order.
///
/// Records with an unknown type code are skipped.
pub fn parse_library_list<I, S>(lines: I) -> Vec<LibraryEntry>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| parse_record(line.as_ref()))
        .collect()
}

fn parse_record(line: &str) -> Option<LibraryEntry> {
    let code: String = line.chars().skip(TYPE_OFFSET).collect();
    let kind = LibraryKind::from_code(&code)?;
    let name: String = line.chars().take(NAME_WIDTH).collect();

    Some(LibraryEntry::new(name.trim(), kind))
}

/// Every library a project declares, uppercased and de-duplicated.
///
/// The current library comes first, then the pre and post user libraries,
/// then the object library. The result is not in library list order.
#[must_use]
pub fn object_libraries(state: &ProjectState) -> Vec<LibraryEntry> {
    let declared = state
        .curlib
        .iter()
        .chain(&state.pre_usrlibl)
        .chain(&state.post_usrlibl)
        .chain(&state.objlib);

    let mut seen = HashSet::new();
    declared
        .map(|name| name.to_uppercase())
        .filter(|name| seen.insert(name.clone()))
        .map(|name| LibraryEntry::new(name, LibraryKind::Generic))
        .collect()
}
