//! Configuration for the command line tool.
//!
//! This module contains the persistent configuration file and the tracing
//! setup driven by it.

pub mod file;
pub mod logging;

pub use file::FileConfig;
pub use logging::init_tracing;
