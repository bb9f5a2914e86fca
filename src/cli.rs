use std::path::PathBuf;

use clap::Parser;
use ibmi_project_explorer::config::FileConfig;

/// Levels expanded when neither the command line nor the config file says.
const DEFAULT_DEPTH: usize = 3;

#[derive(Parser)]
struct OutputArgs {
    /// How many levels of the tree to expand
    #[arg(short = 'd', long)]
    depth: Option<usize>,

    /// Print the expanded tree as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
#[command(name = "ibmi-projects")]
#[command(about = "Show the IBM i projects of one or more workspace folders")]
pub(crate) struct Cli {
    /// Workspace folders to open
    #[arg(default_value = ".")]
    pub(crate) dirs: Vec<PathBuf>,

    /// Choose one project interactively instead of showing all of them
    #[arg(short = 's', long)]
    select: bool,

    /// Output options
    #[command(flatten)]
    output: OutputArgs,
}

impl Cli {
    pub(crate) const fn json(&self) -> bool {
        self.output.json
    }

    pub(crate) fn depth(&self, config: &FileConfig) -> usize {
        self.output.depth.or(config.depth).unwrap_or(DEFAULT_DEPTH)
    }

    pub(crate) fn select(&self, config: &FileConfig) -> bool {
        self.select || config.interactive.unwrap_or(false)
    }
}
