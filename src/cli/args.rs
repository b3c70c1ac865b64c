//! CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Python repository documentation tool
#[derive(Parser, Debug)]
#[command(name = "pydoctree")]
#[command(about = "Discover python repository modules and generate sphinx documentation")]
#[command(version)]
pub struct Args {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate and list repository documentation
    Documentation {
        #[command(subcommand)]
        command: DocumentationCommand,
    },

    /// Show and update the package version
    Version {
        #[command(subcommand)]
        command: VersionCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum DocumentationCommand {
    /// Generate documentation for a repository
    Generate {
        /// Path to the python repository
        repository: PathBuf,

        /// Documentation output type
        #[arg(short = 't', long = "type", default_value = "sphinx")]
        output_type: String,

        /// Output directory, defaults to the configured document path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Glob patterns to exclude (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,
    },

    /// List python files or modules in a repository
    List {
        /// Path to the python repository
        repository: PathBuf,

        /// Items to list
        #[arg(short, long, value_enum, default_value_t = ListOutput::Files)]
        output: ListOutput,

        /// Glob patterns to exclude (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum VersionCommand {
    /// Show the package version
    Show {
        /// Path to the python repository
        repository: PathBuf,
    },

    /// Update the package version in the main module
    Update {
        /// Path to the python repository
        repository: PathBuf,

        /// New version
        version: String,
    },
}

/// Output mode of `documentation list`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutput {
    /// Relative paths of python files
    Files,
    /// Dotted import paths of modules
    Modules,
}
