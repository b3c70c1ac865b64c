//! CLI module for pydoctree

mod args;

pub use args::{Args, Command, DocumentationCommand, ListOutput, VersionCommand};

use crate::documentation::get_processor;
use crate::error::Result;
use crate::python::{Repository, RepositoryOptions};
use std::path::Path;
use std::process::ExitCode;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();
    init_logging(args.verbose);

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::new().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Documentation { command } => match command {
            DocumentationCommand::Generate {
                repository,
                output_type,
                output,
                exclude,
            } => {
                let processor = get_processor(&output_type, &repository, &exclude)?;
                let index = processor.generate_documentation(output.as_deref())?;
                log::info!("generated {}", index.display());
                Ok(())
            }
            DocumentationCommand::List {
                repository,
                output,
                exclude,
            } => {
                for line in list_repository(&repository, output, exclude)? {
                    println!("{}", line);
                }
                Ok(())
            }
        },
        Command::Version { command } => match command {
            VersionCommand::Show { repository } => {
                let repository = Repository::open(&repository, RepositoryOptions::default())?;
                println!("{}", repository.package_version()?);
                Ok(())
            }
            VersionCommand::Update {
                repository,
                version,
            } => {
                let repository = Repository::open(&repository, RepositoryOptions::default())?;
                let mut package_version = repository.package_version()?;
                package_version.update_module_version(&version)?;
                println!("{}", package_version);
                Ok(())
            }
        },
    }
}

/// Relative file paths or module import paths of a repository
pub fn list_repository(path: &Path, output: ListOutput, excluded: Vec<String>) -> Result<Vec<String>> {
    let repository = Repository::open(path, RepositoryOptions::default().with_excluded(excluded))?;
    let lines = match output {
        ListOutput::Files => repository
            .python_files()?
            .iter()
            .filter_map(|file| file.relative_path())
            .map(|path| path.display().to_string())
            .collect(),
        ListOutput::Modules => repository
            .python_modules()?
            .iter()
            .filter_map(|module| module.import_path())
            .map(|path| if path.is_empty() { ".".to_string() } else { path })
            .collect(),
    };
    Ok(lines)
}
