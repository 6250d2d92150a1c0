//! Handling the xwave CLI
//!
//! This module handles the command line parsing as well as basic information (e.g. help dialog, version information, etc.).
use crate::{
    error::{XwResult, XwaveError},
    get_version,
};
use clap::{builder::Str, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// The task to be run by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// refractive corrector job
    Correct,
    /// Gaussian Schell-model source synthesis
    Gsm,
}

/// Command line arguments for the xwave application (after validation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// task to be run
    pub task: Task,
    /// file path of the job / config file
    pub file_path: PathBuf,
    /// destination directory of the output files. if not defined, the directory of the job file is used
    pub output_directory: PathBuf,
    /// YAML file with scattering factor tables for the material database
    pub scattering_tables: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(author, version = Str::from(get_version()), about, long_about = None)]
pub struct PartialArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// compute the profile of a refractive corrector and the corrected wavefront
    Correct {
        /// YAML file describing the corrector job
        job_file: PathBuf,
        /// destination directory of the output files
        #[arg(short, long)]
        output_directory: Option<PathBuf>,
        /// YAML file with scattering factor tables (free electron limit if omitted)
        #[arg(short = 't', long)]
        scattering_tables: Option<PathBuf>,
    },
    /// synthesize a coherent mode of a Gaussian Schell-model undulator source
    Gsm {
        /// YAML file holding the synthesizer configuration
        config_file: PathBuf,
        /// destination directory of the output files
        #[arg(short, long)]
        output_directory: Option<PathBuf>,
    },
}

/// Checks if the passed file path points to an existing YAML file.
fn file_path_is_valid(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml")
}

/// Returns the directory containing `path` (the current directory for a bare file name).
fn get_parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn eval_output_directory(file_path: &Path, output_directory: Option<PathBuf>) -> XwResult<PathBuf> {
    match output_directory {
        None => Ok(get_parent_dir(file_path)),
        Some(dir) if dir.is_dir() => Ok(dir),
        Some(dir) => Err(XwaveError::Console(format!(
            "output directory {} does not exist",
            dir.display()
        ))),
    }
}

impl TryFrom<PartialArgs> for Args {
    type Error = XwaveError;

    fn try_from(part_args: PartialArgs) -> XwResult<Self> {
        let (task, file_path, output_directory, scattering_tables) = match part_args.command {
            Command::Correct {
                job_file,
                output_directory,
                scattering_tables,
            } => (Task::Correct, job_file, output_directory, scattering_tables),
            Command::Gsm {
                config_file,
                output_directory,
            } => (Task::Gsm, config_file, output_directory, None),
        };
        for path in std::iter::once(&file_path).chain(scattering_tables.iter()) {
            if !file_path_is_valid(path) {
                return Err(XwaveError::Console(format!(
                    "{} is not an existing YAML file",
                    path.display()
                )));
            }
        }
        let output_directory = eval_output_directory(&file_path, output_directory)?;
        Ok(Self {
            task,
            file_path,
            output_directory,
            scattering_tables,
        })
    }
}

/// Creates the intro banner.
#[must_use]
fn create_intro() -> String {
    format!(
        "{: ^79}\n{: ^79}\n",
        "xwave - X-ray wavefront correction and Gaussian Schell-model source synthesis",
        "version ".to_owned() + &get_version()
    )
}

/// Show the application name and version information.
pub fn show_intro() {
    println!("{}", create_intro());
}
