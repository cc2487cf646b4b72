mod check;
mod clean;
mod generate;
mod list;

use std::path::PathBuf;

use check::CheckCommand;
use clap::{Args, Parser, Subcommand};
use clean::CleanCommand;
use eyre::Result;
use generate::GenerateCommand;
use list::ListCommand;
use shapegen_core::{GenerationTarget, LanguageWithVersion};
use shapegen_manifest::{MANIFEST_FILE, ShapegenToml};
use shapegen_model::Model;

use crate::ops::project::{Overrides, Project};

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for shapegen_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "shapegen")]
#[command(version)]
#[command(about = "Generate model code from TOML shape definitions")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log more detail
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log debugging output and turn on the debug switch for generators
    #[arg(long, global = true)]
    debug: bool,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose || self.debug
    }

    pub fn run(&self) -> Result<()> {
        let logging = Logging {
            verbose: self.verbose,
            debug: self.debug,
        };
        match &self.command {
            Commands::Generate(cmd) => cmd.run(logging),
            Commands::Check(cmd) => cmd.run(),
            Commands::List(cmd) => cmd.run(),
            Commands::Clean(cmd) => cmd.run(logging),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate code for the project in shapegen.toml
    Generate(GenerateCommand),

    /// Validate shapegen.toml and its model files without generating code
    Check(CheckCommand),

    /// List the available generators
    List(ListCommand),

    /// Delete previously generated code from every destination root
    Clean(CleanCommand),
}

/// Global logging flags, handed to commands that run a session.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Logging {
    pub verbose: bool,
    pub debug: bool,
}

/// Arguments shared by every command that loads a project.
#[derive(Args)]
pub(crate) struct ProjectArgs {
    /// Path to shapegen.toml (defaults to ./shapegen.toml)
    #[arg(short, long, default_value = MANIFEST_FILE)]
    pub manifest: PathBuf,

    /// Language to generate, e.g. `java-17` (repeatable, replaces the manifest's list)
    #[arg(short, long = "language")]
    pub languages: Vec<LanguageWithVersion>,

    /// Generation target, e.g. `model` (repeatable, replaces the manifest's list)
    #[arg(short, long = "target")]
    pub targets: Vec<GenerationTarget>,

    /// Only generate shapes in this namespace (repeatable)
    #[arg(short, long = "namespace")]
    pub namespaces: Vec<String>,

    /// Set a generator setting (`key=value`, repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub settings: Vec<(String, String)>,

    /// Set a destination (`key=path`, repeatable), e.g. `java.model=src/main/java`
    #[arg(long = "dest", value_name = "KEY=PATH", value_parser = parse_key_value)]
    pub destinations: Vec<(String, String)>,
}

impl ProjectArgs {
    /// Open the manifest and its model files, exiting with a rendered
    /// diagnostic when either fails to parse.
    pub fn load(&self) -> (ShapegenToml, Model) {
        let toml = ShapegenToml::open(&self.manifest).unwrap_or_exit();
        let model = toml.load_model().unwrap_or_exit();
        (toml, model)
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            languages: self.languages.clone(),
            targets: self.targets.clone(),
            namespaces: self.namespaces.clone(),
            settings: self.settings.clone(),
            destinations: self.destinations.clone(),
        }
    }

    /// Load and merge everything into a [`Project`].
    pub fn project(&self, switches: crate::ops::project::Switches) -> Project {
        let (toml, model) = self.load();
        Project::new(&toml, model, self.overrides(), switches)
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
