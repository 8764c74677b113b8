//! Subcommand handlers
//!
//! Each handler gets the loaded configuration and its own argument matches, writes its result
//! to stdout and returns a [CliError] for `main` to report.

use crate::scaffold::{scaffold, Outcome};
use clap::ArgMatches;
use forsure_config::ForsureConfig;
use forsure_parser::forsure::ast::{Node, ParseError};
use forsure_parser::forsure::defaults::{default_structure, ProjectType};
use forsure_parser::forsure::diff::diff;
use forsure_parser::forsure::editing::{EditCommand, EditError};
use forsure_parser::forsure::formats::{Format, FormatError};
use forsure_parser::forsure::loader::{DocumentLoader, LoaderError};
use std::fmt;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Path argument that reads the document from stdin.
const STDIN_PATH: &str = "-";

#[derive(Debug)]
pub enum CliError {
    Config(String),
    Io(String),
    /// A document failed to parse; `context` holds the surrounding source lines
    Parse { error: ParseError, context: String },
    Edit(EditError),
    Format(FormatError),
    Usage(String),
    /// The failure was already written to stdout
    Reported,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "configuration error: {}", msg),
            CliError::Io(msg) => write!(f, "{}", msg),
            CliError::Parse { error, context } => write!(f, "{}\n\n{}", error, context),
            CliError::Edit(err) => write!(f, "edit failed: {}", err),
            CliError::Format(err) => write!(f, "{}", err),
            CliError::Usage(msg) => write!(f, "{}", msg),
            CliError::Reported => Ok(()),
        }
    }
}

impl std::error::Error for CliError {}

impl From<EditError> for CliError {
    fn from(err: EditError) -> Self {
        CliError::Edit(err)
    }
}

impl From<FormatError> for CliError {
    fn from(err: FormatError) -> Self {
        CliError::Format(err)
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Io(err.to_string())
    }
}

fn path_arg<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or(STDIN_PATH)
}

fn load(path: &str) -> Result<DocumentLoader, CliError> {
    if path == STDIN_PATH {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        return Ok(DocumentLoader::from_string(source));
    }
    DocumentLoader::from_path(path).map_err(|err| CliError::Io(format!("{}: {}", path, err)))
}

fn parse_document(loader: &DocumentLoader, config: &ForsureConfig) -> Result<Node, CliError> {
    loader
        .parse(&config.parse_options())
        .map_err(|err| match err {
            LoaderError::ParseError(error) => CliError::Parse {
                context: loader.context_for(&error),
                error,
            },
            LoaderError::IoError(msg) => CliError::Io(msg),
        })
}

fn load_and_parse(path: &str, config: &ForsureConfig) -> Result<Node, CliError> {
    parse_document(&load(path)?, config)
}

fn format_arg(matches: &ArgMatches, config: &ForsureConfig) -> Result<Format, CliError> {
    match matches.get_one::<String>("format") {
        Some(name) => Ok(Format::from_str(name)?),
        None => Ok(config.render.format),
    }
}

fn project_type_arg(
    matches: &ArgMatches,
    id: &str,
    config: &ForsureConfig,
) -> Result<ProjectType, CliError> {
    match matches.get_one::<String>(id) {
        Some(name) => ProjectType::from_str(name).map_err(CliError::Usage),
        None => Ok(config.project.default_type),
    }
}

fn write_back(path: &str, contents: &str) -> Result<(), CliError> {
    if path == STDIN_PATH {
        return Err(CliError::Usage(
            "--write needs a file path, not stdin".to_string(),
        ));
    }
    std::fs::write(path, contents).map_err(|err| CliError::Io(format!("{}: {}", path, err)))
}

/// `forsure parse PATH [--format F] [--fallback] [--project-type T]`
pub fn handle_parse(config: &ForsureConfig, matches: &ArgMatches) -> Result<(), CliError> {
    let format = format_arg(matches, config)?;
    let loader = load(path_arg(matches, "path"))?;
    let root = if matches.get_flag("fallback") {
        let project_type = project_type_arg(matches, "project-type", config)?;
        loader.parse_or_default(&config.parse_options(), project_type)
    } else {
        parse_document(&loader, config)?
    };
    print!("{}", format.serialize(&root, &config.render_options())?);
    Ok(())
}

/// `forsure check PATH [--json]`
pub fn handle_check(config: &ForsureConfig, matches: &ArgMatches) -> Result<(), CliError> {
    let path = path_arg(matches, "path");
    let json = matches.get_flag("json");
    match load_and_parse(path, config) {
        Ok(root) if json => {
            let summary = serde_json::json!({
                "ok": true,
                "files": root.file_count(),
                "directories": root.directory_count(),
            });
            println!("{}", summary);
            Ok(())
        }
        Ok(root) => {
            println!(
                "{}: ok ({} files, {} directories)",
                path,
                root.file_count(),
                root.directory_count()
            );
            Ok(())
        }
        Err(CliError::Parse { error, .. }) if json => {
            let error = serde_json::to_string(&error)
                .map_err(|err| CliError::Io(format!("JSON serialization failed: {}", err)))?;
            println!("{}", error);
            Err(CliError::Reported)
        }
        Err(err) => Err(err),
    }
}

/// `forsure fmt PATH [--write | --check]`
pub fn handle_fmt(config: &ForsureConfig, matches: &ArgMatches) -> Result<(), CliError> {
    let path = path_arg(matches, "path");
    let loader = load(path)?;
    let root = parse_document(&loader, config)?;
    let formatted = Format::Terse.serialize(&root, &config.render_options())?;

    if matches.get_flag("check") {
        if formatted == loader.source() {
            return Ok(());
        }
        println!("{}: would reformat", path);
        return Err(CliError::Reported);
    }
    if matches.get_flag("write") {
        return write_back(path, &formatted);
    }
    print!("{}", formatted);
    Ok(())
}

/// `forsure diff OLD NEW [--json]`
pub fn handle_diff(config: &ForsureConfig, matches: &ArgMatches) -> Result<(), CliError> {
    let old = load_and_parse(path_arg(matches, "old"), config)?;
    let new = load_and_parse(path_arg(matches, "new"), config)?;
    let changes = diff(&old, &new);

    if matches.get_flag("json") {
        let json = serde_json::to_string_pretty(&changes)
            .map_err(|err| CliError::Io(format!("JSON serialization failed: {}", err)))?;
        println!("{}", json);
    } else if changes.is_empty() {
        println!("no changes");
    } else {
        for change in &changes {
            println!("{}", change);
        }
    }
    Ok(())
}

/// `forsure edit PATH COMMAND [--write]`
pub fn handle_edit(config: &ForsureConfig, matches: &ArgMatches) -> Result<(), CliError> {
    let path = path_arg(matches, "path");
    let text = matches
        .get_one::<String>("command")
        .ok_or_else(|| CliError::Usage("missing edit command".to_string()))?;
    let command = EditCommand::parse(text)?;
    let edited = command.apply(&load_and_parse(path, config)?)?;
    let rendered = Format::Terse.serialize(&edited, &config.render_options())?;

    if matches.get_flag("write") {
        write_back(path, &rendered)?;
        eprintln!("{}", command);
        return Ok(());
    }
    print!("{}", rendered);
    Ok(())
}

/// `forsure scaffold PATH --out DIR [--dry-run]`
pub fn handle_scaffold(config: &ForsureConfig, matches: &ArgMatches) -> Result<(), CliError> {
    let root = load_and_parse(path_arg(matches, "path"), config)?;
    let out = matches
        .get_one::<String>("out")
        .ok_or_else(|| CliError::Usage("missing --out directory".to_string()))?;
    let dry_run = matches.get_flag("dry-run");

    let report = scaffold(&root, Path::new(out), dry_run)?;
    for outcome in &report.outcomes {
        let verb = match (outcome, dry_run) {
            (Outcome::Created(_), false) => "created",
            (Outcome::Created(_), true) => "would create",
            (Outcome::Existing(_), _) => "exists",
        };
        println!("{} {}", verb, outcome.path().display());
    }
    Ok(())
}

/// `forsure skeleton [TYPE] [--format F]`
pub fn handle_skeleton(config: &ForsureConfig, matches: &ArgMatches) -> Result<(), CliError> {
    let format = format_arg(matches, config)?;
    let project_type = project_type_arg(matches, "type", config)?;
    let root = default_structure(project_type);
    print!("{}", format.serialize(&root, &config.render_options())?);
    Ok(())
}
