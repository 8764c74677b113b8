//! Command-line interface for ForSure
//! This binary parses, checks, formats, diffs, edits and scaffolds ForSure structure documents.
//!
//! Usage:
//!   forsure parse `<path>` [--format `<format>`] [--fallback]  - Print the parsed tree
//!   forsure check `<path>` [--json]                            - Validate a document
//!   forsure fmt `<path>` [--write | --check]                   - Rewrite in canonical terse form
//!   forsure diff `<old>` `<new>` [--json]                      - Structural changes between two documents
//!   forsure edit `<path>` `<command>` [--write]                - Apply a command like "add a file called x in src"
//!   forsure scaffold `<path>` --out `<dir>` [--dry-run]        - Create the declared files on disk
//!   forsure skeleton [`<type>`]                                - Print a default project skeleton
//!
//! A `-` path reads the document from stdin.

mod commands;
mod log_level;
mod scaffold;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use commands::CliError;
use forsure_config::{ForsureConfig, Loader, LOCAL_CONFIG_FILE};
use forsure_parser::forsure::defaults::ProjectType;
use forsure_parser::forsure::formats::Format;
use log_level::{setup_tracing, LogLevel};
use std::process::ExitCode;
use tracing::debug;

fn path_arg(help: &'static str) -> Arg {
    Arg::new("path").help(help).default_value("-").index(1)
}

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format (default: render.format from the configuration)")
        .value_parser(Format::names())
}

fn project_type_names() -> Vec<&'static str> {
    ProjectType::ALL.iter().map(ProjectType::as_str).collect()
}

fn build_cli() -> Command {
    Command::new("forsure")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for parsing and applying ForSure project structure documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over ./forsure.toml and the built-in defaults"),
        )
        .arg(
            Arg::new("indent-unit")
                .long("indent-unit")
                .global(true)
                .help("Spaces per indentation level")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .short('l')
                .global(true)
                .help("Diagnostics written to stderr")
                .value_parser(value_parser!(LogLevel))
                .default_value("warn"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a document and print the tree")
                .arg(path_arg("Path to the ForSure document"))
                .arg(format_arg())
                .arg(
                    Arg::new("fallback")
                        .long("fallback")
                        .help("Print a default skeleton instead of failing on a bad or empty document")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("project-type")
                        .long("project-type")
                        .help("Skeleton used by --fallback")
                        .value_parser(project_type_names())
                        .requires("fallback"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Validate a document; exits with status 1 on the first error")
                .arg(path_arg("Path to the ForSure document"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Report as a JSON object")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("fmt")
                .about("Rewrite a document in the canonical terse form")
                .arg(path_arg("Path to the ForSure document"))
                .arg(
                    Arg::new("write")
                        .long("write")
                        .short('w')
                        .help("Write the result back to the file")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("check")
                        .long("check")
                        .help("Exit with status 1 if the file is not already formatted")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("write"),
                ),
        )
        .subcommand(
            Command::new("diff")
                .about("List structural changes between two documents")
                .arg(Arg::new("old").help("Original document").required(true).index(1))
                .arg(Arg::new("new").help("Changed document").required(true).index(2))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Report as a JSON array")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Apply an edit command and print the resulting document")
                .arg(
                    Arg::new("path")
                        .help("Path to the ForSure document")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("command")
                        .help("e.g. \"add a file called routes.js in src\" or \"remove the folder docs\"")
                        .required(true)
                        .index(2),
                )
                .arg(
                    Arg::new("write")
                        .long("write")
                        .short('w')
                        .help("Write the result back to the file")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("scaffold")
                .about("Create the declared directories and empty files on disk")
                .arg(path_arg("Path to the ForSure document"))
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .help("Directory the root maps to")
                        .required(true),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Only list what would be created")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("skeleton")
                .about("Print a default project skeleton")
                .arg(
                    Arg::new("type")
                        .help("Project type (default: project.default_type from the configuration)")
                        .value_parser(project_type_names())
                        .index(1),
                )
                .arg(format_arg()),
        )
}

fn load_config(matches: &ArgMatches) -> Result<ForsureConfig, CliError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(unit) = matches.get_one::<u64>("indent-unit") {
        loader = loader
            .set_override("parser.indent_unit", *unit)
            .map_err(|err| CliError::Config(err.to_string()))?;
    }
    loader.build().map_err(|err| CliError::Config(err.to_string()))
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let config = load_config(matches)?;
    debug!("configuration: {config:?}");

    match matches.subcommand() {
        Some(("parse", sub)) => commands::handle_parse(&config, sub),
        Some(("check", sub)) => commands::handle_check(&config, sub),
        Some(("fmt", sub)) => commands::handle_fmt(&config, sub),
        Some(("diff", sub)) => commands::handle_diff(&config, sub),
        Some(("edit", sub)) => commands::handle_edit(&config, sub),
        Some(("scaffold", sub)) => commands::handle_scaffold(&config, sub),
        Some(("skeleton", sub)) => commands::handle_skeleton(&config, sub),
        Some((name, _)) => Err(CliError::Usage(format!("unknown command '{}'", name))),
        None => Err(CliError::Usage("no command given".to_string())),
    }
}

fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    let level = matches
        .get_one::<LogLevel>("log-level")
        .copied()
        .unwrap_or_default();
    setup_tracing(level);

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Reported) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
