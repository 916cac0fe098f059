//! Command-line interface for bst
//! This binary parses BibTeX style files and prints their syntax trees, tokens, diagnostics or
//! declarations.
//!
//! Usage:
//!   bst parse `<path>` [--format `<format>`] [--ranges] [--trivia]  - Print the syntax tree
//!   bst tokens `<path>`                                           - Print the token stream
//!   bst check `<path>`                                            - Report syntax errors
//!   bst outline `<path>`                                          - List declarations
//!
//! Global options: `--config <file>` layers a TOML file over the built-in defaults, `-v`
//! raises the log level (logs go to stderr; `RUST_LOG` takes precedence).

use bst::{
    tokenize, BstConfig, Error, FormatRegistry, LineIndex, Loader, Outline, Parser, SyntaxTree,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let matches = Command::new("bst")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting BibTeX style files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity"),
        )
        .subcommand(
            Command::new("parse")
                .about("Print the syntax tree")
                .arg(path_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["sexp", "treeviz", "json", "yaml"]),
                )
                .arg(
                    Arg::new("ranges")
                        .long("ranges")
                        .help("Show byte ranges")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("trivia")
                        .long("trivia")
                        .help("Include whitespace tokens")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Report syntax errors; exits with status 1 if there are any")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("outline")
                .about("List declared functions, macros, fields and variables")
                .arg(path_arg()),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"));

    match run(&matches) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the .bst file")
        .required(true)
        .index(1)
}

fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(matches: &ArgMatches) -> Result<ExitCode, Error> {
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| std::io::Error::other("no subcommand given"))?;
    let config = load_config(matches, sub)?;
    debug!(?config, "loaded configuration");

    let path = sub
        .get_one::<String>("path")
        .ok_or_else(|| std::io::Error::other("no path given"))?;

    match name {
        "parse" => handle_parse_command(path, &config),
        "tokens" => handle_tokens_command(path, &config),
        "check" => handle_check_command(path, &config),
        "outline" => handle_outline_command(path, &config),
        _ => unreachable!(),
    }
}

fn load_config(matches: &ArgMatches, sub: &ArgMatches) -> Result<BstConfig, Error> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Ok(Some(format)) = sub.try_get_one::<String>("format") {
        loader = loader.set_override("dump.format", format.as_str())?;
    }
    for (flag, key) in [
        ("ranges", "dump.show_ranges"),
        ("trivia", "dump.include_trivia"),
    ] {
        if let Ok(Some(true)) = sub.try_get_one::<bool>(flag) {
            loader = loader.set_override(key, true)?;
        }
    }
    Ok(loader.build()?)
}

fn read_tree(path: &str, config: &BstConfig) -> Result<SyntaxTree, Error> {
    let bytes = std::fs::read(path)?;
    Parser::new(config.parser.clone()).parse_bytes(&bytes)
}

/// Handle the parse command
fn handle_parse_command(path: &str, config: &BstConfig) -> Result<ExitCode, Error> {
    let tree = read_tree(path, config)?;
    let registry = FormatRegistry::default();
    let output = registry.serialize(&tree, config.dump.format.name(), &config.dump.options())?;
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
    Ok(ExitCode::SUCCESS)
}

/// Handle the tokens command
fn handle_tokens_command(path: &str, config: &BstConfig) -> Result<ExitCode, Error> {
    let bytes = std::fs::read(path)?;
    let source = Parser::new(config.parser.clone()).decode(&bytes)?;
    for token in tokenize(source) {
        println!(
            "{}..{} {} {:?}",
            token.start,
            token.end,
            token.kind.name(),
            token.text(source)
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Handle the check command
fn handle_check_command(path: &str, config: &BstConfig) -> Result<ExitCode, Error> {
    let tree = read_tree(path, config)?;
    let errors = tree.errors();
    if errors.is_empty() {
        println!("{}: no errors", path);
        return Ok(ExitCode::SUCCESS);
    }
    let index = LineIndex::new(tree.text());
    for diagnostic in &errors {
        println!(
            "{}:{}: {}",
            path,
            index.position(diagnostic.range.start),
            diagnostic.error
        );
    }
    Ok(ExitCode::FAILURE)
}

/// Handle the outline command
fn handle_outline_command(path: &str, config: &BstConfig) -> Result<ExitCode, Error> {
    let tree = read_tree(path, config)?;
    let index = LineIndex::new(tree.text());
    for declaration in Outline::from_tree(&tree).declarations {
        println!(
            "{} {} {}",
            index.position(declaration.range.start),
            declaration.kind,
            declaration.name
        );
    }
    Ok(ExitCode::SUCCESS)
}
