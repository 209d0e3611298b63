//! prompt-rewriter CLI: try out macros and manage the macro dictionary file.
//!
//! Usage:
//!   prompt-rewriter expand [--macros <path>] <text...>   Expand a message
//!   prompt-rewriter validate <file>                      Check a dictionary file
//!   prompt-rewriter save <file> [--macros <path>]        Validate and store a dictionary
//!   prompt-rewriter example                              Print the example dictionary

use anyhow::{anyhow, Context};
use prompt_rewriter::config::MACROS_PATH_ENV;
use prompt_rewriter::macros::{
    expand_detailed, validate_str, DictionaryStore, ExpansionOutcome, FileStore, MacroDictionary,
    UnchangedReason, EXAMPLE_JSON,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "expand" => cmd_expand(&args[2..]),
        "validate" => exit_on_error(cmd_validate(&args[2..])),
        "save" => exit_on_error(cmd_save(&args[2..])),
        "example" => println!("{EXAMPLE_JSON}"),
        "version" | "--version" | "-V" => {
            println!("prompt-rewriter {}", env!("CARGO_PKG_VERSION"))
        }
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn exit_on_error(result: anyhow::Result<()>) {
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"prompt-rewriter: submit-time prompt macros

USAGE:
    prompt-rewriter <COMMAND> [OPTIONS]

COMMANDS:
    expand [--macros <path>] <text...>   Expand a message with the configured macros
    validate <file>                      Validate a macro dictionary file
    save <file> [--macros <path>]        Validate a dictionary and store it
    example                              Print the example dictionary
    version                              Show version information
    help                                 Show this help message

ENVIRONMENT:
    PROMPT_REWRITER_MACROS               Macro dictionary path
    RUST_LOG                             Log filter (e.g. prompt_rewriter=debug)"#
    );
}

/// Split out `--macros <path>`, returning it and the remaining arguments.
fn take_macros_flag(args: &[String]) -> (Option<PathBuf>, Vec<String>) {
    let mut path = None;
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--macros" {
            path = iter.next().map(PathBuf::from);
        } else {
            rest.push(arg.clone());
        }
    }
    let path = path.or_else(|| std::env::var_os(MACROS_PATH_ENV).map(PathBuf::from));
    (path, rest)
}

fn cmd_expand(args: &[String]) {
    let (path, rest) = take_macros_flag(args);
    let dictionary = match &path {
        Some(p) => FileStore::new(p).load(),
        None => {
            eprintln!("No macro dictionary configured, using the example macros.");
            Some(MacroDictionary::example())
        }
    };

    let text = rest.join(" ");
    match expand_detailed(&text, dictionary.as_ref()) {
        ExpansionOutcome::Rewritten { text, .. } => println!("{text}"),
        ExpansionOutcome::Unchanged(reason) => {
            match reason {
                UnchangedReason::NoDictionary => {
                    eprintln!("(no usable macro dictionary, text left unchanged)")
                }
                UnchangedReason::Empty => eprintln!("(empty input)"),
                UnchangedReason::UnknownMacro(name) => eprintln!("(no macro named '{name}')"),
            }
            println!("{text}");
        }
    }
}

fn read_file(file: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("Cannot read {file}"))
}

fn cmd_validate(args: &[String]) -> anyhow::Result<()> {
    let file = args
        .first()
        .ok_or_else(|| anyhow!("validate requires a file argument"))?;
    let dict = validate_str(&read_file(file)?).map_err(|e| anyhow!("FAIL: {}", e.message()))?;

    println!("OK: {} macro(s)", dict.len());
    for name in dict.names() {
        println!("  {name}");
    }
    Ok(())
}

fn cmd_save(args: &[String]) -> anyhow::Result<()> {
    let (path, rest) = take_macros_flag(args);
    let path = path.ok_or_else(|| anyhow!("no target. Set {MACROS_PATH_ENV} or use --macros."))?;
    let file = rest
        .first()
        .ok_or_else(|| anyhow!("save requires a file argument"))?;
    let content = read_file(file)?;

    // Rejected saves leave the stored dictionary as it was.
    FileStore::new(&path)
        .save_raw(&content)
        .map_err(|e| anyhow!("FAIL: {}", e.message()))?;
    println!("Saved to {}", path.display());
    Ok(())
}
