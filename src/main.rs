//! command-saver CLI entry point.

use clap::Parser;
use cs::cli::commands;
use cs::cli::{Cli, Commands, OutputFormat};
use cs::config::Config;
use cs::error::Error;
use std::process::ExitCode;

/// Rewrite the single-dash verbs of earlier releases to subcommands.
///
/// `cs -l` becomes `cs list`, `cs -rm 3` becomes `cs delete 3`, and so on.
/// Only the first argument after any global options is considered, so
/// descriptions and saved commands that contain these tokens pass through.
fn preprocess_args(args: impl Iterator<Item = String>) -> Vec<String> {
    const LEGACY_VERBS: &[(&str, &str)] = &[
        ("-l", "list"),
        ("-d", "days"),
        ("-y", "save"),
        ("-rm", "delete"),
        ("-o", "export"),
        ("-i", "import"),
        ("-c", "reset"),
    ];
    // Global options that consume the next argument
    const VALUE_OPTIONS: &[&str] = &["--db", "--format"];

    let mut result: Vec<String> = args.collect();

    let mut idx = 1;
    while idx < result.len() {
        let arg = result[idx].as_str();
        if let Some((_, verb)) = LEGACY_VERBS.iter().find(|(flag, _)| *flag == arg) {
            result[idx] = (*verb).to_string();
            break;
        }
        if VALUE_OPTIONS.contains(&arg) {
            idx += 2;
        } else if arg.starts_with("--") || is_short_global(arg) {
            idx += 1;
        } else {
            break;
        }
    }

    result
}

/// `-v`, `-vv`, `-q` and similar clusters of global short flags.
fn is_short_global(arg: &str) -> bool {
    arg.strip_prefix('-')
        .is_some_and(|flags| !flags.is_empty() && flags.chars().all(|c| c == 'v' || c == 'q'))
}

fn main() -> ExitCode {
    let args = preprocess_args(std::env::args());
    let cli = Cli::parse_from(args);

    if cli.silent {
        cs::SILENT.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.dry_run {
        cs::DRY_RUN.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.format == OutputFormat::Csv {
        cs::CSV_OUTPUT.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    let json = cli.json || cli.format == OutputFormat::Json;

    // Run the command and handle errors
    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,rusqlite=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    let config = || Config::from_env(cli.db.as_deref());

    match &cli.command {
        // Default: capture the last shell command
        None => commands::save::execute_capture(&cli.description, &config()?, json),

        Some(Commands::Save {
            command,
            description,
        }) => commands::save::execute_save(command, description, &config()?, json),

        Some(Commands::List) => commands::list::execute_list(&config()?, json),
        Some(Commands::Days) => commands::list::execute_days(&config()?, json),

        Some(Commands::Delete { id }) => commands::delete::execute(id, &config()?, json),

        // Backup
        Some(Commands::Export { file }) => {
            commands::sync::export(file.as_deref(), &config()?, json)
        }
        Some(Commands::Import { file }) => {
            commands::sync::import(file.as_deref(), &config()?, json)
        }

        Some(Commands::Reset { force }) => commands::reset::execute(*force, &config()?, json),

        // Shell completions
        Some(Commands::Completions { shell }) => commands::completions::execute(*shell),
        Some(Commands::Version) => commands::version::execute(json),
    }
}
