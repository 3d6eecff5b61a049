//! Schemata CLI entry point.
//!
//! Loads document snapshots, links them, and prints the emission order and
//! the role tree of each.

use schemata_foundation::RoleId;
use schemata_linker::{LinkConfig, LinkedConfig};
use schemata_model::teardown;
use schemata_runtime::load_from_file;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    files: Vec<PathBuf>,
    show_help: bool,
    show_version: bool,
    verbose: bool,
    warn_unused_roles: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    for arg in args.into_iter().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-v" | "--verbose" => config.verbose = true,
            "-w" | "--warn-unused-roles" => config.warn_unused_roles = true,
            flag if flag.starts_with('-') => {
                return Err(format!("unknown option: {flag}").into());
            }
            _ => config.files.push(PathBuf::from(arg)),
        }
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("schemata {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if config.files.is_empty() {
        return Err("no snapshot files given (see --help)".into());
    }

    init_logging(config.verbose);

    let options = LinkConfig::new().with_warn_unused_roles(config.warn_unused_roles);
    for path in &config.files {
        let linked = load_from_file(path, options)
            .map_err(|e| format!("{}: {}", path.display(), describe(&e)))?;
        println!("\x1b[1;36m=== {} ===\x1b[0m", path.display());
        dump_entities(&linked);
        dump_roles(&linked);
        println!();

        let released = teardown(Some(linked.into_config()));
        debug!(path = %path.display(), ?released, "document released");
    }

    Ok(())
}

fn describe(error: &schemata_foundation::Error) -> String {
    match &error.context {
        Some(context) => format!("{error} ({context})"),
        None => error.to_string(),
    }
}

fn dump_entities(linked: &LinkedConfig) {
    println!("\x1b[1mEntities\x1b[0m (emission order):");
    for entity in linked.entities_by_height() {
        println!("  {} [height {}]", entity.name(), entity.height());
        for field in entity.fields() {
            match linked.reference_target(field) {
                Some(target) => {
                    let owner = linked
                        .entity(target.parent())
                        .map_or("?", |e| e.name());
                    println!(
                        "    {}: {} -> {owner}.{}",
                        field.name(),
                        field.ty(),
                        target.name()
                    );
                }
                None => println!("    {}: {}", field.name(), field.ty()),
            }
        }
    }
}

fn dump_roles(linked: &LinkedConfig) {
    println!("\x1b[1mRoles:\x1b[0m");
    for &root in linked.roles().roots() {
        dump_role(linked, root, 1);
    }
    for &id in linked.unused_roles() {
        if let Some(name) = linked.role_name(id) {
            println!("  (unused: {name})");
        }
    }
}

fn dump_role(linked: &LinkedConfig, id: RoleId, depth: usize) {
    let Some(role) = linked.roles().get(id) else {
        return;
    };
    println!("{:indent$}{}", "", role.name(), indent = depth * 2);
    for &child in role.children() {
        dump_role(linked, child, depth + 1);
    }
}

fn print_help() {
    println!(
        "\x1b[1mSchemata\x1b[0m - Data-model linker

\x1b[1mUSAGE:\x1b[0m
    schemata [OPTIONS] [FILES...]

\x1b[1mARGUMENTS:\x1b[0m
    [FILES...]    Document snapshots to load and link

\x1b[1mOPTIONS:\x1b[0m
    -h, --help                 Print help information
    -V, --version              Print version information
    -v, --verbose              Log each link pass (overridden by RUST_LOG)
    -w, --warn-unused-roles    Warn about declared roles no grant names

\x1b[1mEXAMPLES:\x1b[0m
    schemata db.snap              Link db.snap and print its entities
    schemata -v -w a.snap b.snap  Link two documents with pass logging"
    );
}
