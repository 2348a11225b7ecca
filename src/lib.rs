#![doc = include_str!("../README.md")]

pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod npm;
pub mod report;
pub mod rewrite;
pub mod steps;
pub mod verify;
pub mod version;

pub use error::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() -> Result<()> {
    use clap::Parser;
    use cli::{Cli, Command};

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        None => {
            let request = cli.migrate.into_request()?;
            let result = steps::migrate(&request)?;
            result.print_report(&request.project_root);
        }
        Some(Command::Check(args)) => {
            let request = args.into_request()?;
            let result = steps::migrate(&request)?;
            result.print_report(&request.project_root);
        }
        Some(Command::Analyze(args)) => {
            let target: version::TargetVersion = args.target.parse()?;
            steps::analyze_package(&args.path, &args.package, target)?.print();
        }
        Some(Command::Backup(args)) => {
            steps::backup::backup(&args.path, args.description.as_deref())?;
        }
        Some(Command::Rollback(args)) => {
            steps::backup::rollback(&args.path, &args.id)?;
        }
        Some(Command::ListBackups(args)) => {
            steps::backup::list(&args.path)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "react_migrate=debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
