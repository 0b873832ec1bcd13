//! # mvnrepo CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mvnrepo_cli::resolve::{run_resolve, ResolveArgs};
use mvnrepo_cli::tag::{run_tag, TagArgs};

/// Maven artifact repository tools.
///
/// Inspect a repository root the same way the server does: resolve
/// artifact paths to coordinates and storage locations, and compute
/// integrity tags.
#[derive(Parser, Debug)]
#[command(name = "mvnrepo", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve an artifact path to its coordinate and storage location.
    Resolve(ResolveArgs),

    /// Print the integrity tag of a stored file (sidecar first, else SHA-1).
    Tag(TagArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("mvnrepo CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Resolve(args) => run_resolve(&args),
        Commands::Tag(args) => run_tag(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["mvnrepo", "-vv", "tag", "x.jar"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Tag(_)));
    }

    #[test]
    fn resolve_takes_explicit_repository() {
        let cli = Cli::try_parse_from([
            "mvnrepo",
            "resolve",
            "com/x/lib/1.0/lib.jar",
            "--repository",
            "internal",
            "--root",
            "/srv/repo",
        ])
        .unwrap();
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.repository, "internal");
                assert_eq!(args.root, std::path::PathBuf::from("/srv/repo"));
            }
            other => panic!("expected resolve, got {other:?}"),
        }
    }

    #[test]
    fn tag_requires_a_file() {
        assert!(Cli::try_parse_from(["mvnrepo", "tag"]).is_err());
    }
}
