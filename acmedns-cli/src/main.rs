//! acme-dns-client entry point
//!
//! Subcommands set up and inspect acme-dns delegation. Invoked without a
//! subcommand, the binary acts as a Certbot `--manual-auth-hook` and publishes
//! the validation token; the exit status reports the result.

mod adapters;
mod cli;
mod commands;
mod output;

use std::path::Path;
use std::process::ExitCode;

use acmedns_core::CoreError;
use clap::{CommandFactory, Parser};
use cli::{Cli, Command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const WORKSPACE_CRATES: [&str; 4] = ["acme_dns_client", "acmedns_core", "acmedns_dns", "acmedns_provider"];

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.client_config();
    init_tracing(config.verbose, config.debug);

    if let Err(e) = preflight(&config.storage_path) {
        eprintln!("Error while starting up: {e}");
        return ExitCode::FAILURE;
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(async move {
        let ctx = match commands::build_context(config) {
            Ok(ctx) => ctx,
            Err(e) => {
                tracing::error!("Failed to initialize: {e:#}");
                return ExitCode::FAILURE;
            }
        };

        let result = match &cli.command {
            None => {
                if commands::validate::run(&ctx).await {
                    return ExitCode::SUCCESS;
                }
                if let Err(e) = Cli::command().print_help() {
                    tracing::debug!("Failed to print usage: {e}");
                }
                return ExitCode::FAILURE;
            }
            Some(Command::Check(args)) => {
                commands::check::run(&ctx, &Cli::requested_domains(args), args.strict).await
            }
            Some(Command::Register(args)) => commands::register::run(&ctx, &args.domain).await,
            Some(Command::List(_)) => commands::list::run(&ctx).await,
        };

        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                println!("{}", failure_line(&e));
                ExitCode::FAILURE
            }
        }
    })
}

/// Status line for a failed command; expected failures are warnings.
fn failure_line(e: &anyhow::Error) -> String {
    match e.downcast_ref::<CoreError>() {
        Some(core) if core.is_expected() => {
            output::status_line(output::Marker::Warning, &core.to_string(), 0)
        }
        _ => output::status_line(output::Marker::Error, &format!("{e:#}"), 0),
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the verbosity flags.
fn init_tracing(verbose: bool, debug: bool) {
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    let directives = std::iter::once("warn".to_string())
        .chain(WORKSPACE_CRATES.iter().map(|c| format!("{c}={level}")))
        .collect::<Vec<_>>()
        .join(",");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(filter)
        .init();
}

/// Create the storage directory, readable by the owner only.
fn preflight(storage_path: &Path) -> std::io::Result<()> {
    let Some(dir) = storage_path.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(());
    };
    if dir.exists() {
        return Ok(());
    }

    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)
}
