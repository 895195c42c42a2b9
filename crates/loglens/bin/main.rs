use clap::{Parser, Subcommand};
use eyre::Result;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod cmd;

use cmd::console::ConsoleArgs;
use cmd::list::ListArgs;
use cmd::BackendArgs;

#[derive(Debug, Parser)]
#[command(name = "loglens", version, about = "Terminal dashboard for a container-management API")]
struct Cli {
    #[command(flatten)]
    backend: BackendArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive dashboard (default)
    Console(ConsoleArgs),
    /// Print containers, images, volumes or the dashboard summary
    List(ListArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::List(args)) => {
            let _guard = init_tracing(cli.backend.log_dir.as_deref(), false)?;
            args.run(&cli.backend)
        }
        Some(Command::Console(args)) => {
            let _guard = init_tracing(cli.backend.log_dir.as_deref(), true)?;
            args.run(&cli.backend)
        }
        None => {
            let _guard = init_tracing(cli.backend.log_dir.as_deref(), true)?;
            ConsoleArgs::default().run(&cli.backend)
        }
    }
}

/// The console owns the terminal, so without a log directory it stays silent.
fn init_tracing(log_dir: Option<&Path>, interactive: bool) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, "loglens.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None if !interactive => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
        None => Ok(None),
    }
}
