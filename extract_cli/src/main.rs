//! `extract_cli`: drive the extraction workbench from the command line.

mod cli;
mod commands;
mod error_fmt;
mod replay;

use clap::Parser;
use eyre::Result;
use extract_core::mocks::NoopObserver;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use crate::commands::ScoreInput;
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::replay::{EventPrinter, Replayer};

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = run(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    let cfg = commands::load_config(&cli.config)?;
    init_tracing(&cli.log_level, cli.json, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), materials = cfg.materials.len(), "config loaded");

    let stock = cli.stock.as_deref();
    match cli.cmd {
        Commands::Check => {
            let wb = commands::assemble(&cfg, stock, None::<NoopObserver>)?;
            commands::check(&wb, cli.json);
        }
        Commands::Score {
            material,
            tools,
            chops,
            rotations,
            strokes,
            deviation,
        } => {
            let mut wb = commands::assemble(&cfg, stock, None::<NoopObserver>)?;
            let input = ScoreInput {
                material,
                tools,
                chops,
                rotations,
                strokes,
                deviation,
            };
            commands::score(&mut wb, &input, cli.json)?;
        }
        Commands::Replay {
            script,
            fps,
            realtime,
        } => {
            let script = replay::load_script(&script)?;
            let printer = EventPrinter::new(cli.json);
            let mut wb = commands::assemble(&cfg, stock, Some(printer))?;
            let mut replayer = if realtime {
                Replayer::realtime(fps)
            } else {
                Replayer::new(fps)
            };
            replayer.run(&mut wb, &script)?;
            replay::print_ledger(&wb, cli.json);
        }
    }
    Ok(())
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Console logs go to stderr so stdout stays machine-readable.
/// `[logging].file` adds a JSON-lines file sink.
fn init_tracing(level: &str, json: bool, logging: &extract_config::Logging) -> Result<()> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        layers.push(console.json().with_filter(env_filter(level)).boxed());
    } else {
        layers.push(console.compact().with_filter(env_filter(level)).boxed());
    }

    if let Some(file) = logging.file.as_deref() {
        let path = std::path::Path::new(file);
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => std::path::Path::new("."),
        };
        let name = path
            .file_name()
            .ok_or_else(|| eyre::eyre!("logging.file has no file name: {file:?}"))?;
        let appender = match logging.rotation.as_deref().unwrap_or("never") {
            "daily" => tracing_appender::rolling::daily(dir, name),
            "hourly" => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        let file_level = logging.level.as_deref().unwrap_or(level);
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(env_filter(file_level))
                .boxed(),
        );
    }

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(layers).try_init();
    Ok(())
}
