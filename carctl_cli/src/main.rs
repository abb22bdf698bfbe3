use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

mod cli;
mod error_fmt;
mod replay;

use cli::{Cli, Commands, FILE_GUARD, JSON_MODE};

fn main() {
    let cli = Cli::parse();
    let _ = color_eyre::install();
    let _ = JSON_MODE.set(cli.json);

    let loaded = replay::load_config(&cli.config);
    let logging = loaded.as_ref().ok().map(|c| &c.logging);
    if let Err(e) = init_tracing(&cli, logging) {
        eprintln!("failed to initialize logging: {e}");
    }

    let result = loaded.and_then(|cfg| run(&cli, &cfg));
    if let Err(err) = result {
        let code = error_fmt::exit_code_for_error(&err);
        tracing::error!(code, error = %err, "carctl failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", error_fmt::format_error_json(&err));
        } else {
            eprintln!("{}", error_fmt::humanize(&err));
        }
        std::process::exit(code);
    }
}

fn init_tracing(cli: &Cli, logging: Option<&carctl_config::Logging>) -> eyre::Result<()> {
    let level = cli
        .log_level
        .clone()
        .or_else(|| logging.and_then(|l| l.level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .wrap_err_with(|| format!("invalid log level '{level}'"))?;

    let console: Box<dyn Layer<Registry> + Send + Sync> = if cli.json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };

    let file = match logging.and_then(|l| l.file.as_deref()) {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file has no file name: {}", path.display()))?;
            let rotation = logging.and_then(|l| l.rotation.as_deref()).unwrap_or("never");
            let appender = match rotation {
                "daily" => tracing_appender::rolling::daily(dir, name),
                "hourly" => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().json().with_ansi(false).with_writer(writer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .with(filter)
        .try_init()
        .wrap_err("install tracing subscriber")?;
    Ok(())
}

fn run(cli: &Cli, cfg: &carctl_config::Config) -> eyre::Result<()> {
    let policies = replay::load_policies(cfg, &cli.config, cli.policy.as_deref())?;
    let mut controller = replay::build_controller(cfg, policies)?;
    tracing::info!(
        model = %controller.model(),
        longitudinal = controller.config().longitudinal,
        "controller ready"
    );

    match &cli.cmd {
        Commands::Replay {
            trace,
            out,
            pace_hz,
            max_cycles,
            summary,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            {
                let flag = Arc::clone(&shutdown);
                ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
                    .wrap_err("install Ctrl-C handler")?;
            }
            let s = replay::run_replay(
                &mut controller,
                trace,
                out.as_deref(),
                *pace_hz,
                *max_cycles,
                shutdown,
            )?;
            if *summary {
                replay::print_summary(&s);
            }
        }
        Commands::SelfCheck => {
            let n = replay::self_check(&mut controller)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "self_check": "ok", "model": controller.model().as_str(), "messages": n })
                );
            } else {
                println!("self-check ok: {} produced {n} messages", controller.model());
            }
        }
        Commands::Health => {
            println!(
                "{}",
                serde_json::json!({
                    "status": "ok",
                    "model": controller.model().as_str(),
                    "longitudinal": controller.config().longitudinal,
                })
            );
        }
    }
    Ok(())
}
