// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rpld - the replication agent daemon.
//!
//! Hosts the configured replication agents, drains their queues on a
//! background worker, and serves `rpl` CLI requests over a Unix socket.
//!
//! Usage:
//!   rpld [--state-dir <path>] [--config <file>]

use std::fs;
use std::io::Write;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

mod config;
mod env;
mod error;
mod handler;
mod registry;

use config::{Config, CONFIG_FILE_NAME};
use error::{DaemonError, Result};
use registry::Registry;
use rpl_ipc::framing::{self, FrameError};
use rpl_ipc::{DaemonRequest, DaemonResponse};

const SOCKET_NAME: &str = "daemon.sock";
const PID_NAME: &str = "daemon.pid";
const LOCK_NAME: &str = "daemon.lock";
const LOG_NAME: &str = "daemon.log";

const CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

struct Args {
    state_dir: PathBuf,
    config: Option<PathBuf>,
}

fn main() {
    let args = parse_args(std::env::args().skip(1));

    if let Err(e) = fs::create_dir_all(&args.state_dir) {
        eprintln!(
            "rpld: cannot create state directory {}: {}",
            args.state_dir.display(),
            e
        );
        std::process::exit(1);
    }
    setup_logging(&args.state_dir.join(LOG_NAME));
    tracing::info!("rpld starting, state_dir={}", args.state_dir.display());

    let lock_file = match acquire_lock(&args.state_dir.join(LOCK_NAME)) {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("failed to acquire lock: {}", e);
            std::process::exit(1);
        }
    };

    let pid_path = args.state_dir.join(PID_NAME);
    if let Err(e) = fs::write(&pid_path, std::process::id().to_string()) {
        tracing::error!("failed to write PID file: {}", e);
        std::process::exit(1);
    }

    let socket_path = args.state_dir.join(SOCKET_NAME);
    let code = match run(&args, &socket_path) {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{}", e);
            1
        }
    };

    cleanup(&pid_path, &socket_path);
    drop(lock_file);
    tracing::info!("rpld stopped");
    std::process::exit(code);
}

fn run(args: &Args, socket_path: &Path) -> Result<()> {
    let config_path = args
        .config
        .clone()
        .or_else(env::config_path)
        .unwrap_or_else(|| args.state_dir.join(CONFIG_FILE_NAME));
    tracing::info!("loading config from {}", config_path.display());
    let config = Config::load(&config_path)?;

    let registry = Registry::build(&config, &args.state_dir)?;
    let enabled = registry.enable_configured();
    tracing::info!(
        "{} of {} agents enabled",
        enabled,
        registry.agents().count()
    );
    let worker = registry.start_worker(Duration::from_millis(config.worker.interval_ms))?;

    // A socket left behind by a crashed daemon would make bind fail.
    let _ = fs::remove_file(socket_path);
    let listener = UnixListener::bind(socket_path)?;
    tracing::info!("listening on {}", socket_path.display());

    println!("READY");
    let _ = std::io::stdout().flush();

    serve(&listener, &registry);

    registry.disable_all();
    worker.stop();
    Ok(())
}

/// Answers requests one connection at a time until a shutdown request.
fn serve(listener: &UnixListener, registry: &Registry) {
    let started = Instant::now();
    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if serve_connection(&mut stream, registry, started) {
                    tracing::info!("shutting down");
                    break;
                }
            }
            Err(e) => tracing::warn!("failed to accept connection: {}", e),
        }
    }
}

/// Returns `true` when the client asked the daemon to stop.
fn serve_connection(stream: &mut UnixStream, registry: &Registry, started: Instant) -> bool {
    let _ = stream.set_read_timeout(Some(CLIENT_TIMEOUT));
    let _ = stream.set_write_timeout(Some(CLIENT_TIMEOUT));

    let request: DaemonRequest = match framing::read_frame(stream) {
        Ok(request) => request,
        Err(e) if e.is_disconnect() => return false,
        Err(e) => {
            tracing::warn!("failed to read request: {}", e);
            let _ = framing::write_frame(stream, &DaemonResponse::error(e.to_string()));
            return false;
        }
    };
    tracing::debug!("request: {:?}", request);

    let response = handler::handle_request(registry, started, request);
    let shutdown = matches!(response, DaemonResponse::ShuttingDown);
    if let Err(e) = framing::write_frame(stream, &response) {
        log_write_error(&e);
    }
    shutdown
}

fn log_write_error(e: &FrameError) {
    if e.is_disconnect() {
        tracing::debug!("client went away before the response: {}", e);
    } else {
        tracing::warn!("failed to write response: {}", e);
    }
}

fn parse_args<I>(args: I) -> Args
where
    I: IntoIterator<Item = String>,
{
    let mut state_dir = None;
    let mut config = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--state-dir" => state_dir = args.next().map(PathBuf::from),
            "--config" => config = args.next().map(PathBuf::from),
            other => eprintln!("rpld: ignoring unknown argument '{}'", other),
        }
    }
    Args {
        state_dir: state_dir.unwrap_or_else(env::default_state_dir),
        config,
    }
}

fn setup_logging(log_path: &Path) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

fn acquire_lock(lock_path: &Path) -> Result<fs::File> {
    use fs2::FileExt;

    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(lock_path)?;
    file.try_lock_exclusive().map_err(|_| {
        DaemonError::Io(std::io::Error::other(
            "another rpld instance is already running",
        ))
    })?;
    Ok(file)
}

fn cleanup(pid_path: &Path, socket_path: &Path) {
    let _ = fs::remove_file(pid_path);
    let _ = fs::remove_file(socket_path);
}
