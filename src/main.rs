//! seaway -- transport routing console.
//!
//! Reads commands from stdin and writes responses to stdout. Logs go to
//! stderr, filtered by `RUST_LOG` (default `warn`). An optional first
//! argument names a JSON routing config.

use std::error::Error;
use std::io::{self, BufRead};

use tracing::error;
use tracing_subscriber::EnvFilter;

use seaway::config::RouteConfig;
use seaway::engine::Engine;
use seaway::protocol::parse_command;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => RouteConfig::load(&path).map_err(|e| {
            error!(path = %path, "cannot load config: {}", e);
            e
        })?,
        None => RouteConfig::default(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new(config);

    for line in stdin.lock().lines() {
        let line = line?;
        let Some(cmd) = parse_command(&line) else {
            continue;
        };
        if !engine.handle(cmd, &mut out)? {
            break;
        }
    }
    Ok(())
}
