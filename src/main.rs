use std::io::{stdin, stdout, BufRead, Write};
use std::process::ExitCode;

use rs_paginate::repl::{Flow, Session, PROMPT};
use rs_paginate::Config;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "shell stopped");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> rs_paginate::Result<()> {
    let mut config = Config::load()?;
    if let Some(path) = std::env::args_os().nth(1) {
        config.db_path = path.into();
    }
    tracing::info!(path = %config.db_path.display(), "opening database");

    let mut session = Session::open(config)?;
    let stdin = stdin();
    let mut out = stdout().lock();
    write!(out, "{PROMPT}")?;
    out.flush()?;
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            break;
        }

        if session.run(&line, &mut out)? == Flow::Exit {
            return Ok(());
        }

        write!(out, "{PROMPT}")?;
        out.flush()?;
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
