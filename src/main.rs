//! main.rs
//! Entry point for g

use g_ls::app::{self, EXIT_FATAL};
use g_ls::config::{Config, ListingRequest, Theme};
use g_ls::utils::cli::Cli;
use g_ls::utils::logging;
use g_ls::utils::shell::Shell;

use clap::Parser;

use std::io::{self, BufWriter, ErrorKind, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    if let Some(shell) = &cli.init {
        return match shell.parse::<Shell>() {
            Ok(shell) => {
                print!("{}", shell.script());
                ExitCode::SUCCESS
            }
            Err(e) => fatal(&e),
        };
    }

    if cli.init_config {
        let path = Config::default_path();
        return match Config::generate_default(&path) {
            Ok(()) => {
                println!("default config generated at {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => fatal(&e),
        };
    }

    let config = if cli.no_config {
        Config::default()
    } else {
        Config::load()
    };

    let request = match ListingRequest::from_cli(&cli, &config) {
        Ok(request) => request,
        Err(e) => return fatal(&e),
    };

    if let Err(e) = request.interrupt.install() {
        tracing::warn!("cannot handle interrupts: {}", e);
    }

    let loaded;
    let theme = match &request.theme {
        Some(path) => match Theme::load(path) {
            Ok(theme) => {
                loaded = theme;
                &loaded
            }
            Err(e) => return fatal(&e),
        },
        None => Theme::internal_defaults(),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut err = io::stderr();
    let code = match app::run(&request, theme, &mut out, &mut err) {
        Ok(code) => code,
        // closed pipe, e.g. `g | head`
        Err(e) if e.kind() == ErrorKind::BrokenPipe => return ExitCode::SUCCESS,
        Err(e) => return fatal(&e),
    };
    if let Err(e) = out.flush()
        && e.kind() != ErrorKind::BrokenPipe
    {
        return fatal(&e);
    }
    ExitCode::from(code)
}

fn fatal(e: &dyn std::fmt::Display) -> ExitCode {
    eprintln!("g: {e}");
    ExitCode::from(EXIT_FATAL)
}
