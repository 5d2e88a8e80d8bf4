pub mod appointment;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod datetime;
pub mod format;
pub mod property;
pub mod query;
pub mod render;
pub mod schema;
pub mod screen;
pub mod seed;
pub mod store;
pub mod tags;

use std::ffi::OsString;
use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use tracing::{debug, info};

use crate::commands::{AppShell, Outcome, ScreenKind};
use crate::render::Renderer;

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);
    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        "starting carteira CLI"
    );

    let mut cfg = config::Config::load(cli.config.as_deref())?;
    cfg.apply_overrides(cli.rc_overrides.into_iter().map(|kv| (kv.key, kv.value)));

    let mut renderer = Renderer::new(&cfg)?;
    let today = datetime::today();

    let default_screen = cfg
        .get("screen.default")
        .as_deref()
        .and_then(ScreenKind::parse)
        .unwrap_or(ScreenKind::Clients);
    let mut shell = AppShell::new(default_screen);
    if cfg.get_bool("seed.sample").unwrap_or(true) {
        shell.seed_samples(today);
    }

    let tokens: Vec<String> = cli
        .rest
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    if tokens.is_empty() {
        repl(&mut shell, &mut renderer, today)?;
    } else {
        commands::dispatch(&mut shell, &mut renderer, &tokens, today)?;
    }

    info!("done");
    Ok(())
}

fn repl(shell: &mut AppShell, renderer: &mut Renderer, today: NaiveDate) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    debug!(
        screen = shell.active.label(),
        interactive, "entering command loop"
    );

    let mut line = String::new();
    loop {
        if interactive {
            let marker = if shell.form_open() { "*" } else { "" };
            print!("carteira:{}{marker}> ", shell.active.label());
            io::stdout().flush().context("failed to flush prompt")?;
        }

        line.clear();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read command line")?;
        if read == 0 {
            break;
        }

        let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            continue;
        }

        match commands::dispatch(shell, renderer, &tokens, today) {
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Continue) => {}
            Err(err) => eprintln!("error: {err:#}"),
        }
    }

    Ok(())
}
