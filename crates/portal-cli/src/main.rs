//! Study Portal CLI.

use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{ColorChoice, Parser};
use portal_ai::HttpAiClient;
use portal_cli::config::Settings;
use portal_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod render;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{Context, run};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run_cli(cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run_cli(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let library = cli
        .library
        .clone()
        .unwrap_or_else(|| settings.general.library_path());

    // The blocking HTTP client must not be dropped inside the runtime;
    // `ctx` keeps it alive until after `block_on` returns.
    let ai = match cli.command {
        Command::Ask { .. } | Command::Quiz(_) => Some(Arc::new(
            HttpAiClient::new(settings.ai.clone()).context("set up the study assistant")?,
        )),
        _ => None,
    };

    let ctx = Context {
        settings_path: cli.config.clone().or_else(Settings::default_path),
        settings,
        library,
        user: cli.user.clone(),
        ai,
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    let result = runtime.block_on(run(cli.command, &ctx));
    drop(runtime);
    result
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
