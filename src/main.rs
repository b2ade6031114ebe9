//! flowlog - write a message or a hex dump through the configured log sinks.

use anyhow::{Context, Result};
use clap::Parser;
use flowlog::{cli::Cli, flowlog, Dispatcher, LogConfig};
use std::io::Read;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics about flowlog itself go to stderr via tracing, separate from
    // the records it dispatches.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = LogConfig::load(&cli).context("failed to load configuration")?;

    debug!("-------------------- Configuration --------------------");
    debug!("Debug: {}", config.debug);
    debug!("Syslog: {}", config.syslog.as_deref().unwrap_or("Disabled"));
    match &config.logfile {
        Some(path) => debug!("Log File: {}", path.display()),
        None => debug!("Log File: Disabled"),
    }
    debug!("UTC Timestamps: {}", config.timestamps_utc);
    debug!("-------------------------------------------------------");

    let dispatcher = Dispatcher::from_config(&config).context("failed to set up log sinks")?;
    let severity = cli.level;

    if let Some(path) = &cli.hex {
        let buf = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        info!(bytes = buf.len(), "Writing hex dump");
        dispatcher.log_hex(severity, &buf);
        return Ok(());
    }

    let message = if cli.message.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read message from stdin")?;
        input
    } else {
        cli.message.join(" ")
    };

    let message = message.trim_end_matches('\n');
    flowlog!(dispatcher, severity, "{}\n", message);
    Ok(())
}
