mod args;

use std::process::ExitCode;

use clap::Parser;
use scribe::{LoggerConfig, Registry, SinkSpec};

use crate::args::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Err(err) => {
            let root = err.root_cause();

            eprint!("\x1b[31m");
            eprintln!("Error: {}", err);
            eprintln!("");
            eprintln!("Caused by:");
            eprint!("  {}", root);
            eprintln!("\x1b[0m");
            ExitCode::from(1)
        }
        Ok(_) => ExitCode::from(0),
    }
}

fn run(args: Args) -> eyre::Result<()> {
    let mut config = LoggerConfig::new(&args.name).with_threshold(args.level);
    if let Some(template) = args.template {
        config = config.with_template(template);
    }
    if let Some(path) = args.log_file {
        config = config.with_destination(SinkSpec::File { path });
    }

    let registry = Registry::global();
    let logger = registry.apply(&config)?;

    logger.trace("Trace message.");
    logger.debug("Debug message.");
    logger.info("Info message.");
    logger.warn("Warning message.");
    logger.error("Error message.");
    logger.critical("Critical message.");

    if let Err(err) = std::fs::metadata("scribe.toml") {
        logger.error_with("Exception message.", &err);
    }

    registry.flush_all();
    Ok(())
}
