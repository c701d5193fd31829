use std::path::PathBuf;

use clap::Parser;

use scribe::Severity;

#[derive(Parser)]
#[command(version)]
#[command(about = "Emit sample log lines through a configured logger.", long_about = None)]
pub struct Args {
    /// Logger name to register.
    #[arg(long, default_value = "scribe")]
    pub name: String,

    /// Minimum severity passed through to the sinks.
    #[arg(short, long, value_enum, default_value = "debug")]
    pub level: Severity,

    /// Line template; defaults to the fixed-width console layout.
    #[arg(short, long)]
    pub template: Option<String>,

    /// Also append rendered lines to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
