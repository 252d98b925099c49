//! Photo editor command line front end
//!
//! Loads a photo from disk, runs it through an edit session (background
//! removal, crop, color filters, brush strokes, frame) and writes the result.
//!
//! # Architecture
//! - `cli`: clap argument definitions and value parsers
//! - `config`: TOML defaults for brush, frame, previews and background removal
//! - `logic`: one handler per subcommand

#[macro_use]
extern crate derivative;

pub mod cli;
pub mod config;
pub mod logic;

use anyhow::Result;
use clap::Parser;

/// Initializes the logger.
///
/// Sets up a custom logger format with timestamp, log level, file name, line number,
/// and log message. Uses local time format for timestamps.
pub fn init_logger() {
    use std::io::Write;

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

pub fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    let config = config::Config::init(cli.config.clone())?;

    match &cli.command {
        cli::Command::Filters => logic::list_filters(),
        cli::Command::Apply(args) => logic::apply(args, &config),
        cli::Command::Previews(args) => logic::previews(args, &config),
    }
}
