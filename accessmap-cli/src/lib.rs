//! Command-line front end for the AccessMap widget.
//!
//! Renders the widget as text so it can be driven from a terminal or a
//! script: one-shot subcommands for single UI events and an interactive
//! `session` for the full lifecycle.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod error;
mod frontend;
mod session;

pub use error::CliError;
pub use frontend::{Console, TextController, TextList, TextPanel, TextSurface, pan_center};
pub use session::{FilterChange, Flow, HELP, ParseCommandError, Session, SessionCommand};

use config::{AmenitiesArgs, ReportArgs, ReportsArgs, SearchArgs, SessionArgs};

/// Run the AccessMap CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are unusable, an
/// HTTP client cannot be built, I/O fails, or a one-shot widget operation
/// fails.
pub async fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Amenities(args) => {
            let config = args.into_config()?;
            let backend = config.endpoints.backend()?;
            commands::run_amenities(&config, &backend, &mut out).await
        }
        Command::Reports(args) => {
            let endpoints = args.into_config()?;
            let backend = endpoints.backend()?;
            commands::run_reports(&backend, &mut out).await
        }
        Command::Report(args) => {
            let config = args.into_config()?;
            let backend = config.endpoints.backend()?;
            commands::run_report(&config, &backend, &mut out).await
        }
        Command::Search(args) => {
            let config = args.into_config()?;
            let geocoder = config.endpoints.geocoder()?;
            commands::run_search(&config.query, &geocoder, &mut out).await
        }
        Command::Session(args) => {
            let config = args.into_config()?;
            let backend = config.endpoints.backend()?;
            let geocoder = config.endpoints.geocoder()?;
            let geolocator = config.geolocator();
            let mut session = Session::new(config.settings, &backend, &geocoder, &geolocator);
            session.run(std::io::stdin().lock(), &mut out).await
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "accessmap",
    about = "Find accessible amenities and report accessibility issues",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List amenities around a point.
    Amenities(AmenitiesArgs),
    /// List stored accessibility reports.
    Reports(ReportsArgs),
    /// Report an accessibility issue.
    Report(ReportArgs),
    /// Geocode a place name.
    Search(SearchArgs),
    /// Drive the map widget from text commands.
    Session(SessionArgs),
}

#[cfg(test)]
mod tests;
