//! One-shot subcommands.
//!
//! Each command builds a widget rendered to a [`Console`], performs the one
//! UI event it stands for and writes the resulting transcript. Widget
//! failures are printed as notices first and then surface as
//! [`CliError::Widget`] so the process exits non-zero.

use std::io::Write;

use accessmap_core::{AmenitySource, Geocoder, MapSettings, ReportStore};
use log::info;

use crate::CliError;
use crate::config::{AmenitiesConfig, ReportConfig};
use crate::frontend::{Console, TextController};

fn widget(settings: MapSettings) -> (Console, TextController) {
    let console = Console::default();
    let controller = console.controller(settings);
    (console, controller)
}

fn finish<W: Write>(
    console: &Console,
    out: &mut W,
    result: Result<(), accessmap_core::AtlasError>,
) -> Result<(), CliError> {
    console.flush_to(out).map_err(CliError::WriteOutput)?;
    result.map_err(CliError::Widget)
}

/// Load amenities around the configured center and print the filtered list.
pub(crate) async fn run_amenities<A, W>(
    config: &AmenitiesConfig,
    source: &A,
    out: &mut W,
) -> Result<(), CliError>
where
    A: AmenitySource + ?Sized,
    W: Write,
{
    let (console, mut controller) = widget(config.settings);
    let _shown = controller.set_criteria(config.criteria.clone());
    // Nothing is loaded yet; only the post-load render is worth printing.
    console.discard();
    let result = controller.refresh_current_view(source).await.map(|total| {
        info!(
            "showing {} of {total} amenities",
            controller.list().len()
        );
    });
    finish(&console, out, result)
}

/// Print a marker line for every stored report.
pub(crate) async fn run_reports<R, W>(store: &R, out: &mut W) -> Result<(), CliError>
where
    R: ReportStore + ?Sized,
    W: Write,
{
    let (console, mut controller) = widget(MapSettings::default());
    console.discard();
    let result = controller.load_reports(store).await.map(|count| {
        console.println(format!("reports ({count})"));
    });
    finish(&console, out, result)
}

/// Submit one report at the configured center.
pub(crate) async fn run_report<R, W>(
    config: &ReportConfig,
    store: &R,
    out: &mut W,
) -> Result<(), CliError>
where
    R: ReportStore + ?Sized,
    W: Write,
{
    let (console, mut controller) = widget(config.settings);
    console.discard();
    let mut draft = controller
        .open_report_form()
        .clone()
        .with_issue_type(config.issue_type.clone());
    if let Some(description) = &config.description {
        draft = draft.with_description(description.clone());
    }
    let result = controller.submit_report(store, draft).await;
    finish(&console, out, result)
}

/// Geocode `query` and print where the map would re-center.
pub(crate) async fn run_search<G, W>(query: &str, geocoder: &G, out: &mut W) -> Result<(), CliError>
where
    G: Geocoder + ?Sized,
    W: Write,
{
    let (console, mut controller) = widget(MapSettings::default());
    console.discard();
    let result = controller.search(geocoder, query).await.map(|found| {
        if let Some(place) = found {
            console.println(format!("found {}", place.display_name));
        }
    });
    finish(&console, out, result)
}
