//! Interactive session driving the full widget lifecycle from text commands.
//!
//! Every command maps to one UI event. After each command the session
//! compares the map center with the one recorded before the command; a
//! changed center is reported to the controller as a viewport settle, which
//! auto-refreshes amenities once a load has succeeded.

use std::io::{BufRead, Write};
use std::str::FromStr;

use accessmap_core::location::from_lat_lon;
use accessmap_core::{
    AmenitySource, FilterCriteria, Geocoder, Geolocator, MapSettings, PanDirection, ReportStore,
    TagFilter,
};
use geo::Coord;
use log::debug;
use thiserror::Error;

use crate::CliError;
use crate::frontend::{Console, TextController};

/// Help text printed by the `help` command.
pub const HELP: &str = "\
commands:
  load                         load amenities around the map center
  move <lat> <lon>             drag the map to a new center
  filter wheelchair <value>    yes, no, limited, unknown or all
  filter category <value>      an amenity type or all
  filter name <text>           case-insensitive name search
  filter clear                 reset every filter
  select <n>                   center on list entry n
  pan <up|down|left|right>     pan the map by one step
  search <place>               geocode a place and center on it
  locate                       center on the user's position
  report <issue> [details]     report an issue at the map center
  help                         show this help
  quit                         end the session";

/// Change to one filter control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    /// Accessibility control.
    Wheelchair(TagFilter),
    /// Category control.
    Category(TagFilter),
    /// Free-text name control.
    Name(String),
    /// Reset every control.
    Clear,
}

/// One line of session input.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Load amenities for the current view.
    Load,
    /// Drag the map to a new center.
    Move(Coord<f64>),
    /// Change a filter control.
    Filter(FilterChange),
    /// Center on the 1-based list entry.
    Select(usize),
    /// Pan the map by one step.
    Pan(PanDirection),
    /// Geocode a place.
    Search(String),
    /// Center on the user's position.
    Locate,
    /// Submit a report at the map center.
    Report {
        /// Issue category.
        issue_type: String,
        /// Optional details.
        description: String,
    },
    /// Print the command list.
    Help,
    /// End the session.
    Quit,
}

/// Error raised for unparsable session input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    /// The first word is not a command.
    #[error("unknown command {0:?}; type help for a list")]
    Unknown(String),
    /// The command is missing an argument or has a malformed one.
    #[error("usage: {0}")]
    Usage(&'static str),
}

const MOVE_USAGE: &str = "move <lat> <lon>";
const FILTER_USAGE: &str = "filter <wheelchair|category|name|clear> [value]";
const SELECT_USAGE: &str = "select <n>";
const PAN_USAGE: &str = "pan <up|down|left|right>";
const SEARCH_USAGE: &str = "search <place>";
const REPORT_USAGE: &str = "report <issue> [details]";

fn split_word(input: &str) -> (&str, &str) {
    let trimmed = input.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    }
}

fn parse_move(rest: &str) -> Result<SessionCommand, ParseCommandError> {
    let mut parts = rest.split_whitespace().map(str::parse::<f64>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(lat)), Some(Ok(lon)), None) => Ok(SessionCommand::Move(from_lat_lon(lat, lon))),
        _ => Err(ParseCommandError::Usage(MOVE_USAGE)),
    }
}

fn parse_filter(rest: &str) -> Result<SessionCommand, ParseCommandError> {
    let (control, value) = split_word(rest);
    let change = match control.to_ascii_lowercase().as_str() {
        "clear" => FilterChange::Clear,
        "name" => FilterChange::Name(value.to_owned()),
        "wheelchair" | "category" if value.is_empty() => {
            return Err(ParseCommandError::Usage(FILTER_USAGE));
        }
        "wheelchair" => FilterChange::Wheelchair(TagFilter::from(value)),
        "category" => FilterChange::Category(TagFilter::from(value)),
        _ => return Err(ParseCommandError::Usage(FILTER_USAGE)),
    };
    Ok(SessionCommand::Filter(change))
}

fn required<'a>(rest: &'a str, usage: &'static str) -> Result<&'a str, ParseCommandError> {
    if rest.is_empty() {
        Err(ParseCommandError::Usage(usage))
    } else {
        Ok(rest)
    }
}

impl FromStr for SessionCommand {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (word, rest) = split_word(s);
        match word.to_ascii_lowercase().as_str() {
            "load" => Ok(Self::Load),
            "move" => parse_move(rest),
            "filter" => parse_filter(rest),
            "select" => required(rest, SELECT_USAGE)?
                .parse()
                .ok()
                .filter(|index| *index > 0)
                .map(Self::Select)
                .ok_or(ParseCommandError::Usage(SELECT_USAGE)),
            "pan" => required(rest, PAN_USAGE)?
                .parse()
                .map(Self::Pan)
                .map_err(|_| ParseCommandError::Usage(PAN_USAGE)),
            "search" => required(rest, SEARCH_USAGE).map(|query| Self::Search(query.to_owned())),
            "locate" => Ok(Self::Locate),
            "report" => {
                let (issue_type, description) = split_word(required(rest, REPORT_USAGE)?);
                Ok(Self::Report {
                    issue_type: issue_type.to_owned(),
                    description: description.to_owned(),
                })
            }
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(ParseCommandError::Unknown(word.to_owned())),
        }
    }
}

/// Whether the session continues after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command.
    Continue,
    /// Stop reading.
    Quit,
}

/// A widget session wired to its backends.
pub struct Session<'a, B: ?Sized, G: ?Sized, L: ?Sized> {
    console: Console,
    controller: TextController,
    backend: &'a B,
    geocoder: &'a G,
    geolocator: &'a L,
}

impl<'a, B, G, L> Session<'a, B, G, L>
where
    B: AmenitySource + ReportStore + ?Sized,
    G: Geocoder + ?Sized,
    L: Geolocator + ?Sized,
{
    /// Start a session showing the initial view of `settings`.
    pub fn new(settings: MapSettings, backend: &'a B, geocoder: &'a G, geolocator: &'a L) -> Self {
        let console = Console::default();
        let controller = console.controller(settings);
        Self {
            console,
            controller,
            backend,
            geocoder,
            geolocator,
        }
    }

    /// The console the session renders to.
    #[must_use]
    pub const fn console(&self) -> &Console {
        &self.console
    }

    /// The widget state.
    #[must_use]
    pub const fn controller(&self) -> &TextController {
        &self.controller
    }

    /// Draw the stored reports, as the widget does when it starts.
    pub async fn start(&mut self) {
        if let Err(err) = self.controller.load_reports(self.backend).await {
            debug!("continuing without stored reports: {err}");
        }
    }

    /// Apply one command.
    pub async fn execute(&mut self, command: SessionCommand) -> Flow {
        let before = self.console.center();
        let result = match command {
            SessionCommand::Load => self
                .controller
                .refresh_current_view(self.backend)
                .await
                .map(drop),
            SessionCommand::Move(center) => {
                self.console.drag_to(center);
                Ok(())
            }
            SessionCommand::Filter(change) => {
                self.apply_filter(change);
                Ok(())
            }
            SessionCommand::Select(index) => {
                let row = index.checked_sub(1);
                if !row.is_some_and(|row| self.controller.select_amenity(row)) {
                    self.console.println(format!("no list entry {index}"));
                }
                Ok(())
            }
            SessionCommand::Pan(direction) => {
                self.controller.pan(direction);
                Ok(())
            }
            SessionCommand::Search(query) => self
                .controller
                .search(self.geocoder, &query)
                .await
                .map(|found| {
                    if let Some(place) = found {
                        self.console.println(format!("found {}", place.display_name));
                    }
                }),
            SessionCommand::Locate => self.controller.locate(self.geolocator).await.map(drop),
            SessionCommand::Report {
                issue_type,
                description,
            } => {
                let draft = self
                    .controller
                    .open_report_form()
                    .clone()
                    .with_issue_type(issue_type)
                    .with_description(description);
                self.controller.submit_report(self.backend, draft).await
            }
            SessionCommand::Help => {
                self.console.println(HELP);
                Ok(())
            }
            SessionCommand::Quit => return Flow::Quit,
        };
        if let Err(err) = result {
            debug!("command failed: {err}");
        }
        self.settle_viewport(before).await;
        Flow::Continue
    }

    fn apply_filter(&mut self, change: FilterChange) {
        let shown = match change {
            FilterChange::Wheelchair(filter) => self.controller.set_wheelchair_filter(filter),
            FilterChange::Category(filter) => self.controller.set_category_filter(filter),
            FilterChange::Name(query) => self.controller.set_name_query(query),
            FilterChange::Clear => self.controller.set_criteria(FilterCriteria::default()),
        };
        debug!("filter change shows {shown} amenities");
    }

    async fn settle_viewport(&mut self, before: Option<Coord<f64>>) {
        let Some(after) = self.console.center() else {
            return;
        };
        if before == Some(after) && self.controller.viewport() == after {
            return;
        }
        if let Err(err) = self.controller.follow_viewport(self.backend, after).await {
            debug!("auto-refresh failed: {err}");
        }
    }

    /// Read commands from `input` until `quit` or end of input, writing the
    /// rendered output after each one.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::ReadInput`] or [`CliError::WriteOutput`] on I/O
    /// failures. Widget failures are shown as notices and do not end the
    /// session.
    pub async fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        output: &mut W,
    ) -> Result<(), CliError> {
        self.start().await;
        self.console.flush_to(output).map_err(CliError::WriteOutput)?;
        for line in input.lines() {
            let line = line.map_err(CliError::ReadInput)?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let flow = match trimmed.parse::<SessionCommand>() {
                Ok(command) => self.execute(command).await,
                Err(err) => {
                    self.console.println(format!("error: {err}"));
                    Flow::Continue
                }
            };
            self.console.flush_to(output).map_err(CliError::WriteOutput)?;
            if flow == Flow::Quit {
                break;
            }
        }
        Ok(())
    }
}
