//! Error types emitted by the AccessMap CLI.

use std::sync::Arc;

use accessmap_core::AtlasError;
use accessmap_data::ClientBuildError;
use thiserror::Error;

/// Errors emitted by the AccessMap CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// An option was set to an unusable value.
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
    /// An HTTP client could not be constructed.
    #[error(transparent)]
    BuildClient(#[from] ClientBuildError),
    /// A widget operation failed; its notice was already printed.
    #[error(transparent)]
    Widget(#[from] AtlasError),
    /// Reading session commands failed.
    #[error("failed to read commands: {0}")]
    ReadInput(#[source] std::io::Error),
    /// Writing rendered output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
