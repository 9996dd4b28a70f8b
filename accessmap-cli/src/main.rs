//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use accessmap_cli::CliError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    if let Err(err) = tracing_subscriber::fmt::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("accessmap: failed to install logger: {err}");
    }

    match accessmap_cli::run().await {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("accessmap: {err}");
            std::process::exit(1);
        }
    }
}
