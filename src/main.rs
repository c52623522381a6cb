//! Celpatch CLI binary

use anyhow::Result;

use celpatch::cli::CliApp;

fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for outcome lines
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "celpatch=info,celpatch_crd=info".into()),
        )
        .init();

    // Parse command line arguments
    let matches = CliApp::app().get_matches();

    // Run the CLI application
    CliApp::run(&matches)
}
