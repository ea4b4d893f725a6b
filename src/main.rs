use anyhow::Result;
use clap::Parser;

use coinfolio::cli;
use coinfolio::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI and execute (CLI will handle logging initialization)
    let cli = cli::Cli::parse();

    match cli.execute().await {
        Ok(()) => {
            logging::log_session_end();
            Ok(())
        }
        Err(e) => {
            tracing::error!("Application error: {}", e);

            // Log error chain if available
            for cause in e.chain().skip(1) {
                tracing::error!("   Caused by: {}", cause);
            }

            logging::log_session_end();
            Err(e)
        }
    }
}
