use anyhow::Result;
use clap::Args;

use crate::data_paths::DataPaths;
use crate::manifest::{manifest, DEFAULT_APP_URL};

#[derive(Args)]
pub struct ManifestArgs {
    /// Deployment URL the manifest points at (falls back to $COINFOLIO_URL)
    #[arg(long)]
    pub url: Option<String>,
}

pub async fn execute(_data_paths: DataPaths, args: ManifestArgs) -> Result<()> {
    let url = args
        .url
        .or_else(|| std::env::var("COINFOLIO_URL").ok())
        .unwrap_or_else(|| DEFAULT_APP_URL.to_string());

    println!("{}", serde_json::to_string_pretty(&manifest(&url))?);
    Ok(())
}
