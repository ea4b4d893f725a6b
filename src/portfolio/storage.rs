//! Persistence slot for the portfolio
//!
//! A single JSON file (`portfolio.json` under the data directory) holding
//! `{ tokens: [...], lastUpdated: ... }`. Read once at startup; written
//! after holdings-changing mutations. An empty portfolio is never written,
//! so a prior non-empty snapshot may linger in the slot.

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use super::types::{Holding, SavedPortfolio};
use crate::data_paths::DataPaths;

/// Portfolio slot storage manager
#[derive(Clone)]
pub struct PortfolioStorage {
    slot_path: PathBuf,
}

impl PortfolioStorage {
    /// Create a storage manager over the data directory's slot
    pub fn new(data_paths: &DataPaths) -> Self {
        Self {
            slot_path: data_paths.portfolio_file(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.slot_path
    }

    /// Read the slot. A missing, unreadable, or unparseable slot is treated
    /// as "no saved portfolio".
    pub async fn load(&self) -> Vec<Holding> {
        if !self.slot_path.exists() {
            debug!("No saved portfolio at {:?}", self.slot_path);
            return Vec::new();
        }

        let content = match fs::read_to_string(&self.slot_path).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read portfolio slot: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<SavedPortfolio>(&content) {
            Ok(saved) => {
                info!(
                    "Loaded {} holdings from {:?} (last updated {})",
                    saved.tokens.len(),
                    self.slot_path,
                    saved.last_updated
                );
                saved.tokens
            }
            Err(e) => {
                warn!("Failed to parse portfolio slot, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Write the slot. Empty holdings are skipped entirely.
    pub async fn save(&self, holdings: &[Holding]) -> Result<()> {
        if holdings.is_empty() {
            debug!("Skipping save of empty portfolio");
            return Ok(());
        }

        if let Some(parent) = self.slot_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create data directory")?;
        }

        let saved = SavedPortfolio {
            tokens: holdings.to_vec(),
            last_updated: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&saved)?;

        fs::write(&self.slot_path, json)
            .await
            .context("Failed to write portfolio slot")?;

        debug!("Saved {} holdings to {:?}", holdings.len(), self.slot_path);
        Ok(())
    }
}
