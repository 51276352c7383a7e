//! Locating the catalog and the coder frequency table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::debug;

use mechlab_lib::{Database, FrequencyTable};

pub const CATALOG_ENV: &str = "MECHLAB_CATALOG";
pub const FREQUENCIES_ENV: &str = "MECHLAB_FREQUENCIES";

const CATALOG_FILE: &str = "catalog.json";
const FREQUENCIES_FILE: &str = "coder_frequencies_v3.csv";

/// Paths given on the command line, if any.
#[derive(Debug, Clone, Default)]
pub struct DataPaths {
    pub catalog: Option<PathBuf>,
    pub frequencies: Option<PathBuf>,
}

impl DataPaths {
    pub fn new(catalog: Option<PathBuf>, frequencies: Option<PathBuf>) -> Self {
        Self {
            catalog,
            frequencies,
        }
    }

    /// Load the catalog from the first existing candidate.
    ///
    /// Searches in the following order:
    /// 1. `--catalog`
    /// 2. `MECHLAB_CATALOG` environment variable
    /// 3. `catalog.json` in the user data directory
    /// 4. Repository fixture (only in debug builds)
    pub fn load_database(&self) -> Result<Database> {
        if let Some(path) = &self.catalog {
            return Database::from_path(path)
                .with_context(|| format!("failed to load catalog from {}", path.display()));
        }

        let path = catalog_candidates()
            .into_iter()
            .find(|p| p.exists())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "catalog not found; pass --catalog or set {} to a catalog.json file",
                    CATALOG_ENV
                )
            })?;
        debug!(path = %path.display(), "resolved catalog path");
        Database::from_path(&path)
            .with_context(|| format!("failed to load catalog from {}", path.display()))
    }

    /// Load the frequency table, falling back to the one built into the
    /// library when no file is found.
    pub fn load_frequencies(&self) -> Result<FrequencyTable> {
        let path = match &self.frequencies {
            Some(path) => Some(path.clone()),
            None => frequency_candidates().into_iter().find(|p| p.exists()),
        };

        match path {
            Some(path) => {
                debug!(path = %path.display(), "resolved frequency table path");
                FrequencyTable::from_path(&path).with_context(|| {
                    format!("failed to load frequency table from {}", path.display())
                })
            }
            None => FrequencyTable::embedded().context("embedded frequency table is invalid"),
        }
    }
}

fn catalog_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(env_path) = std::env::var(CATALOG_ENV) {
        candidates.push(PathBuf::from(env_path));
    }

    if let Some(dir) = data_dir() {
        candidates.push(dir.join(CATALOG_FILE));
    }

    if cfg!(debug_assertions) {
        let fixture =
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/catalog.json");
        candidates.push(fixture);
    }

    candidates
}

fn frequency_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(env_path) = std::env::var(FREQUENCIES_ENV) {
        candidates.push(PathBuf::from(env_path));
    }

    if let Some(dir) = data_dir() {
        candidates.push(dir.join(FREQUENCIES_FILE));
    }

    candidates
}

fn data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mechlab").map(|dirs| dirs.data_dir().to_path_buf())
}
