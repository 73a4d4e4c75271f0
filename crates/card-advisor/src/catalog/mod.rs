//! Card catalog ingestion: CSV parsing, text normalisation and tier assignment.
//!
//! Loading never fails outward. Structural problems are logged and reported as
//! [`CatalogStatus::Unavailable`] next to an empty card list so callers can tell
//! a missing catalog apart from a filter that matched nothing.

pub mod domain;
mod normalizer;
mod parser;
mod source;
pub mod tier;

pub use domain::{CardRecord, CardTier, CardTraits, FeeKind, LoungeAccess, DEFAULT_IMAGE};
pub use normalizer::{has_bonus, parse_yen_to_int};
pub use source::{CachedCatalogSource, CatalogSource, CsvCatalogSource, StaticCatalogSource};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read card catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid card catalog CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("card catalog has no header row")]
    MissingHeader,
}

/// Whether the catalog behind a result could be read at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum CatalogStatus {
    Loaded,
    Unavailable { reason: String },
}

impl CatalogStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }
}

/// Snapshot of one catalog load. Immutable once built.
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    pub cards: Vec<CardRecord>,
    pub status: CatalogStatus,
    pub skipped_rows: usize,
    pub loaded_at: DateTime<Utc>,
}

impl CatalogLoad {
    /// Wraps already-classified cards, e.g. for demos and tests.
    pub fn from_cards(cards: Vec<CardRecord>) -> Self {
        Self {
            cards,
            status: CatalogStatus::Loaded,
            skipped_rows: 0,
            loaded_at: Utc::now(),
        }
    }

    pub fn unavailable(error: &CatalogError) -> Self {
        Self {
            cards: Vec::new(),
            status: CatalogStatus::Unavailable {
                reason: error.to_string(),
            },
            skipped_rows: 0,
            loaded_at: Utc::now(),
        }
    }
}

pub struct CatalogLoader;

impl CatalogLoader {
    /// Parses and classifies a catalog, propagating structural errors.
    pub fn try_from_reader<R: Read>(reader: R) -> Result<CatalogLoad, CatalogError> {
        let parsed = parser::parse_records(reader)?;
        let mut cards = parsed.cards;
        tier::assign_tiers(&mut cards);

        Ok(CatalogLoad {
            cards,
            status: CatalogStatus::Loaded,
            skipped_rows: parsed.skipped_rows,
            loaded_at: Utc::now(),
        })
    }

    pub fn try_from_path<P: AsRef<Path>>(path: P) -> Result<CatalogLoad, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::try_from_reader(file)
    }

    /// Loads a catalog, degrading to an empty unavailable snapshot on failure.
    pub fn from_reader<R: Read>(reader: R) -> CatalogLoad {
        Self::settle(Self::try_from_reader(reader), None)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> CatalogLoad {
        let path = path.as_ref();
        Self::settle(Self::try_from_path(path), Some(path))
    }

    fn settle(result: Result<CatalogLoad, CatalogError>, path: Option<&Path>) -> CatalogLoad {
        let source = path
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<reader>".to_string());

        match result {
            Ok(load) => {
                if load.skipped_rows > 0 {
                    warn!(%source, skipped = load.skipped_rows, "skipped malformed catalog rows");
                }
                info!(%source, cards = load.cards.len(), "card catalog loaded");
                load
            }
            Err(err) => {
                warn!(%source, error = %err, "card catalog unavailable");
                CatalogLoad::unavailable(&err)
            }
        }
    }
}
