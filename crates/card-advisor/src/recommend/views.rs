use super::fallback::FallbackGroupSummary;
use super::scoring::CardScore;
use crate::catalog::{CardRecord, CardTier, CatalogStatus, DEFAULT_IMAGE};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationEntry {
    /// 1-based position in the returned list.
    pub rank: usize,
    pub image: String,
    /// Tier group the entry was drawn from when substituting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier_group: Option<CardTier>,
    pub score: CardScore,
    pub card: CardRecord,
}

/// Ranked output handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub catalog_status: CatalogStatus,
    /// No card matched the criteria; `entries` are per-tier substitutes.
    pub fallback: bool,
    /// Cards that passed the filters.
    pub matched: usize,
    pub catalog_size: usize,
    pub entries: Vec<RecommendationEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallback_groups: Vec<FallbackGroupSummary>,
}

impl Recommendation {
    pub fn catalog_unavailable(&self) -> bool {
        !self.catalog_status.is_loaded()
    }
}

/// Resolves card artwork, substituting the default image when the file is missing.
#[derive(Debug, Clone, Default)]
pub struct ImageResolver {
    dir: Option<PathBuf>,
}

impl ImageResolver {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Trusts every reference without checking the filesystem.
    pub fn unchecked() -> Self {
        Self { dir: None }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Only bare file names are served; anything that could leave the image
    /// directory falls back to the default artwork.
    pub fn resolve(&self, card: &CardRecord) -> String {
        let image = card.image_or_default();
        if !is_bare_file_name(image) {
            return DEFAULT_IMAGE.to_string();
        }
        match &self.dir {
            Some(dir) if !dir.join(image).is_file() => DEFAULT_IMAGE.to_string(),
            _ => image.to_string(),
        }
    }
}

fn is_bare_file_name(image: &str) -> bool {
    if image.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(image).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
