use card_advisor::catalog::{CachedCatalogSource, CatalogLoad, CatalogSource, CsvCatalogSource};
use card_advisor::config::CatalogConfig;
use card_advisor::recommend::TransportMode;
use card_advisor::recommend::{FeatureRequirement, InsuranceRequirement};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog source picked from configuration: cached across requests or
/// re-read on every request.
pub(crate) enum ConfiguredCatalog {
    Cached(CachedCatalogSource),
    Direct(CsvCatalogSource),
}

impl ConfiguredCatalog {
    pub(crate) fn from_config(config: &CatalogConfig) -> Self {
        let source = CsvCatalogSource::new(config.path.clone());
        if config.cache {
            Self::Cached(CachedCatalogSource::new(source))
        } else {
            Self::Direct(source)
        }
    }
}

impl CatalogSource for ConfiguredCatalog {
    fn load(&self) -> Arc<CatalogLoad> {
        match self {
            Self::Cached(source) => source.load(),
            Self::Direct(source) => source.load(),
        }
    }
}

pub(crate) fn parse_transport(raw: &str) -> Result<TransportMode, String> {
    TransportMode::from_label(raw)
        .ok_or_else(|| format!("unknown transport '{raw}' (expected train, flight or car)"))
}

pub(crate) fn parse_insurance(raw: &str) -> Result<InsuranceRequirement, String> {
    InsuranceRequirement::from_label(raw).ok_or_else(|| {
        format!("unknown insurance '{raw}' (expected overseas_travel, domestic_travel or shopping)")
    })
}

pub(crate) fn parse_feature(raw: &str) -> Result<FeatureRequirement, String> {
    FeatureRequirement::from_label(raw).ok_or_else(|| {
        let known: Vec<&str> = FeatureRequirement::ordered()
            .into_iter()
            .map(FeatureRequirement::label)
            .collect();
        format!("unknown feature '{raw}' (expected one of {})", known.join(", "))
    })
}
