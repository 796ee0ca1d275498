use metrics_exporter_prometheus::PrometheusHandle;
use preflist::config::DatasetConfig;
use preflist::predictor::{
    CachedCsvSource, CsvFileSource, CutoffRecord, DatasetError, DatasetSource, PreferenceService,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Request-layer state for the plumbing endpoints; the prediction routes
/// themselves only see the service.
#[derive(Clone)]
pub struct AppState {
    pub readiness: Arc<AtomicBool>,
    pub metrics: Arc<PrometheusHandle>,
}

/// Dataset source picked by configuration: plain per-request re-reads, or
/// the mtime-keyed cache when `APP_DATASET_CACHE` is set.
pub(crate) enum ConfiguredSource {
    File(CsvFileSource),
    Cached(CachedCsvSource),
}

impl DatasetSource for ConfiguredSource {
    fn load(&self) -> Result<Arc<Vec<CutoffRecord>>, DatasetError> {
        match self {
            ConfiguredSource::File(source) => source.load(),
            ConfiguredSource::Cached(source) => source.load(),
        }
    }
}

pub(crate) fn dataset_source(config: &DatasetConfig) -> ConfiguredSource {
    if config.cache {
        ConfiguredSource::Cached(CachedCsvSource::new(&config.path, config.unknown_ranks))
    } else {
        ConfiguredSource::File(CsvFileSource::new(&config.path, config.unknown_ranks))
    }
}

/// Shared service assembly for the HTTP server and the one-shot CLI.
pub(crate) fn preference_service(config: &DatasetConfig) -> Arc<PreferenceService<ConfiguredSource>> {
    Arc::new(PreferenceService::new(Arc::new(dataset_source(config))))
}
