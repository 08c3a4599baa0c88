use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::PricingError;

use super::cache;
use super::provider;
use super::types::{Catalog, CatalogEntry};

/// Raw upstream catalog: model key -> untyped entry JSON.
pub(crate) type RawCatalog = HashMap<String, serde_json::Value>;

/// Replacement data source used instead of snapshot and network when
/// running offline. The CLI's `--catalog <FILE>` flag and the tests both
/// inject one.
pub(crate) type OfflineLoader = Box<dyn Fn() -> Result<RawCatalog, PricingError> + Send + Sync>;

const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub(crate) struct CatalogOptions {
    pub(crate) offline: bool,
    pub(crate) offline_loader: Option<OfflineLoader>,
    pub(crate) url: String,
    pub(crate) cache_ttl: Duration,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            offline: false,
            offline_loader: None,
            url: provider::DEFAULT_CATALOG_URL.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

/// Access to the upstream pricing catalog.
///
/// Exposes the two query shapes the resolver consumes: the full exact-key
/// map (`fetch_all`) and a relaxed single-model lookup (`fetch_one`).
/// Snapshotting, offline fallback, fetch retries, memoization and logging
/// all live here; callers only see `Result`-typed data.
pub(crate) struct CatalogClient {
    options: CatalogOptions,
    catalog: OnceCell<Arc<Catalog>>,
}

impl CatalogClient {
    pub(crate) fn new(options: CatalogOptions) -> Self {
        Self {
            options,
            catalog: OnceCell::new(),
        }
    }

    /// Full exact-key catalog, loaded at most once per client. A failed
    /// load is not memoized, so a later call may retry.
    pub(crate) async fn fetch_all(&self) -> Result<Arc<Catalog>, PricingError> {
        let catalog = self
            .catalog
            .get_or_try_init(|| async {
                let raw = self.load_raw().await?;
                Ok::<_, PricingError>(Arc::new(parse_catalog(raw)))
            })
            .await?;
        Ok(Arc::clone(catalog))
    }

    /// Relaxed single-model lookup: exact key, then case-insensitive key,
    /// then substring containment in either direction with the longest
    /// catalog key preferred (ties broken lexicographically). Returns
    /// `Ok(None)` when nothing matches; errors only on retrieval failure.
    pub(crate) async fn fetch_one(
        &self,
        model: &str,
    ) -> Result<Option<CatalogEntry>, PricingError> {
        let catalog = self.fetch_all().await?;

        if let Some(entry) = catalog.get(model) {
            return Ok(Some(entry.clone()));
        }

        let model_lower = model.to_lowercase();
        if let Some((_, entry)) = catalog
            .iter()
            .filter(|(name, _)| name.to_lowercase() == model_lower)
            .min_by(|(a, _), (b, _)| a.cmp(b))
        {
            return Ok(Some(entry.clone()));
        }

        let mut candidates: Vec<(&String, &CatalogEntry)> = catalog
            .iter()
            .filter(|(name, _)| {
                let name_lower = name.to_lowercase();
                name_lower.contains(&model_lower) || model_lower.contains(&name_lower)
            })
            .collect();
        candidates.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Ok(candidates.first().map(|(_, entry)| (*entry).clone()))
    }

    /// Force a network fetch and rewrite the snapshot, bypassing the TTL.
    pub(crate) async fn refresh(&self) -> Result<usize, PricingError> {
        let raw = provider::fetch_catalog_raw(&self.options.url).await?;
        if let Some(path) = cache::snapshot_path() {
            cache::store(&path, &raw);
        }
        Ok(raw.len())
    }

    async fn load_raw(&self) -> Result<RawCatalog, PricingError> {
        if self.options.offline {
            return self.load_raw_offline();
        }

        let path = cache::snapshot_path();
        if let Some(path) = &path {
            if let Some(age) = cache::age(path) {
                if age <= self.options.cache_ttl {
                    match cache::load(path) {
                        Ok(raw) => {
                            info!("using catalog snapshot ({:.1}h old)", age.as_secs_f64() / 3600.0);
                            return Ok(raw);
                        }
                        Err(err) => warn!("unreadable catalog snapshot, refetching: {err}"),
                    }
                }
            }
        }

        match provider::fetch_catalog_raw(&self.options.url).await {
            Ok(raw) => {
                info!("fetched pricing catalog ({} models)", raw.len());
                if let Some(path) = &path {
                    cache::store(path, &raw);
                }
                Ok(raw)
            }
            Err(err) => {
                // A stale snapshot beats no data when the network is down.
                if let Some(path) = &path {
                    if let Ok(raw) = cache::load(path) {
                        warn!("catalog fetch failed, using stale snapshot: {err}");
                        return Ok(raw);
                    }
                }
                Err(err)
            }
        }
    }

    fn load_raw_offline(&self) -> Result<RawCatalog, PricingError> {
        if let Some(loader) = &self.options.offline_loader {
            debug!("loading catalog from injected offline source");
            return loader();
        }
        match cache::snapshot_path() {
            Some(path) if path.exists() => {
                info!("offline mode, using catalog snapshot");
                cache::load(&path)
            }
            _ => Err(PricingError::Offline),
        }
    }
}

fn parse_catalog(raw: RawCatalog) -> Catalog {
    let mut models = Catalog::with_capacity(raw.len());
    for (name, value) in raw {
        if !value.is_object() {
            continue;
        }
        match serde_json::from_value::<CatalogEntry>(value) {
            Ok(entry) => {
                models.insert(name, entry);
            }
            Err(err) => debug!("skipping unparsable catalog entry {name}: {err}"),
        }
    }
    models
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with(raw: serde_json::Value) -> CatalogClient {
        let map: RawCatalog = serde_json::from_value(raw).expect("raw catalog fixture");
        CatalogClient::new(CatalogOptions {
            offline: true,
            offline_loader: Some(Box::new(move || Ok(map.clone()))),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn fetch_all_parses_entries_and_skips_junk() {
        let client = client_with(serde_json::json!({
            "gpt-5": {"input_cost_per_token": 1.25e-6, "output_cost_per_token": 1e-5},
            "not-an-entry": "free-form docstring",
            "limits-only": {"max_input_tokens": 400000},
        }));

        let catalog = client.fetch_all().await.expect("fetch_all");
        assert_eq!(catalog.len(), 2);
        assert!(catalog["gpt-5"].is_complete());
        assert!(!catalog["limits-only"].is_complete());
    }

    #[tokio::test]
    async fn fetch_one_prefers_exact_over_fuzzy() {
        let client = client_with(serde_json::json!({
            "gpt-5": {"input_cost_per_token": 1.25e-6, "output_cost_per_token": 1e-5},
            "gpt-5-mini": {"input_cost_per_token": 2.5e-7, "output_cost_per_token": 2e-6},
        }));

        let entry = client.fetch_one("gpt-5").await.expect("ok").expect("hit");
        assert_eq!(entry.input_cost_per_token, Some(1.25e-6));
    }

    #[tokio::test]
    async fn fetch_one_matches_case_insensitively() {
        let client = client_with(serde_json::json!({
            "gpt-5": {"input_cost_per_token": 1.25e-6, "output_cost_per_token": 1e-5},
        }));

        let entry = client.fetch_one("GPT-5").await.expect("ok").expect("hit");
        assert_eq!(entry.output_cost_per_token, Some(1e-5));
    }

    #[tokio::test]
    async fn fetch_one_containment_prefers_longest_key() {
        let client = client_with(serde_json::json!({
            "gpt-5.2": {"input_cost_per_token": 1e-6, "output_cost_per_token": 1e-5},
            "gpt-5.2-codex": {"input_cost_per_token": 1.25e-6, "output_cost_per_token": 1e-5},
        }));

        // Both keys contain the query; the longer one wins.
        let entry = client
            .fetch_one("5.2")
            .await
            .expect("ok")
            .expect("hit");
        assert_eq!(entry.input_cost_per_token, Some(1.25e-6));
    }

    #[tokio::test]
    async fn fetch_one_misses_cleanly() {
        let client = client_with(serde_json::json!({
            "gpt-5": {"input_cost_per_token": 1.25e-6, "output_cost_per_token": 1e-5},
        }));

        assert!(client.fetch_one("qwen3-coder").await.expect("ok").is_none());
    }

    #[tokio::test]
    async fn loader_error_propagates_and_is_not_memoized() {
        let client = CatalogClient::new(CatalogOptions {
            offline: true,
            offline_loader: Some(Box::new(|| Err(PricingError::Offline))),
            ..Default::default()
        });

        assert!(matches!(
            client.fetch_all().await,
            Err(PricingError::Offline)
        ));
        // Second call goes back to the loader instead of a poisoned cell.
        assert!(matches!(
            client.fetch_all().await,
            Err(PricingError::Offline)
        ));
    }

    #[tokio::test]
    async fn fetch_all_is_memoized() {
        let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = std::sync::Arc::clone(&calls);
        let client = CatalogClient::new(CatalogOptions {
            offline: true,
            offline_loader: Some(Box::new(move || {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Ok(RawCatalog::new())
            })),
            ..Default::default()
        });

        client.fetch_all().await.expect("first");
        client.fetch_all().await.expect("second");
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
