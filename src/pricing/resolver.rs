use crate::error::PricingError;

use super::catalog::CatalogClient;
use super::types::{Catalog, CatalogEntry, ModelPricing};

/// Provider prefixes tried, in order, after the bare name during strict
/// lookup. The catalog files many models only under a qualified key.
const PROVIDER_PREFIXES: &[&str] = &["openai/", "azure/", "openrouter/openai/"];

/// Substitute bare names for models the upstream catalog has not picked up
/// yet, or prices identically to a predecessor. One alias per model; the
/// alias's own alias is never followed.
const MODEL_ALIASES: &[(&str, &str)] = &[
    ("gpt-5.3-codex", "gpt-5.2-codex"),
    ("gpt-5.3-codex-mini", "gpt-5.2-codex-mini"),
    ("codex-mini-latest", "gpt-5.1-codex-mini"),
];

fn alias_for(model: &str) -> Option<&'static str> {
    MODEL_ALIASES
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, alias)| *alias)
}

/// Resolves a bare model name to a complete per-million pricing record.
///
/// Lookup ladder: exact/prefixed keys for the name itself, then the same
/// for its alias, then a relaxed catalog query for the alias, finally a
/// relaxed query for the original name. An entry missing either cost is
/// only ever displaced by a complete one, and accessor errors abort the
/// ladder immediately.
pub(crate) struct PricingResolver {
    catalog: CatalogClient,
}

impl PricingResolver {
    pub(crate) fn new(catalog: CatalogClient) -> Self {
        Self { catalog }
    }

    pub(crate) fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    pub(crate) async fn resolve(&self, model: &str) -> Result<ModelPricing, PricingError> {
        let mut best = self.strict_lookup(model).await?;

        if !is_complete(best.as_ref()) {
            if let Some(alias) = alias_for(model) {
                let candidate = match self.strict_lookup(alias).await? {
                    Some(entry) if entry.is_complete() => Some(entry),
                    _ => self.catalog.fetch_one(alias).await?,
                };
                if is_complete(candidate.as_ref()) {
                    best = candidate;
                }
            }
        }

        if !is_complete(best.as_ref()) {
            let candidate = self.catalog.fetch_one(model).await?;
            if is_complete(candidate.as_ref()) {
                best = candidate;
            }
        }

        match best {
            Some(entry) if entry.is_complete() => Ok(normalize(&entry)),
            _ => Err(PricingError::NotFound {
                model: model.to_string(),
            }),
        }
    }

    /// First *existing* entry among `[model, prefix1+model, ...]`, complete
    /// or not. One batch query; the candidate scan happens client-side.
    async fn strict_lookup(&self, model: &str) -> Result<Option<CatalogEntry>, PricingError> {
        let catalog = self.catalog.fetch_all().await?;
        Ok(lookup_candidates(model, &catalog))
    }
}

fn lookup_candidates(model: &str, catalog: &Catalog) -> Option<CatalogEntry> {
    if let Some(entry) = catalog.get(model) {
        return Some(entry.clone());
    }
    PROVIDER_PREFIXES
        .iter()
        .find_map(|prefix| catalog.get(&format!("{prefix}{model}")))
        .cloned()
}

fn is_complete(entry: Option<&CatalogEntry>) -> bool {
    entry.is_some_and(CatalogEntry::is_complete)
}

/// Per-token cost scaled to USD per million tokens, with a caller-chosen
/// fallback for an absent value.
fn per_million(value: Option<f64>, fallback: Option<f64>) -> f64 {
    value.or(fallback).unwrap_or(0.0) * 1_000_000.0
}

/// Callers only reach this with a complete entry, so the zero default in
/// `per_million` never leaks into a returned record. A missing cache-read
/// cost prices cached input the same as fresh input.
fn normalize(entry: &CatalogEntry) -> ModelPricing {
    ModelPricing {
        input: per_million(entry.input_cost_per_token, None),
        cached_input: per_million(entry.cache_read_input_token_cost, entry.input_cost_per_token),
        output: per_million(entry.output_cost_per_token, None),
    }
}
