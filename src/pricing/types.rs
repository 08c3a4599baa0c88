use std::collections::HashMap;

use serde::Deserialize;

/// Parsed exact-key catalog: model key -> entry.
pub(crate) type Catalog = HashMap<String, CatalogEntry>;

/// One upstream catalog entry. All cost fields are fractional USD per
/// single token and any of them may be absent; upstream also carries
/// metadata (token limits, provider tags) that deserialization drops.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CatalogEntry {
    pub(crate) input_cost_per_token: Option<f64>,
    pub(crate) output_cost_per_token: Option<f64>,
    pub(crate) cache_read_input_token_cost: Option<f64>,
}

impl CatalogEntry {
    /// An entry is usable for pricing only when both the input and output
    /// costs are present. A missing cache-read cost does not disqualify it.
    pub(crate) fn is_complete(&self) -> bool {
        self.input_cost_per_token.is_some() && self.output_cost_per_token.is_some()
    }
}

/// Resolved pricing in USD per million tokens. Every field is populated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ModelPricing {
    pub(crate) input: f64,
    pub(crate) cached_input: f64,
    pub(crate) output: f64,
}
