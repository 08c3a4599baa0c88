use crate::pricing::ModelPricing;

/// Token counts for one usage record. `cached_input_tokens` is the cached
/// subset of `input_tokens`, the way assistant session logs report it.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TokenUsage {
    pub(crate) input_tokens: u64,
    pub(crate) cached_input_tokens: u64,
    pub(crate) output_tokens: u64,
}

/// Price a usage record in USD. Cached input is billed at the cache-read
/// rate, the remaining input at the full rate.
pub(crate) fn calculate_cost(usage: &TokenUsage, pricing: &ModelPricing) -> f64 {
    let fresh_input = usage.input_tokens.saturating_sub(usage.cached_input_tokens);
    (fresh_input as f64 * pricing.input
        + usage.cached_input_tokens as f64 * pricing.cached_input
        + usage.output_tokens as f64 * pricing.output)
        / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const GPT5: ModelPricing = ModelPricing {
        input: 1.25,
        cached_input: 0.125,
        output: 10.0,
    };

    #[test]
    fn calculate_cost_basic() {
        let usage = TokenUsage {
            input_tokens: 1_000_000,
            cached_input_tokens: 0,
            output_tokens: 100_000,
        };

        // 1M * $1.25/M + 100K * $10/M = $1.25 + $1.00 = $2.25
        let cost = calculate_cost(&usage, &GPT5);
        assert!((cost - 2.25).abs() < 1e-9);
    }

    #[test]
    fn cached_input_billed_at_cache_rate() {
        let usage = TokenUsage {
            input_tokens: 1_000_000,
            cached_input_tokens: 800_000,
            output_tokens: 0,
        };

        // 200K fresh * $1.25/M + 800K cached * $0.125/M = $0.25 + $0.10
        let cost = calculate_cost(&usage, &GPT5);
        assert!((cost - 0.35).abs() < 1e-9);
    }

    #[test]
    fn cached_exceeding_input_saturates() {
        // Malformed logs occasionally report more cached than total input.
        let usage = TokenUsage {
            input_tokens: 100,
            cached_input_tokens: 200,
            output_tokens: 0,
        };

        let cost = calculate_cost(&usage, &GPT5);
        assert!((cost - 200.0 * 0.125 / 1e6).abs() < 1e-12);
    }

    #[test]
    fn zero_usage_is_free() {
        assert_eq!(calculate_cost(&TokenUsage::default(), &GPT5), 0.0);
    }
}
