use crate::cost::TokenUsage;
use crate::pricing::ModelPricing;

fn pricing_value(model: &str, pricing: &ModelPricing) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "input_cost_per_mtoken": pricing.input,
        "cached_input_cost_per_mtoken": pricing.cached_input,
        "output_cost_per_mtoken": pricing.output,
    })
}

/// One object per resolved model, in request order.
pub(crate) fn output_pricing_json(rows: &[(String, ModelPricing)]) {
    let output: Vec<serde_json::Value> = rows
        .iter()
        .map(|(model, pricing)| pricing_value(model, pricing))
        .collect();
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

pub(crate) fn output_cost_json(
    model: &str,
    usage: &TokenUsage,
    pricing: &ModelPricing,
    cost: f64,
) {
    let output = serde_json::json!({
        "model": model,
        "input_tokens": usage.input_tokens,
        "cached_input_tokens": usage.cached_input_tokens,
        "output_tokens": usage.output_tokens,
        "pricing": pricing_value(model, pricing),
        "cost": cost,
    });
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}
