//! CLI subcommand definitions

use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Resolve per-million token pricing for one or more models
    Lookup {
        /// Bare model names (e.g. "gpt-5.2-codex")
        #[arg(required = true)]
        models: Vec<String>,
    },
    /// Price a token-usage record for a model
    Cost {
        /// Bare model name
        model: String,

        #[command(flatten)]
        usage: UsageArgs,
    },
    /// Re-fetch the pricing catalog and rewrite the local snapshot
    Refresh,
}

#[derive(Debug, Args)]
pub(crate) struct UsageArgs {
    /// Input tokens, including any cached portion
    #[arg(long, default_value_t = 0)]
    pub(crate) input: u64,

    /// Cached input tokens (subset of --input)
    #[arg(long, default_value_t = 0)]
    pub(crate) cached: u64,

    /// Output tokens
    #[arg(long, default_value_t = 0)]
    pub(crate) output: u64,
}
