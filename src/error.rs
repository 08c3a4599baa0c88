use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by catalog retrieval and pricing resolution.
///
/// The retrieval kinds (`Fetch`, `Parse`, `Snapshot`, `Offline`) originate
/// in the catalog accessor and pass through the resolver untouched.
/// `NotFound` is the resolver's own terminal failure.
#[derive(Debug, Error)]
pub(crate) enum PricingError {
    #[error("failed to fetch pricing catalog: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("failed to parse pricing catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read catalog file {}: {source}", .path.display())]
    Snapshot {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("offline mode with no usable catalog snapshot")]
    Offline,

    #[error("no pricing found for model \"{model}\"")]
    NotFound { model: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_carries_model_name() {
        let e = PricingError::NotFound {
            model: "gpt-5.3-codex".to_string(),
        };
        assert_eq!(
            e.to_string(),
            r#"no pricing found for model "gpt-5.3-codex""#
        );
    }

    #[test]
    fn offline_display() {
        assert_eq!(
            PricingError::Offline.to_string(),
            "offline mode with no usable catalog snapshot"
        );
    }

    #[test]
    fn snapshot_display_includes_path() {
        let e = PricingError::Snapshot {
            path: PathBuf::from("/tmp/catalog.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(e.to_string().contains("/tmp/catalog.json"));
    }
}
