use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::debug;

use crate::error::PricingError;

use super::catalog::RawCatalog;

/// Snapshot location under the user cache directory. The snapshot holds
/// the raw upstream JSON so no catalog field is lost across a round-trip.
pub(super) fn snapshot_path() -> Option<PathBuf> {
    Some(dirs::cache_dir()?.join("tokcost").join("catalog.json"))
}

pub(super) fn load(path: &Path) -> Result<RawCatalog, PricingError> {
    let file = File::open(path).map_err(|source| PricingError::Snapshot {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_reader(file)?)
}

/// Snapshot age derived from the file mtime. `None` when the snapshot is
/// missing or the filesystem cannot answer.
pub(super) fn age(path: &Path) -> Option<Duration> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    SystemTime::now().duration_since(modified).ok()
}

/// Best-effort write; a failed snapshot write never fails the fetch that
/// produced the data.
pub(super) fn store(path: &Path, raw: &RawCatalog) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match File::create(path) {
        Ok(mut file) => {
            if let Err(err) = serde_json::to_writer(&mut file, raw) {
                debug!("failed to write catalog snapshot: {err}");
            }
        }
        Err(err) => debug!("failed to create catalog snapshot: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("catalog.json");

        let mut raw = RawCatalog::new();
        raw.insert(
            "gpt-5".to_string(),
            serde_json::json!({"input_cost_per_token": 1.25e-6}),
        );

        store(&path, &raw);
        let loaded = load(&path).expect("load");
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key("gpt-5"));
        assert!(age(&path).is_some());
    }

    #[test]
    fn load_missing_snapshot_is_typed_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.json");
        let err = load(&path).expect_err("missing file");
        assert!(matches!(err, PricingError::Snapshot { .. }));
        assert!(age(&path).is_none());
    }
}
