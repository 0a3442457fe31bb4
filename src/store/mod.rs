//! # Retention Store
//!
//! Filesystem-backed JSON document store with per-namespace retention.
//! Documents live at `<base>/<namespace>/<key>.json`, pretty-printed and
//! UTF-8 with non-ASCII intact, so snapshots stay greppable and diffable.
//!
//! Single-writer by design: the CLI is a batch process, so there is no
//! locking. Readers of the files themselves (shell tooling, humans) are
//! unaffected by that assumption.

use anyhow::{bail, Context, Result};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Namespace directories created under the base dir.
pub const NAMESPACES: &[&str] = &["daily", "weekly", "monthly", "cache"];

const ENV_DATA_DIR: &str = "TECHPULSE_DATA_DIR";
const DEFAULT_BASE: &str = ".techpulse";

/// Days a document survives per namespace.
fn retention_days(namespace: &str) -> u64 {
    match namespace {
        "daily" => 30,
        "weekly" => 52 * 7,
        "monthly" => 24 * 30,
        "cache" => 7,
        _ => 30,
    }
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "store_evicted_total",
            "Documents removed by retention sweeps."
        );
    });
}

#[derive(Debug, Clone)]
pub struct RetentionStore {
    base: PathBuf,
}

impl RetentionStore {
    /// Open a store at `base`, creating the namespace layout.
    pub fn open<P: AsRef<Path>>(base: P) -> Result<Self> {
        let base = base.as_ref().to_path_buf();
        for ns in NAMESPACES {
            let dir = base.join(ns);
            fs::create_dir_all(&dir)
                .with_context(|| format!("creating store directory {}", dir.display()))?;
        }
        Ok(Self { base })
    }

    /// Base dir from `$TECHPULSE_DATA_DIR`, falling back to `.techpulse`.
    pub fn open_default() -> Result<Self> {
        let base = std::env::var(ENV_DATA_DIR).unwrap_or_else(|_| DEFAULT_BASE.to_string());
        Self::open(base)
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn document_path(&self, namespace: &str, key: &str) -> Result<PathBuf> {
        // Keys are plain file stems; anything that would escape the
        // namespace directory is rejected.
        if key.contains('/') || key.contains('\\') {
            bail!("invalid document key {key:?}: path separators are not allowed");
        }
        Ok(self.base.join(namespace).join(format!("{key}.json")))
    }

    /// Whole-document replace.
    pub fn put<T: Serialize>(&self, namespace: &str, key: &str, doc: &T) -> Result<()> {
        let path = self.document_path(namespace, key)?;
        let json = serde_json::to_string_pretty(doc).context("serializing document")?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// `Ok(None)` for a missing document; unreadable or unparsable ones are
    /// errors rather than silently treated as absent.
    pub fn get<T: DeserializeOwned>(&self, namespace: &str, key: &str) -> Result<Option<T>> {
        let path = self.document_path(namespace, key)?;
        let content = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", path.display()));
            }
        };
        let doc = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(doc))
    }

    /// Sorted document keys (file stems) in a namespace.
    pub fn list_keys(&self, namespace: &str) -> Result<Vec<String>> {
        let dir = self.base.join(namespace);
        let entries =
            fs::read_dir(&dir).with_context(|| format!("listing {}", dir.display()))?;

        let mut keys = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// Remove documents older than their namespace's retention window.
    /// Returns the number of files removed.
    pub fn evict_expired(&self) -> usize {
        self.evict_expired_at(SystemTime::now())
    }

    /// Eviction with an explicit "now", so retention math is testable
    /// without faking file mtimes.
    pub fn evict_expired_at(&self, now: SystemTime) -> usize {
        ensure_metrics_described();

        let mut removed = 0usize;
        for ns in NAMESPACES {
            let window = Duration::from_secs(retention_days(ns) * 24 * 3600);
            let cutoff = now.checked_sub(window).unwrap_or(SystemTime::UNIX_EPOCH);
            removed += self.evict_namespace(ns, cutoff);
        }

        counter!("store_evicted_total").increment(removed as u64);
        removed
    }

    fn evict_namespace(&self, namespace: &str, cutoff: SystemTime) -> usize {
        let dir = self.base.join(namespace);
        let entries = match fs::read_dir(&dir) {
            Ok(e) => e,
            Err(_) => return 0,
        };

        let mut removed = 0usize;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let mtime = entry.metadata().and_then(|m| m.modified());
            let expired = matches!(mtime, Ok(t) if t < cutoff);
            if !expired {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::info!(file = %path.display(), "evicted expired document");
                    removed += 1;
                }
                Err(e) => {
                    // One stuck file must not stop the sweep.
                    tracing::warn!(error = ?e, file = %path.display(), "failed to evict");
                }
            }
        }
        removed
    }

    /// Total bytes under the base dir, all namespaces included.
    pub fn total_size_bytes(&self) -> u64 {
        dir_size(&self.base)
    }
}

fn dir_size(dir: &Path) -> u64 {
    let mut total = 0u64;
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                total += dir_size(&path);
            } else if let Ok(meta) = entry.metadata() {
                total += meta.len();
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: usize,
    }

    fn doc(name: &str) -> Doc {
        Doc {
            name: name.to_string(),
            count: 7,
        }
    }

    #[test]
    fn open_creates_namespace_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = RetentionStore::open(dir.path()).unwrap();
        for ns in NAMESPACES {
            assert!(store.base().join(ns).is_dir());
        }
    }

    #[test]
    fn put_get_round_trip_and_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = RetentionStore::open(dir.path()).unwrap();

        store.put("daily", "2026-08-16", &doc("a")).unwrap();
        let loaded: Option<Doc> = store.get("daily", "2026-08-16").unwrap();
        assert_eq!(loaded, Some(doc("a")));

        let missing: Option<Doc> = store.get("daily", "2026-08-17").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn put_preserves_non_ascii_text() {
        let dir = tempfile::tempdir().unwrap();
        let store = RetentionStore::open(dir.path()).unwrap();
        store.put("daily", "k", &doc("无标题")).unwrap();

        let raw = std::fs::read_to_string(store.base().join("daily/k.json")).unwrap();
        assert!(raw.contains("无标题"));
    }

    #[test]
    fn corrupt_document_is_an_error_not_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = RetentionStore::open(dir.path()).unwrap();
        std::fs::write(store.base().join("daily/bad.json"), "{not json").unwrap();

        let res: Result<Option<Doc>> = store.get("daily", "bad");
        assert!(res.is_err());
    }

    #[test]
    fn keys_with_path_separators_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = RetentionStore::open(dir.path()).unwrap();
        assert!(store.put("daily", "../escape", &doc("x")).is_err());
        assert!(store.get::<Doc>("daily", "a/b").is_err());
    }

    #[test]
    fn list_keys_is_sorted_and_json_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = RetentionStore::open(dir.path()).unwrap();
        store.put("daily", "2026-08-16", &doc("a")).unwrap();
        store.put("daily", "2026-08-14", &doc("b")).unwrap();
        std::fs::write(store.base().join("daily/notes.txt"), "x").unwrap();

        let keys = store.list_keys("daily").unwrap();
        assert_eq!(keys, vec!["2026-08-14".to_string(), "2026-08-16".to_string()]);
    }

    #[test]
    fn eviction_honors_per_namespace_retention() {
        let dir = tempfile::tempdir().unwrap();
        let store = RetentionStore::open(dir.path()).unwrap();
        store.put("daily", "old-daily", &doc("a")).unwrap();
        store.put("weekly", "old-weekly", &doc("b")).unwrap();

        // 40 days in the future: past daily retention (30 d), inside
        // weekly retention (364 d).
        let later = SystemTime::now() + Duration::from_secs(40 * 24 * 3600);
        let removed = store.evict_expired_at(later);

        assert_eq!(removed, 1);
        assert!(store.get::<Doc>("daily", "old-daily").unwrap().is_none());
        assert!(store.get::<Doc>("weekly", "old-weekly").unwrap().is_some());
    }

    #[test]
    fn fresh_documents_survive_eviction() {
        let dir = tempfile::tempdir().unwrap();
        let store = RetentionStore::open(dir.path()).unwrap();
        store.put("daily", "today", &doc("a")).unwrap();

        let removed = store.evict_expired();
        assert_eq!(removed, 0);
        assert!(store.get::<Doc>("daily", "today").unwrap().is_some());
    }

    #[test]
    fn total_size_counts_all_namespaces() {
        let dir = tempfile::tempdir().unwrap();
        let store = RetentionStore::open(dir.path()).unwrap();
        assert_eq!(store.total_size_bytes(), 0);

        store.put("daily", "a", &doc("a")).unwrap();
        store.put("weekly", "b", &doc("b")).unwrap();
        assert!(store.total_size_bytes() > 0);
    }
}
