use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ttrm_stats::{BatchOrchestrator, FsCacheStore, ResultCache};

static WORKSPACE_COUNTER: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// Scratch replay and cache directories, removed on drop.
pub struct TestWorkspace {
    pub root: PathBuf,
    pub replay_dir: PathBuf,
    pub cache_dir: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    pub fn new(label: &str) -> Self {
        let root = std::env::temp_dir().join(format!(
            "ttrm_stats_{label}_{}_{}",
            std::process::id(),
            WORKSPACE_COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        let _ = fs::remove_dir_all(&root);
        let replay_dir = root.join("replays");
        let cache_dir = root.join("cache");
        fs::create_dir_all(&replay_dir).unwrap();

        Self {
            root,
            replay_dir,
            cache_dir,
        }
    }

    pub fn write_replay(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.replay_dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn write_nested_replay(&self, folder: &str, name: &str, contents: &str) -> PathBuf {
        let dir = self.replay_dir.join(folder);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    /// File names currently in the cache directory, sorted.
    pub fn cache_listing(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.cache_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn cache_file(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{name}.cache"))
    }

    pub fn read_cache_json(&self, name: &str) -> serde_json::Value {
        let bytes = fs::read(self.cache_file(name)).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    pub fn cache(&self) -> Arc<ResultCache> {
        Arc::new(ResultCache::new(Arc::new(FsCacheStore::new(
            &self.cache_dir,
        ))))
    }

    pub fn orchestrator(&self, batch_size: usize) -> BatchOrchestrator {
        BatchOrchestrator::builder(self.cache())
            .batch_size(batch_size)
            .workers(2)
            .build()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.replay_dir.join(name)
    }

    pub fn exists(path: &Path) -> bool {
        path.exists()
    }
}

impl Drop for TestWorkspace {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}
