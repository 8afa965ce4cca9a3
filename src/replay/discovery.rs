use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::REPLAY_EXTENSION;

/// Lists replay files directly inside `dir`, sorted by file name.
pub fn discover_replays(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut replays = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_replay = path
            .extension()
            .is_some_and(|ext| ext == REPLAY_EXTENSION);
        if is_replay && entry.file_type()?.is_file() {
            replays.push(path);
        }
    }
    replays.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(replays)
}
