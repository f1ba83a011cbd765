//! Destinations for encoded training payloads.

use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{AnnotexError, Result};

/// Accepts a UTF-8 payload and stores it under a destination path.
pub trait PayloadSink {
    fn put(&self, destination: &str, payload: &str) -> Result<()>;
}

/// Writes payloads as files below a root directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `destination` below the root.
    ///
    /// Only plain relative paths are accepted.
    pub fn resolve(&self, destination: &str) -> Result<PathBuf> {
        let relative = Path::new(destination);
        let is_plain = relative.components().count() > 0
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

        if !is_plain {
            return Err(AnnotexError::Config(format!(
                "destination must be a relative path without '..': {}",
                destination
            )));
        }

        Ok(self.root.join(relative))
    }
}

impl PayloadSink for DirectorySink {
    fn put(&self, destination: &str, payload: &str) -> Result<()> {
        let path = self.resolve(destination)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, payload)?;
        debug!("Wrote {} bytes to {}", payload.len(), path.display());
        Ok(())
    }
}

/// Keeps payloads in memory, keyed by destination.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<IndexMap<String, String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload stored at `destination`.
    pub fn get(&self, destination: &str) -> Option<String> {
        self.lock().get(destination).cloned()
    }

    /// All destinations and payloads, in write order.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, IndexMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PayloadSink for MemorySink {
    fn put(&self, destination: &str, payload: &str) -> Result<()> {
        self.lock()
            .insert(destination.to_string(), payload.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_sink_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());

        sink.put("train/doc-1.jsonl", "{}\n").unwrap();

        let written = std::fs::read_to_string(dir.path().join("train/doc-1.jsonl")).unwrap();
        assert_eq!(written, "{}\n");
    }

    #[test]
    fn test_directory_sink_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());

        assert!(sink.put("../outside.jsonl", "{}").is_err());
        assert!(sink.put("/etc/outside.jsonl", "{}").is_err());
        assert!(sink.put("", "{}").is_err());
    }

    #[test]
    fn test_memory_sink_overwrites() {
        let sink = MemorySink::new();
        sink.put("a.jsonl", "one").unwrap();
        sink.put("a.jsonl", "two").unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.get("a.jsonl").as_deref(), Some("two"));
    }
}
