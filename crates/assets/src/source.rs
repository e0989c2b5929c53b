use crate::AssetError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Resolves a named resource to its raw bytes.
///
/// Decoding is not the source's concern; it only fetches.
pub trait AssetSource: Send + Sync {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, AssetError>;
}

/// Serves assets from a directory on disk.
///
/// Paths are relative to the root; a leading `/` is ignored so web-style
/// paths such as `/textures/door/color.jpg` resolve under the root.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl AssetSource for DirSource {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let full = self.resolve(path);
        std::fs::read(&full).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AssetError::NotFound(full.display().to_string()),
            _ => AssetError::Io {
                path: full.display().to_string(),
                source: e,
            },
        })
    }
}

/// In-memory source, for tests and embedded assets.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    pub fn with(mut self, path: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(path, bytes);
        self
    }
}

impl AssetSource for MemorySource {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_source_strips_leading_slash() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("textures")).unwrap();
        std::fs::write(dir.path().join("textures/a.bin"), [1u8, 2, 3]).unwrap();

        let source = DirSource::new(dir.path());
        assert_eq!(source.fetch("/textures/a.bin").unwrap(), vec![1, 2, 3]);
        assert_eq!(source.fetch("textures/a.bin").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn dir_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirSource::new(dir.path());
        assert!(matches!(
            source.fetch("/nope.jpg"),
            Err(AssetError::NotFound(_))
        ));
    }

    #[test]
    fn memory_source_lookup() {
        let source = MemorySource::new().with("x", vec![9]);
        assert_eq!(source.fetch("x").unwrap(), vec![9]);
        assert!(source.fetch("y").is_err());
    }
}
