use super::StorageBackend;
use crate::error::{PanelzError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const EXT: &str = ".json";

/// Filesystem backend: every key is a JSON document in `root`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}{}", key, EXT))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(PanelzError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read_raw(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(PanelzError::Io)?;
        Ok(Some(content))
    }

    fn write_raw(&self, key: &str, content: &str) -> Result<()> {
        self.ensure_dir()?;
        let target = self.key_path(key);

        // Atomic write
        let tmp = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp, content).map_err(PanelzError::Io)?;
        fs::rename(&tmp, &target).map_err(PanelzError::Io)?;
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path).map_err(PanelzError::Io)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(PanelzError::Io)? {
            let path = entry.map_err(PanelzError::Io)?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                if name.starts_with('.') {
                    continue;
                }
                if let Some(key) = name.strip_suffix(EXT) {
                    keys.push(key.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn location(&self, key: &str) -> PathBuf {
        self.key_path(key)
    }
}
