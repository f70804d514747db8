//! Filesystem access to vault files by vault-relative path.

use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::walker::{VaultWalker, VaultWalkerError, WalkedFile};

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("file already exists: {0}")]
    AlreadyExists(String),

    #[error("path escapes the vault: {0}")]
    OutsideVault(String),

    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Walker(#[from] VaultWalkerError),
}

/// Timestamps and size of a vault file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub size: u64,
}

impl From<&WalkedFile> for FileStat {
    fn from(file: &WalkedFile) -> Self {
        Self { created: file.created.into(), modified: file.modified.into(), size: file.size }
    }
}

/// A vault rooted at a directory. All paths are vault-relative with `/`.
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
    excluded_folders: Vec<PathBuf>,
}

impl Vault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), excluded_folders: Vec::new() }
    }

    pub fn with_exclusions(mut self, excluded_folders: Vec<PathBuf>) -> Self {
        self.excluded_folders = excluded_folders;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn walker(&self) -> Result<VaultWalker, VaultError> {
        Ok(VaultWalker::with_exclusions(&self.root, self.excluded_folders.clone())?)
    }

    /// Resolve a vault path to an absolute path, rejecting `..` escapes.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, VaultError> {
        let rel = Path::new(path.trim_start_matches('/'));
        if rel.components().any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(VaultError::OutsideVault(path.to_string()));
        }
        Ok(self.root.join(rel))
    }

    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.is_file())
    }

    pub fn stat(&self, path: &str) -> Option<FileStat> {
        let meta = self.resolve(path).ok()?.metadata().ok()?;
        if !meta.is_file() {
            return None;
        }
        let modified = meta.modified().ok()?;
        Some(FileStat {
            created: meta.created().unwrap_or(modified).into(),
            modified: modified.into(),
            size: meta.len(),
        })
    }

    pub fn read_text(&self, path: &str) -> Result<String, VaultError> {
        let abs = self.resolve(path)?;
        if !abs.is_file() {
            return Err(VaultError::NotFound(path.to_string()));
        }
        fs::read_to_string(&abs).map_err(|e| io_err(path, e))
    }

    /// Overwrite (or create) a text file.
    pub fn write_text(&self, path: &str, content: &str) -> Result<(), VaultError> {
        let abs = self.resolve(path)?;
        ensure_parent(&abs, path)?;
        fs::write(&abs, content).map_err(|e| io_err(path, e))
    }

    /// Create a new text file, failing if it exists.
    pub fn create_text(&self, path: &str, content: &str) -> Result<(), VaultError> {
        if self.exists(path) {
            return Err(VaultError::AlreadyExists(path.to_string()));
        }
        self.write_text(path, content)
    }

    pub fn rename(&self, from: &str, to: &str) -> Result<(), VaultError> {
        let src = self.resolve(from)?;
        let dst = self.resolve(to)?;
        if !src.is_file() {
            return Err(VaultError::NotFound(from.to_string()));
        }
        if dst.exists() {
            return Err(VaultError::AlreadyExists(to.to_string()));
        }
        ensure_parent(&dst, to)?;
        fs::rename(&src, &dst).map_err(|e| io_err(from, e))
    }

    pub fn copy(&self, from: &str, to: &str) -> Result<(), VaultError> {
        let src = self.resolve(from)?;
        let dst = self.resolve(to)?;
        if !src.is_file() {
            return Err(VaultError::NotFound(from.to_string()));
        }
        if dst.exists() {
            return Err(VaultError::AlreadyExists(to.to_string()));
        }
        ensure_parent(&dst, to)?;
        fs::copy(&src, &dst).map(|_| ()).map_err(|e| io_err(from, e))
    }

    pub fn delete(&self, path: &str) -> Result<(), VaultError> {
        let abs = self.resolve(path)?;
        if !abs.is_file() {
            return Err(VaultError::NotFound(path.to_string()));
        }
        fs::remove_file(&abs).map_err(|e| io_err(path, e))
    }

    /// Pick a free path for `stem` + `ext` in `folder`, appending ` 1`, ` 2`, ...
    pub fn available_path(&self, folder: &str, stem: &str, ext: &str) -> String {
        let folder = folder.trim_matches('/');
        let join = |name: String| {
            if folder.is_empty() { name } else { format!("{folder}/{name}") }
        };
        let mut candidate = join(format!("{stem}.{ext}"));
        let mut n = 1;
        while self.exists(&candidate) {
            candidate = join(format!("{stem} {n}.{ext}"));
            n += 1;
        }
        candidate
    }
}

fn ensure_parent(abs: &Path, path: &str) -> Result<(), VaultError> {
    if let Some(parent) = abs.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(path, e))?;
    }
    Ok(())
}

fn io_err(path: &str, source: std::io::Error) -> VaultError {
    VaultError::Io { path: path.to_string(), source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rejects_parent_escapes() {
        let dir = TempDir::new().unwrap();
        let vault = Vault::new(dir.path());
        assert!(matches!(vault.resolve("../etc/passwd"), Err(VaultError::OutsideVault(_))));
        assert!(vault.resolve("/a/b.png").is_ok());
    }

    #[test]
    fn rename_creates_parent_and_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let vault = Vault::new(dir.path());
        vault.write_text("a.md", "a").unwrap();
        vault.write_text("b.md", "b").unwrap();

        assert!(matches!(vault.rename("a.md", "b.md"), Err(VaultError::AlreadyExists(_))));
        vault.rename("a.md", "sub/dir/a.md").unwrap();
        assert!(!vault.exists("a.md"));
        assert_eq!(vault.read_text("sub/dir/a.md").unwrap(), "a");
    }

    #[test]
    fn available_path_appends_counter() {
        let dir = TempDir::new().unwrap();
        let vault = Vault::new(dir.path());
        assert_eq!(vault.available_path("meta", "cat", "md"), "meta/cat.md");
        vault.write_text("meta/cat.md", "").unwrap();
        assert_eq!(vault.available_path("meta/", "cat", "md"), "meta/cat 1.md");
    }

    #[test]
    fn stat_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let vault = Vault::new(dir.path());
        assert!(vault.stat("nope.png").is_none());
        vault.write_text("x.png", "1234").unwrap();
        assert_eq!(vault.stat("x.png").unwrap().size, 4);
    }
}
