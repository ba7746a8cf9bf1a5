//! Asset storage module
//!
//! One read-only, open-by-name capability with two backings: a snapshot of
//! the `public/` tree embedded at compile time, and a live directory for
//! development.

use rust_embed::RustEmbed;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Embedded snapshot of the `public/` asset tree
#[derive(RustEmbed)]
#[folder = "public/"]
struct PublicSnapshot;

/// Read-only asset storage selected at startup
pub enum AssetStore {
    /// Compile-time snapshot of the public tree
    Embedded,
    /// Live reads rooted at a directory
    Dir(PathBuf),
}

impl AssetStore {
    pub const fn embedded() -> Self {
        Self::Embedded
    }

    pub fn dir(root: impl AsRef<Path>) -> Self {
        Self::Dir(root.as_ref().to_path_buf())
    }

    /// Read the full contents of the named asset
    ///
    /// Missing entries and directories report `NotFound`; other I/O errors
    /// pass through unchanged.
    pub fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        match self {
            Self::Embedded => PublicSnapshot::get(name)
                .map(|file| file.data.into_owned())
                .ok_or_else(|| not_found(name)),
            Self::Dir(root) => {
                let path = resolve_under(root, name)?;
                let meta = std::fs::metadata(&path)?;
                if meta.is_dir() {
                    return Err(not_found(name));
                }
                std::fs::read(path)
            }
        }
    }

    /// Check whether a non-directory entry exists at the name
    ///
    /// "Not found" and "is a directory" both report false; any other I/O
    /// error is a hard failure for the caller to propagate.
    pub fn exists(&self, name: &str) -> io::Result<bool> {
        match self {
            Self::Embedded => Ok(PublicSnapshot::get(name).is_some()),
            Self::Dir(root) => {
                let Ok(path) = resolve_under(root, name) else {
                    return Ok(false);
                };
                match std::fs::metadata(&path) {
                    Ok(meta) => Ok(meta.is_file()),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
                    Err(e) => Err(e),
                }
            }
        }
    }
}

/// Join a store name onto the root, rejecting anything that could escape it
fn resolve_under(root: &Path, name: &str) -> io::Result<PathBuf> {
    let relative = Path::new(name);
    let escapes = name.is_empty()
        || relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
    if escapes {
        return Err(not_found(name));
    }
    Ok(root.join(relative))
}

fn not_found(name: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("no asset at {name:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_embedded_read_known_asset() {
        let store = AssetStore::embedded();
        let data = store.read("dist/main.css").unwrap();
        assert!(!data.is_empty());
    }

    #[test]
    fn test_embedded_missing_is_not_found() {
        let store = AssetStore::embedded();
        let err = store.read("dist/absent.css").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!store.exists("dist/absent.css").unwrap());
    }

    #[test]
    fn test_dir_read_and_exists() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("dist")).unwrap();
        fs::write(root.path().join("dist/app.css"), b"body{}").unwrap();

        let store = AssetStore::dir(root.path());
        assert_eq!(store.read("dist/app.css").unwrap(), b"body{}");
        assert!(store.exists("dist/app.css").unwrap());
        assert!(!store.exists("dist/missing.css").unwrap());
    }

    #[test]
    fn test_dir_directory_is_not_a_file() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("dist")).unwrap();

        let store = AssetStore::dir(root.path());
        assert!(!store.exists("dist").unwrap());
        assert_eq!(
            store.read("dist").unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_dir_rejects_traversal() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("inside.txt"), b"x").unwrap();

        let store = AssetStore::dir(root.path().join("nested"));
        let err = store.read("../inside.txt").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!store.exists("../inside.txt").unwrap());
    }

    #[test]
    fn test_empty_name_is_not_found() {
        let store = AssetStore::dir(tempfile::tempdir().unwrap().path());
        assert_eq!(store.read("").unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
