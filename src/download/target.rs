use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;

/// Handle to bytes staged for a save-as. Must be revoked once the save is done.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Where downloaded blobs end up.
pub trait SaveTarget: Send + Sync {
    fn create_object_url(&self, data: Bytes) -> Result<ObjectUrl, std::io::Error>;
    /// Persist the staged blob under `file_name`, returning the final location.
    fn save_as(&self, url: &ObjectUrl, file_name: &str) -> Result<PathBuf, std::io::Error>;
    fn revoke_object_url(&self, url: &ObjectUrl);
}

/// A created object URL; revoked when dropped.
pub struct StagedBlob<'a, T: SaveTarget + ?Sized> {
    target: &'a T,
    url: ObjectUrl,
}

impl<'a, T: SaveTarget + ?Sized> StagedBlob<'a, T> {
    pub fn create(target: &'a T, data: Bytes) -> Result<Self, std::io::Error> {
        let url = target.create_object_url(data)?;
        Ok(Self { target, url })
    }

    pub fn save_as(&self, file_name: &str) -> Result<PathBuf, std::io::Error> {
        self.target.save_as(&self.url, file_name)
    }
}

impl<T: SaveTarget + ?Sized> Drop for StagedBlob<'_, T> {
    fn drop(&mut self) {
        self.target.revoke_object_url(&self.url);
    }
}

/// Reduce a server-supplied name to a bare file name; `download` when nothing usable is left.
pub fn safe_file_name(name: Option<&str>) -> String {
    name.map(str::trim)
        .and_then(|n| Path::new(n).file_name())
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "download".to_string())
}

/// Saves into a local directory. Staged blobs are hidden part-files next to the
/// final location.
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, std::io::Error> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn staged_path(&self, url: &ObjectUrl) -> PathBuf {
        let key = url.as_str().trim_start_matches("blob:");
        self.dir.join(format!(".{key}.part"))
    }

    /// `name`, or `stem (n).ext` for the first n that is free.
    fn free_path(&self, name: &str) -> PathBuf {
        let candidate = self.dir.join(name);
        if !candidate.exists() {
            return candidate;
        }

        let path = Path::new(name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| name.to_string());
        let ext = path.extension().map(|e| e.to_string_lossy().to_string());

        (1..)
            .map(|n| match &ext {
                Some(ext) => self.dir.join(format!("{stem} ({n}).{ext}")),
                None => self.dir.join(format!("{stem} ({n})")),
            })
            .find(|p| !p.exists())
            .unwrap_or(candidate)
    }
}

impl SaveTarget for DirectoryTarget {
    fn create_object_url(&self, data: Bytes) -> Result<ObjectUrl, std::io::Error> {
        let url = ObjectUrl::new(format!("blob:{}", uuid::Uuid::new_v4()));
        std::fs::write(self.staged_path(&url), &data)?;
        Ok(url)
    }

    fn save_as(&self, url: &ObjectUrl, file_name: &str) -> Result<PathBuf, std::io::Error> {
        let dest = self.free_path(&safe_file_name(Some(file_name)));
        std::fs::copy(self.staged_path(url), &dest)?;
        Ok(dest)
    }

    fn revoke_object_url(&self, url: &ObjectUrl) {
        if let Err(e) = std::fs::remove_file(self.staged_path(url)) {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(object_url = %url.as_str(), error = %e, "Failed to release staged blob");
            }
        }
    }
}
