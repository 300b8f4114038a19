//! Media lifecycle: storing uploads, replacing references, deleting orphans.
//!
//! Entities only ever hold paths relative to the upload root
//! (`services/<uuid>.png`), never URLs, so the public base URL can change
//! without touching stored data.
//!
//! Deletion is confined to the upload root: a path is deleted only if it is
//! relative, has no `..`/root components, and its canonical location is
//! inside the canonical root. Deletion never returns an error; outcomes are
//! logged and reported as [`DeleteOutcome`].

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use image::ImageFormat;
use tokio::task::JoinHandle;

use crate::collection::Collection;
use crate::error::CoreError;

/// An uploaded file part, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Multipart field name the file arrived under.
    pub field_name: String,
    /// Client-side file name, informational only.
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// An entity that references stored media.
pub trait MediaOwner {
    /// Every media path the entity references, top-level and nested.
    fn media_paths(&self) -> Vec<&str>;

    /// Owned copy of [`media_paths`](Self::media_paths).
    fn owned_media_paths(&self) -> Vec<String> {
        self.media_paths().into_iter().map(str::to_string).collect()
    }
}

/// Result of a delete attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    /// Nothing at that path; treated as success.
    Missing,
    /// The path escapes the upload root or is not a regular file.
    Rejected,
    /// The filesystem refused; logged.
    Failed,
}

/// Map sniffed image content to the extension used for storage.
///
/// The client's file name and content type are not trusted.
pub fn sniff_image_extension(data: &[u8]) -> Result<&'static str, CoreError> {
    match image::guess_format(data) {
        Ok(ImageFormat::Png) => Ok("png"),
        Ok(ImageFormat::Jpeg) => Ok("jpg"),
        Ok(ImageFormat::WebP) => Ok("webp"),
        Ok(ImageFormat::Gif) => Ok("gif"),
        Ok(other) => Err(CoreError::Validation(format!(
            "Unsupported image format {other:?}. Supported: png, jpeg, webp, gif"
        ))),
        Err(_) => Err(CoreError::Validation(
            "Uploaded file is not a recognised image".into(),
        )),
    }
}

/// Local-disk blob store rooted at the upload directory.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an upload under `<collection>/` and return its relative path.
    pub async fn store(
        &self,
        collection: Collection,
        file: &UploadedFile,
    ) -> Result<String, CoreError> {
        let ext = sniff_image_extension(&file.data)?;
        let relative = format!("{}/{}.{ext}", collection.name(), uuid::Uuid::new_v4());
        let dest = self.root.join(&relative);

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::Storage(format!("Failed to create upload dir: {e}")))?;
        }
        tokio::fs::write(&dest, &file.data)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to write upload: {e}")))?;

        tracing::debug!(
            field = %file.field_name,
            path = %relative,
            bytes = file.data.len(),
            "Stored upload",
        );
        Ok(relative)
    }

    /// Swap a reference: returns `new` as the value to persist and records
    /// `old` for deletion once the document has been written.
    pub fn replace(
        &self,
        changes: &mut MediaChangeSet,
        old: Option<String>,
        new: String,
    ) -> String {
        if let Some(old) = old {
            if old != new {
                changes.orphan(old);
            }
        }
        new
    }

    /// Lexically resolve a stored relative path against the root.
    ///
    /// Returns `None` for empty or absolute paths and for any path containing
    /// `..`, `.`, or root/prefix components.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let path = Path::new(relative);
        if relative.is_empty() || path.is_absolute() {
            return None;
        }
        if !path.components().all(|c| matches!(c, Component::Normal(_))) {
            return None;
        }
        Some(self.root.join(path))
    }

    /// Delete a stored file, confined to the upload root. Never errors.
    pub async fn delete(&self, relative: &str) -> DeleteOutcome {
        let Some(candidate) = self.resolve(relative) else {
            tracing::warn!(path = %relative, "Refusing to delete path outside upload root");
            return DeleteOutcome::Rejected;
        };

        let resolved = match tokio::fs::canonicalize(&candidate).await {
            Ok(p) => p,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %relative, "Media file already gone");
                return DeleteOutcome::Missing;
            }
            Err(e) => {
                tracing::warn!(path = %relative, error = %e, "Failed to resolve media path");
                return DeleteOutcome::Failed;
            }
        };

        let root = match tokio::fs::canonicalize(&self.root).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(root = %self.root.display(), error = %e, "Failed to resolve upload root");
                return DeleteOutcome::Failed;
            }
        };

        if !resolved.starts_with(&root) {
            tracing::warn!(
                path = %relative,
                resolved = %resolved.display(),
                "Media path resolves outside upload root",
            );
            return DeleteOutcome::Rejected;
        }

        match tokio::fs::metadata(&resolved).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                tracing::warn!(path = %relative, "Media path is not a regular file");
                return DeleteOutcome::Rejected;
            }
            Err(e) => {
                tracing::warn!(path = %relative, error = %e, "Failed to stat media file");
                return DeleteOutcome::Failed;
            }
        }

        match tokio::fs::remove_file(&resolved).await {
            Ok(()) => {
                tracing::info!(path = %relative, "Deleted media file");
                DeleteOutcome::Removed
            }
            Err(e) if e.kind() == ErrorKind::NotFound => DeleteOutcome::Missing,
            Err(e) => {
                tracing::warn!(path = %relative, error = %e, "Failed to delete media file");
                DeleteOutcome::Failed
            }
        }
    }

    /// Fire-and-forget deletion of several paths on a background task.
    ///
    /// Returns `None` when there is nothing to delete.
    pub fn delete_detached(&self, paths: Vec<String>) -> Option<JoinHandle<()>> {
        if paths.is_empty() {
            return None;
        }
        let store = self.clone();
        Some(tokio::spawn(async move {
            for path in paths {
                store.delete(&path).await;
            }
        }))
    }
}

/// Files touched by one create/update/delete request.
///
/// `stored` are new files written for the request; `orphaned` are files the
/// request stops referencing. Neither list is acted upon until the request
/// resolves: [`commit`](Self::commit) after the document is persisted,
/// [`discard`](Self::discard) if persisting failed.
#[derive(Debug, Default)]
pub struct MediaChangeSet {
    stored: Vec<String>,
    orphaned: Vec<String>,
}

impl MediaChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_stored(&mut self, path: String) {
        self.stored.push(path);
    }

    pub fn orphan(&mut self, path: String) {
        if !self.orphaned.contains(&path) {
            self.orphaned.push(path);
        }
    }

    /// Orphan every path in `before` that is absent from `after`.
    pub fn retire_unreferenced<'a>(
        &mut self,
        before: impl IntoIterator<Item = &'a str>,
        after: &HashSet<&str>,
    ) {
        for path in before {
            if !after.contains(path) {
                self.orphan(path.to_string());
            }
        }
    }

    pub fn stored(&self) -> &[String] {
        &self.stored
    }

    pub fn orphaned(&self) -> &[String] {
        &self.orphaned
    }

    /// Schedule deletion of orphaned files after a successful write.
    ///
    /// Paths still present in `live` (the references of the persisted
    /// document) are kept.
    pub fn commit(self, store: &MediaStore, live: &HashSet<&str>) -> Option<JoinHandle<()>> {
        let doomed: Vec<String> = self
            .orphaned
            .into_iter()
            .filter(|p| !live.contains(p.as_str()))
            .collect();
        store.delete_detached(doomed)
    }

    /// Remove the files stored for a request whose write failed.
    pub fn discard(self, store: &MediaStore) -> Option<JoinHandle<()>> {
        if !self.stored.is_empty() {
            tracing::warn!(
                count = self.stored.len(),
                "Write failed, removing files stored for this request",
            );
        }
        store.delete_detached(self.stored)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::UploadedFile;

    /// Smallest byte sequence `image::guess_format` recognises as PNG.
    pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    pub fn png_upload(field: &str) -> UploadedFile {
        UploadedFile {
            field_name: field.to_string(),
            file_name: Some("photo.png".into()),
            content_type: Some("image/png".into()),
            data: PNG_BYTES.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::test_support::{png_upload, PNG_BYTES};
    use super::*;

    #[test]
    fn sniffs_known_formats() {
        assert_eq!(sniff_image_extension(PNG_BYTES).unwrap(), "png");
        assert_eq!(sniff_image_extension(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap(), "jpg");
        assert_eq!(sniff_image_extension(b"GIF89a....").unwrap(), "gif");
    }

    #[test]
    fn rejects_non_images() {
        assert_matches!(
            sniff_image_extension(b"hello world"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn resolve_rejects_escaping_paths() {
        let store = MediaStore::new("/srv/uploads");
        assert!(store.resolve("../etc/passwd").is_none());
        assert!(store.resolve("services/../../x").is_none());
        assert!(store.resolve("/etc/passwd").is_none());
        assert!(store.resolve("./services/a.png").is_none());
        assert!(store.resolve("").is_none());
        assert_eq!(
            store.resolve("services/a.png").unwrap(),
            PathBuf::from("/srv/uploads/services/a.png")
        );
    }

    #[tokio::test]
    async fn store_writes_under_collection_dir() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = MediaStore::new(dir.path());

        let path = store
            .store(Collection::Gallery, &png_upload("image"))
            .await
            .expect("store");

        assert!(path.starts_with("gallery/"));
        assert!(path.ends_with(".png"));
        let on_disk = dir.path().join(&path);
        assert_eq!(std::fs::read(on_disk).unwrap(), PNG_BYTES);
    }

    #[tokio::test]
    async fn store_rejects_non_image_without_writing() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = MediaStore::new(dir.path());
        let mut file = png_upload("image");
        file.data = b"not an image".to_vec();

        assert_matches!(
            store.store(Collection::Services, &file).await,
            Err(CoreError::Validation(_))
        );
        assert!(!dir.path().join("services").exists());
    }

    #[tokio::test]
    async fn delete_removes_then_reports_missing() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = MediaStore::new(dir.path());
        let path = store
            .store(Collection::Services, &png_upload("image"))
            .await
            .unwrap();

        assert_eq!(store.delete(&path).await, DeleteOutcome::Removed);
        assert!(!dir.path().join(&path).exists());
        assert_eq!(store.delete(&path).await, DeleteOutcome::Missing);
    }

    #[tokio::test]
    async fn delete_refuses_traversal() {
        let parent = tempfile::tempdir().expect("create temp dir");
        let root = parent.path().join("uploads");
        std::fs::create_dir_all(&root).unwrap();
        let victim = parent.path().join("victim.txt");
        std::fs::write(&victim, b"keep me").unwrap();

        let store = MediaStore::new(&root);
        assert_eq!(store.delete("../victim.txt").await, DeleteOutcome::Rejected);
        assert!(victim.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn delete_refuses_symlink_escape() {
        let parent = tempfile::tempdir().expect("create temp dir");
        let root = parent.path().join("uploads");
        std::fs::create_dir_all(root.join("services")).unwrap();
        let victim = parent.path().join("victim.txt");
        std::fs::write(&victim, b"keep me").unwrap();
        std::os::unix::fs::symlink(&victim, root.join("services/link.png")).unwrap();

        let store = MediaStore::new(&root);
        assert_eq!(
            store.delete("services/link.png").await,
            DeleteOutcome::Rejected
        );
        assert!(victim.exists());
    }

    #[tokio::test]
    async fn delete_refuses_directories() {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(dir.path().join("services")).unwrap();
        let store = MediaStore::new(dir.path());
        assert_eq!(store.delete("services").await, DeleteOutcome::Rejected);
    }

    #[test]
    fn replace_orphans_previous_path() {
        let store = MediaStore::new("/unused");
        let mut changes = MediaChangeSet::new();

        let kept = store.replace(&mut changes, Some("a.png".into()), "b.png".into());
        assert_eq!(kept, "b.png");
        store.replace(&mut changes, None, "c.png".into());
        store.replace(&mut changes, Some("d.png".into()), "d.png".into());

        assert_eq!(changes.orphaned(), ["a.png".to_string()]);
    }

    #[test]
    fn retire_unreferenced_diffs_before_and_after() {
        let mut changes = MediaChangeSet::new();
        let after: HashSet<&str> = ["b.png", "c.png"].into_iter().collect();
        changes.retire_unreferenced(["a.png", "b.png", "a.png"], &after);
        assert_eq!(changes.orphaned(), ["a.png".to_string()]);
    }

    #[tokio::test]
    async fn commit_deletes_only_unreferenced_orphans() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = MediaStore::new(dir.path());
        let old = store.store(Collection::Services, &png_upload("image")).await.unwrap();
        let reused = store.store(Collection::Services, &png_upload("image")).await.unwrap();

        let mut changes = MediaChangeSet::new();
        changes.orphan(old.clone());
        changes.orphan(reused.clone());
        let live: HashSet<&str> = [reused.as_str()].into_iter().collect();

        changes
            .commit(&store, &live)
            .expect("deletion task")
            .await
            .unwrap();

        assert!(!dir.path().join(&old).exists());
        assert!(dir.path().join(&reused).exists());
    }

    #[tokio::test]
    async fn discard_removes_stored_files() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = MediaStore::new(dir.path());
        let fresh = store.store(Collection::Gallery, &png_upload("image")).await.unwrap();

        let mut changes = MediaChangeSet::new();
        changes.record_stored(fresh.clone());
        changes.discard(&store).expect("deletion task").await.unwrap();

        assert!(!dir.path().join(&fresh).exists());
    }

    #[test]
    fn empty_commit_spawns_nothing() {
        let store = MediaStore::new("/unused");
        assert!(MediaChangeSet::new().commit(&store, &HashSet::new()).is_none());
    }
}
