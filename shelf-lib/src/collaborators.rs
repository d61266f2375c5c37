//! Outside services the library talks to through traits: game image storage
//! and the presentation layer's "redraw needed" signal.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use shelf_catalog::GameId;

/// Per-game asset files, keyed by game id.
pub trait AssetStore: Send + Sync {
    /// The asset file for a game, if one exists.
    fn locate(&self, id: GameId) -> Option<PathBuf>;

    /// Move every asset of `old` so it belongs to `new`.
    fn relocate(&self, old: GameId, new: GameId) -> io::Result<()>;

    /// Delete every asset of a game.
    fn remove(&self, id: GameId) -> io::Result<()>;
}

/// Image files named `{id}.{ext}` in one directory.
#[derive(Debug, Clone)]
pub struct ImageDir {
    root: PathBuf,
}

impl ImageDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Files belonging to `id`, sorted by name.
    ///
    /// A missing directory has no files.
    fn files_for(&self, id: GameId) -> io::Result<Vec<(PathBuf, String)>> {
        let prefix = format!("{id}.");
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(suffix) = name.strip_prefix(&prefix) {
                let suffix = format!(".{suffix}");
                files.push((entry.path(), suffix));
            }
        }
        files.sort();
        Ok(files)
    }
}

impl AssetStore for ImageDir {
    fn locate(&self, id: GameId) -> Option<PathBuf> {
        match self.files_for(id) {
            Ok(files) => files.into_iter().next().map(|(path, _)| path),
            Err(e) => {
                log::warn!("Could not list images in {}: {e}", self.root.display());
                None
            }
        }
    }

    fn relocate(&self, old: GameId, new: GameId) -> io::Result<()> {
        let mut first_error = None;
        for (path, suffix) in self.files_for(old)? {
            let target = self.root.join(format!("{new}{suffix}"));
            if let Err(e) = std::fs::rename(&path, &target) {
                log::warn!("Could not move {} to {}: {e}", path.display(), target.display());
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn remove(&self, id: GameId) -> io::Result<()> {
        let mut first_error = None;
        for (path, _) in self.files_for(id)? {
            if let Err(e) = std::fs::remove_file(&path) {
                log::warn!("Could not delete {}: {e}", path.display());
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// An asset store with nothing in it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAssets;

impl AssetStore for NoAssets {
    fn locate(&self, _id: GameId) -> Option<PathBuf> {
        None
    }

    fn relocate(&self, _old: GameId, _new: GameId) -> io::Result<()> {
        Ok(())
    }

    fn remove(&self, _id: GameId) -> io::Result<()> {
        Ok(())
    }
}

/// Told whenever displayed data may be out of date.
pub trait StaleNotifier: Send + Sync {
    fn notify_stale(&self);
}

/// A flag the presentation layer polls once per frame.
#[derive(Debug, Default)]
pub struct StaleFlag {
    stale: AtomicBool,
}

impl StaleFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::Acquire)
    }

    /// Read and clear the flag.
    pub fn take(&self) -> bool {
        self.stale.swap(false, Ordering::AcqRel)
    }
}

impl StaleNotifier for StaleFlag {
    fn notify_stale(&self) {
        self.stale.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &std::path::Path, name: &str) {
        std::fs::write(dir.join(name), b"img").unwrap();
    }

    #[test]
    fn locates_by_id_prefix() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "70.png");
        touch(dir.path(), "7.jpg");
        let images = ImageDir::new(dir.path());
        assert_eq!(images.locate(7), Some(dir.path().join("7.jpg")));
        assert_eq!(images.locate(8), None);
    }

    #[test]
    fn relocate_keeps_every_suffix() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "7.png");
        touch(dir.path(), "7.thumb.webp");
        let images = ImageDir::new(dir.path());

        images.relocate(7, 42).unwrap();

        assert!(dir.path().join("42.png").exists());
        assert!(dir.path().join("42.thumb.webp").exists());
        assert_eq!(images.locate(7), None);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let images = ImageDir::new(dir.path().join("absent"));
        assert_eq!(images.locate(1), None);
        images.relocate(1, 2).unwrap();
        images.remove(1).unwrap();
    }

    #[test]
    fn remove_deletes_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "3.png");
        let images = ImageDir::new(dir.path());
        images.remove(3).unwrap();
        assert!(!dir.path().join("3.png").exists());
    }

    #[test]
    fn stale_flag_take_clears() {
        let flag = StaleFlag::new();
        assert!(!flag.take());
        flag.notify_stale();
        assert!(flag.is_stale());
        assert!(flag.take());
        assert!(!flag.is_stale());
    }
}
