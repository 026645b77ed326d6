use std::path::PathBuf;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

/// Keeps the document's parent directory attached to the watcher.
///
/// The directory is watched instead of the file so that delete + recreate
/// of the file stays visible. If the directory itself disappears the watch
/// is lost and re-attached once it exists again.
pub(super) struct WatchRoot {
    dir: PathBuf,
    attached: bool,
}

impl WatchRoot {
    pub(super) fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            attached: false,
        }
    }

    pub(super) fn attach(&mut self, watcher: &mut RecommendedWatcher) -> notify::Result<()> {
        watcher.watch(&self.dir, RecursiveMode::NonRecursive)?;
        self.attached = true;
        Ok(())
    }

    pub(super) fn maintain(&mut self, watcher: &mut RecommendedWatcher) {
        if !self.dir.exists() {
            if self.attached {
                crate::debug!("watch"; "lost watch: {}", self.dir.display());
            }
            self.attached = false;
            return;
        }
        if self.attached {
            return;
        }

        if self.attach(watcher).is_ok() {
            crate::debug!("watch"; "re-attached watch: {}", self.dir.display());
        }
    }
}
