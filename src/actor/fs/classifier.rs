use std::path::Path;

use notify::EventKind;
use notify::event::{ModifyKind, RenameMode};

use super::types::PathChange;

/// Classifies raw notify events for one watched file.
///
/// Pipeline: match_target → kind_of → correct_by_existence
pub(super) struct EventClassifier;

impl EventClassifier {
    pub(super) fn classify(event: &notify::Event, target: &Path) -> Option<PathChange> {
        let position = event.paths.iter().position(|p| Self::is_target(p, target))?;
        let change = Self::kind_of(event.kind, position, event.paths.len())?;
        Some(Self::correct_by_existence(change, target))
    }

    /// The parent directory is watched, so sibling files show up too.
    fn is_target(path: &Path, target: &Path) -> bool {
        path == target || (path.file_name() == target.file_name() && path.parent() == target.parent())
    }

    /// Map a notify kind to a change of the target.
    ///
    /// - create, data/any modify, rename onto the path → Changed
    /// - remove, rename away → Vanished
    /// - metadata-only and access events are noise
    fn kind_of(kind: EventKind, position: usize, path_count: usize) -> Option<PathChange> {
        match kind {
            EventKind::Create(_) => Some(PathChange::Changed),
            EventKind::Remove(_) => Some(PathChange::Vanished),
            EventKind::Modify(ModifyKind::Metadata(_)) => None,
            EventKind::Modify(ModifyKind::Name(mode)) => match mode {
                RenameMode::To => Some(PathChange::Changed),
                RenameMode::From => Some(PathChange::Vanished),
                // paths = [from, to]
                RenameMode::Both if path_count >= 2 => Some(if position == path_count - 1 {
                    PathChange::Changed
                } else {
                    PathChange::Vanished
                }),
                // Direction unknown, settled by existence below
                _ => Some(PathChange::Changed),
            },
            EventKind::Modify(_) => Some(PathChange::Changed),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
        }
    }

    /// Reconcile the event with the filesystem.
    ///
    /// Atomic saves can deliver a remove for a file that already exists
    /// again, and a late modify for a file that is gone.
    fn correct_by_existence(change: PathChange, target: &Path) -> PathChange {
        let exists = target.is_file();
        match change {
            PathChange::Vanished if exists => {
                crate::debug!("watch"; "downgrade vanished->changed: {}", target.display());
                PathChange::Changed
            }
            PathChange::Changed if !exists => {
                crate::debug!("watch"; "upgrade changed->vanished: {}", target.display());
                PathChange::Vanished
            }
            _ => change,
        }
    }
}
