/// What happened to the watched document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PathChange {
    /// Content was written (modify, create, rename onto the path)
    Changed,
    /// Path was removed or renamed away
    Vanished,
}

impl PathChange {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Changed => "changed",
            Self::Vanished => "vanished",
        }
    }
}
