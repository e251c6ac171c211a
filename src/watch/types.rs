use notify::EventKind;
use notify::event::ModifyKind;

/// What happened to the watched file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    /// Moved away or replaced by a rename; the watch must be re-attached.
    Renamed,
    Removed,
}

impl ChangeKind {
    /// Content-relevant kind of a notify event.
    ///
    /// Access events and metadata-only modifications return `None`: reading
    /// the file for every request would otherwise feed back into reloads.
    /// Unclassified events (`Any`, `Other`, rescans) count as modifications.
    pub(super) fn from_event(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::Created),
            EventKind::Remove(_) => Some(Self::Removed),
            EventKind::Modify(ModifyKind::Metadata(_)) => None,
            EventKind::Modify(ModifyKind::Name(_)) => Some(Self::Renamed),
            EventKind::Modify(_) | EventKind::Any | EventKind::Other => Some(Self::Modified),
            EventKind::Access(_) => None,
        }
    }

    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Renamed => "renamed",
            Self::Removed => "removed",
        }
    }

    /// Whether the OS watch on the old file is gone after this event.
    pub(super) fn detaches(self) -> bool {
        matches!(self, Self::Renamed | Self::Removed)
    }
}
