//! Session persistence across page reloads.
//!
//! Snapshots hold the seeded trips, the reveal cursor and the scroll
//! position. Filters are not persisted. A snapshot is only restored on a
//! refresh of the same page within its lifetime; anything else deletes it.

mod codec;
mod form;
mod navigation;
mod snapshot;
mod storage;

pub use codec::{
    Absence, DEFAULT_SNAPSHOT_TTL, SNAPSHOT_KEY, SessionCodec, SessionError, SnapshotLoad,
};
pub use form::{DEFAULT_FORM_TTL, EXCLUDED_FORM_FIELDS, FORM_DEFAULTS_KEY};
pub use navigation::{
    LoadClass, LoadKind, NAVIGATION_MARKER_KEY, NavigationPhase, NavigationTracker, PageEvent,
    UnloadKind, classify_load, take_marker,
};
pub use snapshot::{SearchParams, SessionSnapshot};
pub use storage::{FileStorage, MemoryStorage, SnapshotStorage, StorageError};
