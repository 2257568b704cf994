//! Lineage Core — word arena, families, and deterministic topological sort

pub mod config;
pub mod error;
pub mod events;
pub mod family;
pub mod lexicon;
pub mod model;
pub mod snapshot;
pub mod sort;


#[cfg(test)]
pub mod test_utils;

pub use config::LineageConfig;
pub use error::{LineageError, LineageResult};
pub use events::{
    DEFAULT_EVENT_CAPACITY, EventChannel, FamilyChange, FamilyEvent, FamilyReceiver,
    MAX_EVENT_CAPACITY,
};
pub use family::Family;
pub use lexicon::Lexicon;
pub use model::{Lineage, Link, Word, WordId};
pub use snapshot::{
    SNAPSHOT_FILE, SNAPSHOT_VERSION, STORAGE_DIR, Snapshot, clear, clear_snapshot, snapshot_path,
    storage_dir,
};
pub use sort::topological_sort;
