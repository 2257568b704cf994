//! JSON snapshots of a lexicon and its families

use crate::error::{LineageError, LineageResult};
use crate::family::Family;
use crate::lexicon::Lexicon;
use crate::model::WordId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Storage directory: .lineage/
pub const STORAGE_DIR: &str = ".lineage";

/// Snapshot file inside the storage directory
pub const SNAPSHOT_FILE: &str = "snapshot.json";

/// Newest snapshot format this build reads and writes
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub id: WordId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageRecord {
    pub parent: WordId,
    pub child: WordId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyRecord {
    pub name: String,
    pub order: Vec<WordId>,
}

/// Everything needed to rebuild a lexicon and its families.
///
/// Edges are stored oldest first so that restoring them in sequence keeps
/// sort tie-breaks identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    /// RFC 3339 timestamp of the capture.
    pub saved_at: String,
    pub words: Vec<WordRecord>,
    pub lineage: Vec<LineageRecord>,
    pub families: Vec<FamilyRecord>,
}

impl Snapshot {
    pub fn capture<'a>(lexicon: &Lexicon, families: impl IntoIterator<Item = &'a Family>) -> Self {
        let words = lexicon
            .words()
            .map(|w| WordRecord {
                id: w.id,
                label: w.label.clone(),
            })
            .collect();
        let lineage = lexicon
            .lineage()
            .into_iter()
            .map(|l| LineageRecord {
                parent: l.parent,
                child: l.child,
            })
            .collect();
        let families = families
            .into_iter()
            .map(|family| FamilyRecord {
                name: family.name().to_string(),
                // Members discarded from the lexicon have nothing left to restore.
                order: family
                    .order()
                    .iter()
                    .copied()
                    .filter(|&word| lexicon.contains(word))
                    .collect(),
            })
            .collect();

        Snapshot {
            version: SNAPSHOT_VERSION,
            saved_at: chrono::Utc::now().to_rfc3339(),
            words,
            lineage,
            families,
        }
    }

    /// Rebuild the lexicon and families. Ids are reissued densely, so they
    /// generally differ from the ids recorded in the snapshot.
    pub fn restore(&self, event_capacity: usize) -> LineageResult<(Lexicon, Vec<Family>)> {
        if self.version > SNAPSHOT_VERSION {
            return Err(LineageError::snapshot(format!(
                "version {} is newer than supported version {}",
                self.version, SNAPSHOT_VERSION
            )));
        }

        let mut lexicon = Lexicon::new();
        let mut remap: HashMap<WordId, WordId> = HashMap::with_capacity(self.words.len());
        for record in &self.words {
            let id = lexicon.insert(record.label.clone());
            if remap.insert(record.id, id).is_some() {
                return Err(LineageError::snapshot(format!(
                    "word {} appears more than once",
                    record.id
                )));
            }
        }

        let lookup = |word: WordId| {
            remap
                .get(&word)
                .copied()
                .ok_or_else(|| LineageError::snapshot(format!("reference to unknown word {word}")))
        };

        for record in &self.lineage {
            let parent = lookup(record.parent)?;
            let child = lookup(record.child)?;
            lexicon.connect(parent, child)?;
        }

        let mut families = Vec::with_capacity(self.families.len());
        for record in &self.families {
            let order = record
                .order
                .iter()
                .map(|&word| lookup(word))
                .collect::<LineageResult<Vec<_>>>()?;
            families.push(Family::from_order(record.name.clone(), order, event_capacity));
        }

        tracing::debug!(
            words = lexicon.len(),
            edges = lexicon.edge_count(),
            families = families.len(),
            "snapshot restored"
        );
        Ok((lexicon, families))
    }

    /// Write the snapshot as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> LineageResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json_str = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json_str)?;

        tracing::debug!("Snapshot saved: {}", path.display());
        Ok(())
    }

    /// Read a snapshot; `None` if the file does not exist.
    pub fn load(path: &Path) -> LineageResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let json_str = std::fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&json_str)?;

        tracing::debug!("Snapshot loaded from: {}", path.display());
        Ok(Some(snapshot))
    }
}

/// Get storage directory path
pub fn storage_dir(root: &Path) -> PathBuf {
    root.join(STORAGE_DIR)
}

/// Get default snapshot file path
pub fn snapshot_path(root: &Path) -> PathBuf {
    root.join(STORAGE_DIR).join(SNAPSHOT_FILE)
}

/// Remove the default snapshot under `root`
pub fn clear(root: &Path) -> LineageResult<()> {
    clear_snapshot(root, &snapshot_path(root))
}

/// Remove a snapshot file, then its directory if that is left empty.
/// The root itself and any other files are never touched.
pub fn clear_snapshot(root: &Path, path: &Path) -> LineageResult<()> {
    if path.is_file() {
        std::fs::remove_file(path)?;
    }
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    if !dir.is_dir() || same_dir(dir, root) {
        return Ok(());
    }
    if std::fs::read_dir(dir)?.next().is_none() {
        std::fs::remove_dir(dir)?;
    }
    Ok(())
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
