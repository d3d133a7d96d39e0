//! Journal persistence.
//!
//! The whole journal is written to a single JSON file in the user's data
//! directory on every completed change; saves carry overwrite-whole-state
//! semantics, there is no incremental diffing.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{LifeNode, Track};

/// Journal filename inside the application data directory.
const JOURNAL_FILENAME: &str = "journal.json";

/// Application directory name under the platform data directory.
const APP_DIR_NAME: &str = "life-quests";

/// The durable shape of the journal: both collections, nothing transient.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Journal {
    pub tracks: Vec<Track>,
    pub nodes: Vec<LifeNode>,
}

/// Errors raised while loading or saving the journal.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not determine the user data directory")]
    NoDataDir,

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("journal is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The journal file path in the user's data directory.
pub fn journal_path() -> Option<PathBuf> {
    dirs::data_dir().map(|mut path| {
        path.push(APP_DIR_NAME);
        path.push(JOURNAL_FILENAME);
        path
    })
}

/// Load the journal from disk.
///
/// Returns `Ok(None)` when no journal has been saved yet. A present but
/// unreadable or corrupt file is an error; the caller decides whether to
/// continue with an empty journal.
pub fn load() -> Result<Option<Journal>, StoreError> {
    let path = journal_path().ok_or(StoreError::NoDataDir)?;
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
        path: path.clone(),
        source,
    })?;
    let journal = serde_json::from_str(&content)?;
    Ok(Some(journal))
}

/// Save the journal to disk, replacing any previous state.
pub fn save(journal: &Journal) -> Result<(), StoreError> {
    let path = journal_path().ok_or(StoreError::NoDataDir)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let content = serde_json::to_string_pretty(journal)?;
    std::fs::write(&path, content).map_err(|source| StoreError::Io { path, source })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{NodeKind, TrackColor};

    fn sample_journal() -> Journal {
        Journal {
            tracks: vec![Track {
                id: "t1".to_string(),
                name: "Career".to_string(),
                icon: "💻".to_string(),
                color: TrackColor::Blue,
                order: 0,
            }],
            nodes: vec![LifeNode {
                id: "n1".to_string(),
                track_id: "t1".to_string(),
                timestamp: 1_700_000_000_000,
                title: "First day".to_string(),
                description: Some("New office".to_string()),
                weight: 6,
                kind: NodeKind::Milestone,
                linked_node_id: None,
            }],
        }
    }

    #[test]
    fn test_journal_roundtrip() {
        let journal = sample_journal();
        let json = serde_json::to_string_pretty(&journal).unwrap();
        let restored: Journal = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.tracks.len(), 1);
        assert_eq!(restored.tracks[0].color, TrackColor::Blue);
        assert_eq!(restored.nodes.len(), 1);
        assert_eq!(restored.nodes[0].kind, NodeKind::Milestone);
        assert_eq!(restored.nodes[0].description.as_deref(), Some("New office"));
    }

    #[test]
    fn test_empty_journal_is_default() {
        let journal = Journal::default();
        assert!(journal.tracks.is_empty());
        assert!(journal.nodes.is_empty());
    }

    #[test]
    fn test_corrupt_journal_is_an_error() {
        let result: Result<Journal, _> = serde_json::from_str("{ not json }");
        assert!(result.is_err());
    }

    #[test]
    fn test_journal_path_shape() {
        if let Some(path) = journal_path() {
            assert!(path.ends_with("life-quests/journal.json"));
        }
    }
}
