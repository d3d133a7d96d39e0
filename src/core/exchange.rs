//! Portable JSON backup export and import.
//!
//! Exports carry a format version and an ISO-8601 timestamp next to both
//! collections. Import performs structural validation only: `tracks` and
//! `nodes` must be present and be arrays. On any failure the caller's
//! state is left untouched.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::model::{LifeNode, Track, renumber_orders};

/// Format version written to and accepted from backup files.
pub const EXPORT_VERSION: u32 = 1;

/// The exported document shape.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    version: u32,
    exported_at: String,
    tracks: &'a [Track],
    nodes: &'a [LifeNode],
}

/// Errors raised while importing a backup.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("not a valid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing `{0}` array")]
    MissingField(&'static str),

    #[error("`{0}` is not an array")]
    NotAnArray(&'static str),
}

/// Collections recovered from a backup, ready to replace the journal
/// wholesale after user confirmation.
#[derive(Debug)]
pub struct Imported {
    pub tracks: Vec<Track>,
    pub nodes: Vec<LifeNode>,
}

/// Serialize a backup document.
pub fn export_json(
    tracks: &[Track],
    nodes: &[LifeNode],
    now: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    let document = ExportDocument {
        version: EXPORT_VERSION,
        exported_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        tracks,
        nodes,
    };
    serde_json::to_string_pretty(&document)
}

/// Suggested filename for a backup written now.
pub fn default_backup_filename(now: DateTime<Utc>) -> String {
    format!("life-quests-backup-{}.json", now.format("%Y-%m-%d"))
}

/// Parse a backup document.
///
/// Validation is structural: both collections must exist and be arrays.
/// Track order values from foreign files may be sparse, so they are
/// renormalized to a dense range on the way in.
pub fn import_json(content: &str) -> Result<Imported, ImportError> {
    let document: Value = serde_json::from_str(content)?;

    let raw_tracks = require_array(&document, "tracks")?;
    let raw_nodes = require_array(&document, "nodes")?;

    let mut tracks: Vec<Track> = serde_json::from_value(raw_tracks.clone())?;
    let nodes: Vec<LifeNode> = serde_json::from_value(raw_nodes.clone())?;

    tracks.sort_by_key(|track| track.order);
    renumber_orders(&mut tracks);

    Ok(Imported { tracks, nodes })
}

fn require_array<'a>(document: &'a Value, field: &'static str) -> Result<&'a Value, ImportError> {
    let value = document
        .get(field)
        .ok_or(ImportError::MissingField(field))?;
    if !value.is_array() {
        return Err(ImportError::NotAnArray(field));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{NodeKind, TrackColor};
    use chrono::TimeZone;

    fn sample_track(id: &str, order: usize) -> Track {
        Track {
            id: id.to_string(),
            name: "Health".to_string(),
            icon: "🏃".to_string(),
            color: TrackColor::Emerald,
            order,
        }
    }

    fn sample_node(id: &str) -> LifeNode {
        LifeNode {
            id: id.to_string(),
            track_id: "t1".to_string(),
            timestamp: 1_700_000_000_000,
            title: "Ran a marathon".to_string(),
            description: None,
            weight: 9,
            kind: NodeKind::Moment,
            linked_node_id: None,
        }
    }

    #[test]
    fn test_export_document_shape() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let tracks = [sample_track("t1", 0)];
        let nodes = [sample_node("n1")];

        let json = export_json(&tracks, &nodes, now).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["exportedAt"], "2025-03-14T09:26:53.000Z");
        assert!(value["tracks"].is_array());
        assert!(value["nodes"].is_array());
        assert_eq!(value["nodes"][0]["type"], "MOMENT");
    }

    #[test]
    fn test_default_backup_filename() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(
            default_backup_filename(now),
            "life-quests-backup-2025-03-14.json"
        );
    }

    #[test]
    fn test_export_import_roundtrip() {
        let now = Utc::now();
        let tracks = [sample_track("t1", 0), sample_track("t2", 1)];
        let nodes = [sample_node("n1")];

        let json = export_json(&tracks, &nodes, now).unwrap();
        let imported = import_json(&json).unwrap();

        assert_eq!(imported.tracks.len(), 2);
        assert_eq!(imported.nodes.len(), 1);
        assert_eq!(imported.nodes[0].title, "Ran a marathon");
    }

    #[test]
    fn test_import_rejects_non_json() {
        assert!(matches!(
            import_json("{ definitely not json"),
            Err(ImportError::Json(_))
        ));
    }

    #[test]
    fn test_import_rejects_missing_collections() {
        assert!(matches!(
            import_json(r#"{"nodes": []}"#),
            Err(ImportError::MissingField("tracks"))
        ));
        assert!(matches!(
            import_json(r#"{"tracks": []}"#),
            Err(ImportError::MissingField("nodes"))
        ));
    }

    #[test]
    fn test_import_rejects_non_array_collection() {
        let content = r#"{"tracks": [], "nodes": "not-an-array"}"#;
        assert!(matches!(
            import_json(content),
            Err(ImportError::NotAnArray("nodes"))
        ));
    }

    #[test]
    fn test_import_renormalizes_sparse_orders() {
        let content = r#"{
            "tracks": [
                {"id": "a", "name": "A", "icon": "🌱", "color": "teal", "order": 7},
                {"id": "b", "name": "B", "icon": "🌿", "color": "rose", "order": 2}
            ],
            "nodes": []
        }"#;

        let imported = import_json(content).unwrap();
        let ids: Vec<&str> = imported.tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(imported.tracks[0].order, 0);
        assert_eq!(imported.tracks[1].order, 1);
    }

    #[test]
    fn test_import_accepts_extra_top_level_fields() {
        let content = r#"{"version": 1, "exportedAt": "2025-01-01T00:00:00Z", "tracks": [], "nodes": []}"#;
        let imported = import_json(content).unwrap();
        assert!(imported.tracks.is_empty());
        assert!(imported.nodes.is_empty());
    }
}
