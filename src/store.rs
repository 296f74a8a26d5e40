//! Segment data as exported from the expressions collection.

use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::kernel::segment::{default_expressions, SegmentRecord, SegmentTable};

/// Reads a JSON array of expression documents, ordered by label.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<SegmentRecord>> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let mut records: Vec<SegmentRecord> = serde_json::from_str(&raw)?;
    records.sort_by(|a, b| a.label.cmp(&b.label));
    Ok(records)
}

/// Builds the table from `path`, or the stock layout when no path is configured.
///
/// An empty export yields an empty table: playback then reports
/// "not loaded" rather than inventing segments.
pub fn load_table(path: Option<&Path>) -> Result<SegmentTable> {
    let table = match path {
        Some(path) => {
            let records = load_records(path)?;
            if records.is_empty() {
                warn!("No expressions found in {}", path.display());
            }
            SegmentTable::from_records(records)
        }
        None => SegmentTable::from_segments(default_expressions()),
    };
    info!("Loaded {} expression segments", table.len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MimicError;

    fn scratch_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("mimic-{}-{}", uuid::Uuid::new_v4(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_and_orders_records() {
        let path = scratch_file(
            "segments.json",
            r#"[{"label":"Neutral","startTime":"00:50","endTime":"00:55"},
                {"label":"Bored","startTime":"01:10","endTime":"01:20"}]"#,
        );
        let records = load_records(&path).unwrap();
        assert_eq!(records[0].label, "Bored");
        let table = load_table(Some(&path)).unwrap();
        assert_eq!(table.len(), 2);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn malformed_export_is_an_error() {
        let path = scratch_file("bad.json", "{not json");
        assert!(matches!(load_records(&path), Err(MimicError::Json(_))));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn stock_layout_without_path() {
        let table = load_table(None).unwrap();
        assert_eq!(table.len(), 7);
    }
}
