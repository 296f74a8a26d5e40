use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::timecode::TimeSpec;

/// One labelled window of the shared reaction video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionSegment {
    pub label: String,
    pub start: TimeSpec,
    pub end: TimeSpec,
    /// UI hint only. Playback never reads it.
    #[serde(default)]
    pub color: Option<String>,
}

impl ExpressionSegment {
    pub fn new(label: &str, start: impl Into<TimeSpec>, end: impl Into<TimeSpec>) -> Self {
        Self {
            label: label.to_string(),
            start: start.into(),
            end: end.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn resolve(&self) -> ResolvedSegment {
        ResolvedSegment {
            label: self.label.clone(),
            start_seconds: self.start.seconds(),
            end_seconds: self.end.seconds(),
            start_text: self.start.to_string(),
            end_text: self.end.to_string(),
        }
    }
}

/// Document shape of an expression as exported from the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRecord {
    pub label: String,
    pub start_time: TimeSpec,
    pub end_time: TimeSpec,
    #[serde(default)]
    pub color: Option<String>,
}

impl From<SegmentRecord> for ExpressionSegment {
    fn from(record: SegmentRecord) -> Self {
        Self {
            label: record.label,
            start: record.start_time,
            end: record.end_time,
            color: record.color,
        }
    }
}

/// A segment with its boundaries already converted to seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSegment {
    pub label: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    /// Original boundary text, kept for status display.
    pub start_text: String,
    pub end_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SegmentLookup {
    Found(ResolvedSegment),
    /// Table is empty: segment data has not arrived yet.
    NotLoaded,
    /// Table is populated but has no entry for the label.
    Missing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SegmentCoverage {
    /// Sum of all segment lengths, in seconds.
    pub total_duration: f64,
    /// Latest end offset referenced by any segment.
    pub max_end: f64,
    pub segment_count: usize,
}

/// Label -> segment. Replaced wholesale whenever the store is queried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentTable {
    segments: BTreeMap<String, ExpressionSegment>,
}

impl SegmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later records with the same label replace earlier ones.
    pub fn from_segments(segments: impl IntoIterator<Item = ExpressionSegment>) -> Self {
        let mut table = Self::new();
        for segment in segments {
            table.segments.insert(segment.label.clone(), segment);
        }
        table
    }

    pub fn from_records(records: impl IntoIterator<Item = SegmentRecord>) -> Self {
        Self::from_segments(records.into_iter().map(ExpressionSegment::from))
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn get(&self, label: &str) -> Option<&ExpressionSegment> {
        self.segments.get(label)
    }

    pub fn lookup(&self, label: &str) -> SegmentLookup {
        if self.segments.is_empty() {
            return SegmentLookup::NotLoaded;
        }
        match self.segments.get(label) {
            Some(segment) => SegmentLookup::Found(segment.resolve()),
            None => SegmentLookup::Missing,
        }
    }

    /// Labels in ascending order, the order the classifier is offered them.
    pub fn labels(&self) -> Vec<String> {
        self.segments.keys().cloned().collect()
    }

    pub fn coverage(&self) -> SegmentCoverage {
        let mut coverage = SegmentCoverage {
            segment_count: self.segments.len(),
            ..Default::default()
        };
        for segment in self.segments.values() {
            let start = segment.start.seconds();
            let end = segment.end.seconds();
            coverage.total_duration += end - start;
            if end > coverage.max_end {
                coverage.max_end = end;
            }
        }
        coverage
    }
}

/// The stock expression layout for a freshly recorded reaction video.
pub fn default_expressions() -> Vec<ExpressionSegment> {
    vec![
        ExpressionSegment::new("Funny", "00:00", "00:12").with_color("#FF6B6B"),
        ExpressionSegment::new("Interested", "00:13", "00:28").with_color("#4ECDC4"),
        ExpressionSegment::new("Agree", "00:30", "00:37").with_color("#95E1D3"),
        ExpressionSegment::new("Disagree", "00:40", "00:48").with_color("#F38181"),
        ExpressionSegment::new("Neutral", "00:50", "00:55").with_color("#999999"),
        ExpressionSegment::new("Confused", "01:00", "01:08").with_color("#FFD93D"),
        ExpressionSegment::new("Bored", "01:10", "01:20").with_color("#6C757D"),
    ]
}
