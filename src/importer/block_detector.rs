// ==========================================
// Tupacery Reports - Block Detector
// ==========================================
// Splits a wide sheet into side-by-side blocks, one per line.
// Strategy 1: every "data" header starts a block.
// Strategy 2: fixed column ranges of the legacy layout.
// ==========================================
// Known fragility: the fixed ranges are only right for the
// legacy RESUMO GR layout. Callers must surface `used_fallback()`.
// ==========================================

use crate::importer::text_normalizer::normalize_text;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Inclusive column range of one block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpan {
    pub start: usize,
    pub end: usize,
}

impl BlockSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> usize {
        self.end + 1 - self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionPath {
    DateMarkers,
    FixedFallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDetection {
    pub spans: Vec<BlockSpan>,
    pub path: DetectionPath,
}

impl BlockDetection {
    pub fn used_fallback(&self) -> bool {
        self.path == DetectionPath::FixedFallback
    }
}

// ==========================================
// BlockLocator trait
// ==========================================
pub trait BlockLocator: Send + Sync {
    /// Returns None when the strategy cannot place the blocks
    fn locate(&self, marker_labels: &[Option<String>]) -> Option<Vec<BlockSpan>>;
}

// ==========================================
// DateMarkerLocator
// ==========================================
pub struct DateMarkerLocator {
    min_blocks: usize,
}

impl DateMarkerLocator {
    pub fn new(min_blocks: usize) -> Self {
        Self { min_blocks }
    }
}

impl BlockLocator for DateMarkerLocator {
    fn locate(&self, marker_labels: &[Option<String>]) -> Option<Vec<BlockSpan>> {
        let starts: Vec<usize> = marker_labels
            .iter()
            .enumerate()
            .filter(|(_, label)| {
                label
                    .as_deref()
                    .map(|l| normalize_text(l).contains("data"))
                    .unwrap_or(false)
            })
            .map(|(idx, _)| idx)
            .collect();

        if starts.len() < self.min_blocks.max(1) {
            return None;
        }

        let last_col = marker_labels.len() - 1;
        let spans = starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = starts.get(i + 1).map(|next| next - 1).unwrap_or(last_col);
                BlockSpan::new(start, end)
            })
            .collect();
        Some(spans)
    }
}

// ==========================================
// FixedLocator
// ==========================================
pub struct FixedLocator {
    spans: Vec<BlockSpan>,
}

impl FixedLocator {
    pub fn new(spans: Vec<BlockSpan>) -> Self {
        Self { spans }
    }
}

impl BlockLocator for FixedLocator {
    fn locate(&self, _marker_labels: &[Option<String>]) -> Option<Vec<BlockSpan>> {
        Some(self.spans.clone())
    }
}

// ==========================================
// BlockDetector - detection first, fixed ranges on failure
// ==========================================
pub struct BlockDetector {
    primary: Box<dyn BlockLocator>,
    fallback: Box<dyn BlockLocator>,
}

impl BlockDetector {
    pub fn new(primary: Box<dyn BlockLocator>, fallback: Box<dyn BlockLocator>) -> Self {
        Self { primary, fallback }
    }

    /// Date-marker detection needing `min_blocks`, legacy ranges otherwise
    pub fn with_fallback(min_blocks: usize, fallback_spans: Vec<BlockSpan>) -> Self {
        Self::new(
            Box::new(DateMarkerLocator::new(min_blocks)),
            Box::new(FixedLocator::new(fallback_spans)),
        )
    }

    pub fn detect(&self, marker_labels: &[Option<String>]) -> BlockDetection {
        if let Some(spans) = self.primary.locate(marker_labels) {
            debug!(blocks = spans.len(), "blocks located from date markers");
            return BlockDetection {
                spans,
                path: DetectionPath::DateMarkers,
            };
        }

        let spans = self.fallback.locate(marker_labels).unwrap_or_default();
        warn!(
            blocks = spans.len(),
            "date markers not found, using fixed legacy block positions"
        );
        BlockDetection {
            spans,
            path: DetectionPath::FixedFallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> Vec<Option<String>> {
        raw.iter()
            .map(|s| if s.is_empty() { None } else { Some(s.to_string()) })
            .collect()
    }

    #[test]
    fn test_markers_split_blocks() {
        let header = labels(&["DATA", "Fe", "SiO2", "", "Data", "Fe", "Ton"]);
        let spans = DateMarkerLocator::new(2).locate(&header).unwrap();
        assert_eq!(spans, vec![BlockSpan::new(0, 3), BlockSpan::new(4, 6)]);
        assert_eq!(spans[0].width(), 4);
    }

    #[test]
    fn test_single_marker_is_a_failure() {
        let header = labels(&["Data", "Fe", "SiO2"]);
        assert!(DateMarkerLocator::new(2).locate(&header).is_none());
    }

    #[test]
    fn test_detector_falls_back_and_reports_it() {
        let detector = BlockDetector::with_fallback(
            2,
            vec![BlockSpan::new(260, 267), BlockSpan::new(709, 716)],
        );

        let detected = detector.detect(&labels(&["Data", "Fe", "Data", "Fe"]));
        assert!(!detected.used_fallback());
        assert_eq!(detected.spans.len(), 2);

        let fallback = detector.detect(&labels(&["Fe", "SiO2"]));
        assert!(fallback.used_fallback());
        assert_eq!(fallback.path, DetectionPath::FixedFallback);
        assert_eq!(fallback.spans[1], BlockSpan::new(709, 716));
    }
}
