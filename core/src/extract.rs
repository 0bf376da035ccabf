//! Marker extraction from raw file text.
//!
//! A single pattern is matched against every line. This is deliberately not
//! a language-aware comment parser: `//` and `#` openers anywhere on a line
//! are enough.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::LineMarker;

/// Comment opener (`//` or `#`), optional whitespace, a `todo`/`todos`/`fixme`
/// keyword (case-insensitive), a separator run of colon/whitespace/hyphen,
/// then the marker text captured to end of line.
static MARKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?://|#)\s*(?:todos?|fixme)[\s:-]+(.+)").expect("marker pattern is valid")
});

/// Extract all markers from `content`, in ascending line order.
///
/// Lines are split on `\n` only; a trailing `\r` ends up in the capture and
/// is removed by the trim. The first match per line wins, and the text is
/// captured greedily to the end of the line.
pub fn extract_markers(content: &str) -> Vec<LineMarker> {
    let mut markers = Vec::new();

    for (idx, line) in content.split('\n').enumerate() {
        if let Some(caps) = MARKER_PATTERN.captures(line)
            && let Some(text) = caps.get(1)
        {
            let trimmed = text.as_str().trim();
            if trimmed.is_empty() {
                continue;
            }
            markers.push(LineMarker {
                line: idx + 1,
                text: trimmed.to_string(),
            });
        }
    }

    markers
}
