//! Canonical Section Detection
//!
//! Locates the canonical filing sections (Item 1, Item 1A, Item 7, Item 7A)
//! inside normalized text with tiered regex patterns, slices them into
//! extents with capped boundaries, and discards extents too short to be
//! genuine sections.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{IngestionError, Result};

/// The four canonical section keys, in their load-bearing order.
///
/// Chunk reindexing iterates [`SectionKey::ALL`]; the enum being closed makes
/// that order a compile-time property rather than a runtime convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKey {
    #[serde(rename = "Item 1")]
    Item1,
    #[serde(rename = "Item 1A")]
    Item1A,
    #[serde(rename = "Item 7")]
    Item7,
    #[serde(rename = "Item 7A")]
    Item7A,
}

impl SectionKey {
    /// Canonical enumeration order: Item 1, Item 1A, Item 7, Item 7A.
    pub const ALL: [SectionKey; 4] = [
        SectionKey::Item1,
        SectionKey::Item1A,
        SectionKey::Item7,
        SectionKey::Item7A,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Item1 => "Item 1",
            SectionKey::Item1A => "Item 1A",
            SectionKey::Item7 => "Item 7",
            SectionKey::Item7A => "Item 7A",
        }
    }
}

impl std::fmt::Display for SectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closed map from the canonical section keys to their extracted text.
///
/// Absent or filtered sections hold the empty string. Iteration always
/// yields [`SectionKey::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMap {
    #[serde(rename = "Item 1")]
    item_1: String,
    #[serde(rename = "Item 1A")]
    item_1a: String,
    #[serde(rename = "Item 7")]
    item_7: String,
    #[serde(rename = "Item 7A")]
    item_7a: String,
}

impl SectionMap {
    pub fn get(&self, key: SectionKey) -> &str {
        match key {
            SectionKey::Item1 => &self.item_1,
            SectionKey::Item1A => &self.item_1a,
            SectionKey::Item7 => &self.item_7,
            SectionKey::Item7A => &self.item_7a,
        }
    }

    fn set(&mut self, key: SectionKey, text: String) {
        match key {
            SectionKey::Item1 => self.item_1 = text,
            SectionKey::Item1A => self.item_1a = text,
            SectionKey::Item7 => self.item_7 = text,
            SectionKey::Item7A => self.item_7a = text,
        }
    }

    /// Iterate sections in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (SectionKey, &str)> {
        SectionKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }

    /// True when no section survived detection and filtering.
    pub fn is_empty(&self) -> bool {
        SectionKey::ALL.iter().all(|&key| self.get(key).is_empty())
    }
}

struct SectionPattern {
    key: SectionKey,
    /// Specific header wording, e.g. "ITEM 1 ... BUSINESS".
    primary: Regex,
    /// Bare item mention, consulted only when the primary never matches.
    fallback: Regex,
}

/// Compiled once; never reconfigured at runtime.
static SECTION_PATTERNS: Lazy<[SectionPattern; 4]> = Lazy::new(|| {
    [
        SectionPattern {
            key: SectionKey::Item1,
            primary: Regex::new(r"(?is)\bITEM\s*1[.\s]*BUSINESS\b").unwrap(),
            fallback: Regex::new(r"(?is)\bitem\s+1\b").unwrap(),
        },
        SectionPattern {
            key: SectionKey::Item1A,
            primary: Regex::new(r"(?is)\bITEM\s*1A[.\s]*RISK\s*FACTORS\b").unwrap(),
            fallback: Regex::new(r"(?is)\bitem\s+1a\b").unwrap(),
        },
        SectionPattern {
            key: SectionKey::Item7,
            primary: Regex::new(r"(?is)\bITEM\s*7[.\s]*MANAGEMENT").unwrap(),
            fallback: Regex::new(r"(?is)\bitem\s+7\b").unwrap(),
        },
        SectionPattern {
            key: SectionKey::Item7A,
            primary: Regex::new(r"(?is)\bITEM\s*7A\b").unwrap(),
            fallback: Regex::new(r"(?is)\bitem\s+7a\b").unwrap(),
        },
    ]
});

static INLINE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

/// Configuration for section slicing and filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Extents shorter than this many characters are treated as false
    /// positives and dropped
    pub min_section_chars: usize,
    /// Maximum extent length when no closing boundary exists
    pub max_section_chars: usize,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            min_section_chars: 1000,
            max_section_chars: 80_000,
        }
    }
}

impl SectionConfig {
    pub fn with_min_section_chars(mut self, min: usize) -> Self {
        self.min_section_chars = min;
        self
    }

    pub fn with_max_section_chars(mut self, max: usize) -> Self {
        self.max_section_chars = max;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_section_chars == 0 {
            return Err(IngestionError::ValidationError(
                "Section cap must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Extracts the canonical sections out of normalized filing text.
pub struct SectionExtractor {
    config: SectionConfig,
}

impl SectionExtractor {
    pub fn new(config: SectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Locate and slice the canonical sections.
    ///
    /// Matching runs over a copy of the text with space/tab runs collapsed,
    /// so headers broken across line wraps still match; returned extents are
    /// slices of that collapsed text.
    pub fn extract_key_sections(&self, full_text: &str) -> SectionMap {
        let text = INLINE_WHITESPACE.replace_all(full_text, " ");
        let text = text.as_ref();

        let starts = locate_section_starts(text);
        let [_, i1a, i7, i7a] = starts;

        // Each section runs to the next located section; Item 7A runs to the
        // end of the document.
        let ends = [i1a.or(i7), i7, i7a, Some(text.len())];

        let mut sections = SectionMap::default();
        for (slot, key) in SectionKey::ALL.into_iter().enumerate() {
            let extent = self.slice_section(text, starts[slot], ends[slot]);
            sections.set(key, extent);
        }

        debug!(
            item_1 = !sections.get(SectionKey::Item1).is_empty(),
            item_1a = !sections.get(SectionKey::Item1A).is_empty(),
            item_7 = !sections.get(SectionKey::Item7).is_empty(),
            item_7a = !sections.get(SectionKey::Item7A).is_empty(),
            "Sections extracted"
        );

        sections
    }

    fn slice_section(&self, text: &str, start: Option<usize>, end: Option<usize>) -> String {
        let Some(start) = start else {
            return String::new();
        };

        let extent = match end {
            // An absent or inverted closing boundary caps the extent instead
            // of letting it run away.
            Some(end) if end > start => &text[start..end],
            _ => &text[start..cap_boundary(text, start, self.config.max_section_chars)],
        };

        if extent.chars().count() < self.config.min_section_chars {
            // Most likely a table-of-contents mention with no body behind it.
            // Short genuine sections are lost too; precision over recall.
            String::new()
        } else {
            extent.to_string()
        }
    }
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self {
            config: SectionConfig::default(),
        }
    }
}

/// Start offset per canonical section, in [`SectionKey::ALL`] order.
///
/// The last match wins: a filing's table of contents repeats every header
/// near the top, so the final occurrence is taken as the section body. A
/// body that quotes another item's header verbatim can still shift a
/// boundary; accepted as a known accuracy limitation of the heuristic.
fn locate_section_starts(text: &str) -> [Option<usize>; 4] {
    let mut starts = [None; 4];
    for (slot, pattern) in SECTION_PATTERNS.iter().enumerate() {
        starts[slot] = last_match(&pattern.primary, text)
            .or_else(|| last_match(&pattern.fallback, text));
        debug_assert_eq!(pattern.key, SectionKey::ALL[slot]);
    }
    starts
}

fn last_match(pattern: &Regex, text: &str) -> Option<usize> {
    pattern.find_iter(text).last().map(|m| m.start())
}

/// Byte offset of the boundary `max_chars` characters after `start`, clamped
/// to the end of the text.
fn cap_boundary(text: &str, start: usize, max_chars: usize) -> usize {
    match text[start..].char_indices().nth(max_chars) {
        Some((offset, _)) => start + offset,
        None => text.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extractor(min: usize, max: usize) -> SectionExtractor {
        SectionExtractor::new(
            SectionConfig::default()
                .with_min_section_chars(min)
                .with_max_section_chars(max),
        )
        .unwrap()
    }

    fn filler(len: usize) -> String {
        "lorem ipsum dolor sit amet ".chars().cycle().take(len).collect()
    }

    #[test]
    fn test_canonical_order_is_fixed() {
        let labels: Vec<&str> = SectionKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(labels, vec!["Item 1", "Item 1A", "Item 7", "Item 7A"]);
    }

    #[test]
    fn test_primary_headers_slice_in_order() {
        let text = format!(
            "ITEM 1. BUSINESS\n{}\nITEM 1A. RISK FACTORS\n{}\nITEM 7. MANAGEMENT'S DISCUSSION\n{}",
            filler(1200),
            filler(1200),
            filler(1200),
        );

        let sections = extractor(1000, 80_000).extract_key_sections(&text);

        assert!(!sections.get(SectionKey::Item1).is_empty());
        assert!(!sections.get(SectionKey::Item1A).is_empty());
        assert!(!sections.get(SectionKey::Item7).is_empty());
        assert!(sections.get(SectionKey::Item7A).is_empty());
        // Item 1 must stop at the Item 1A boundary.
        assert!(!sections.get(SectionKey::Item1).contains("ITEM 1A"));
        assert!(sections.get(SectionKey::Item1).starts_with("ITEM 1. BUSINESS"));
    }

    #[test]
    fn test_last_occurrence_wins_over_toc() {
        // A table of contents mentions the header once; the body repeats it.
        let text = format!(
            "TABLE OF CONTENTS\nITEM 1. BUSINESS ... 4\nITEM 1A. RISK FACTORS ... 12\n\n\
             ITEM 1. BUSINESS\n{}\nITEM 1A. RISK FACTORS\n{}",
            filler(1500),
            filler(1500),
        );

        let sections = extractor(1000, 80_000).extract_key_sections(&text);
        let item_1 = sections.get(SectionKey::Item1);

        assert!(item_1.starts_with("ITEM 1. BUSINESS\n"));
        assert!(!item_1.contains("TABLE OF CONTENTS"));
        assert!(!item_1.contains("... 4"));
    }

    #[test]
    fn test_fallback_tier_only_without_primary() {
        // No "BUSINESS"/"RISK FACTORS" wording anywhere: bare mentions win.
        let text = format!("item 1\n{}\nitem 1a\n{}", filler(200), filler(200));
        let sections = extractor(50, 80_000).extract_key_sections(&text);

        assert!(sections.get(SectionKey::Item1).starts_with("item 1"));
        assert!(!sections.get(SectionKey::Item1A).is_empty());
    }

    #[test]
    fn test_bare_item_1_does_not_match_item_1a() {
        let text = format!("item 1a only appears here\n{}", filler(200));
        let sections = extractor(50, 80_000).extract_key_sections(&text);

        // "item 1a" must not satisfy the bare "item 1" fallback.
        assert_eq!(sections.get(SectionKey::Item1), "");
        assert!(sections.get(SectionKey::Item1A).starts_with("item 1a"));
    }

    #[test]
    fn test_missing_closing_boundary_is_capped() {
        let text = format!("ITEM 1. BUSINESS\n{}", filler(5000));
        let sections = extractor(100, 2000).extract_key_sections(&text);

        let extent = sections.get(SectionKey::Item1);
        assert_eq!(extent.chars().count(), 2000);
    }

    #[test]
    fn test_short_extent_filtered_as_noise() {
        let text = format!(
            "ITEM 1. BUSINESS\nshort\nITEM 1A. RISK FACTORS\n{}",
            filler(1500)
        );
        let sections = extractor(1000, 80_000).extract_key_sections(&text);

        assert_eq!(sections.get(SectionKey::Item1), "");
        assert!(!sections.get(SectionKey::Item1A).is_empty());
    }

    #[test]
    fn test_no_markers_yields_empty_map() {
        let sections = extractor(1000, 80_000)
            .extract_key_sections("quarterly newsletter with no item headers at all");
        assert!(sections.is_empty());
    }

    #[test]
    fn test_header_matches_across_line_wrap() {
        // Header broken across a line wrap still matches: \s crosses newlines.
        let text = format!("ITEM\n1.\nBUSINESS\n{}", filler(1500));
        let sections = extractor(1000, 80_000).extract_key_sections(&text);
        assert!(!sections.get(SectionKey::Item1).is_empty());
    }

    #[test]
    fn test_zero_cap_rejected() {
        let config = SectionConfig::default().with_max_section_chars(0);
        assert!(SectionExtractor::new(config).is_err());
    }

    #[test]
    fn test_section_map_serializes_with_canonical_keys() {
        let mut map = SectionMap::default();
        map.set(SectionKey::Item1A, "risks".to_string());
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["Item 1A"], "risks");
        assert_eq!(json["Item 7"], "");
    }
}
