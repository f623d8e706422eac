//! Filing Text Extractors
//!
//! Converts raw filing bytes into normalized plain text. The format decision
//! is driven purely by the file hint: a `.pdf` suffix (case-insensitive)
//! selects the page-based path, everything else is treated as HTML-ish
//! markup (SEC primary documents are usually `.htm`/`.html`/`.txt`).
//!
//! Extraction never fails: undecodable bytes are dropped, unparseable pages
//! contribute empty text, and problems are reported as warnings on the
//! result instead of errors.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::Node;
use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::debug;

static MULTI_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Result of text extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted, newline-normalized text
    pub text: String,
    /// Canonical content type of the chosen path
    pub content_type: String,
    /// Character encoding the bytes decoded as
    pub encoding: String,
    /// Warnings during extraction (failed pages, undecodable input)
    pub warnings: Vec<String>,
}

impl ExtractionResult {
    pub fn new(text: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            content_type: content_type.into(),
            encoding: "utf-8".to_string(),
            warnings: Vec::new(),
        }
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Trait for filing text extractors
pub trait TextExtractor: Send + Sync {
    /// Extract normalized text from raw document bytes. Infallible: a
    /// document that yields no text produces an empty result, not an error.
    fn extract(&self, content: &[u8]) -> ExtractionResult;

    /// Get extractor name
    fn name(&self) -> &'static str;
}

/// Decode bytes leniently: UTF-8 first, WINDOWS-1252 as fallback.
/// Sequences that still fail to decode are dropped, never surfaced.
fn decode_lossy(content: &[u8]) -> (String, &'static str) {
    match std::str::from_utf8(content) {
        Ok(s) => (s.to_string(), "utf-8"),
        Err(_) => {
            let (decoded, _, had_errors) = encoding_rs::WINDOWS_1252.decode(content);
            let text = if had_errors {
                decoded.chars().filter(|&c| c != '\u{FFFD}').collect()
            } else {
                decoded.into_owned()
            };
            (text, "windows-1252")
        }
    }
}

/// Collapse 3+ consecutive newlines to exactly 2 and trim the ends.
fn normalize_newlines(text: &str) -> String {
    MULTI_NEWLINE.replace_all(text, "\n\n").trim().to_string()
}

/// Markup extractor for HTML-ish filing documents
pub struct MarkupExtractor;

impl MarkupExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarkupExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for MarkupExtractor {
    fn extract(&self, content: &[u8]) -> ExtractionResult {
        let (raw, encoding) = decode_lossy(content);
        let document = Html::parse_document(&raw);

        let mut parts: Vec<String> = Vec::new();
        for node in document.tree.root().descendants() {
            let Node::Text(text) = node.value() else {
                continue;
            };
            // script/style/noscript subtrees carry no visible text
            let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
                Node::Element(el) => matches!(el.name(), "script" | "style" | "noscript"),
                _ => false,
            });
            if hidden {
                continue;
            }
            let visible = text.text.trim();
            if !visible.is_empty() {
                parts.push(visible.to_string());
            }
        }

        let text = normalize_newlines(&parts.join("\n"));

        debug!(
            encoding = %encoding,
            bytes = content.len(),
            chars = text.chars().count(),
            "Extracted markup text"
        );

        ExtractionResult::new(text, "text/html").with_encoding(encoding)
    }

    fn name(&self) -> &'static str {
        "markup"
    }
}

/// Page-based extractor for PDF filings
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, content: &[u8]) -> ExtractionResult {
        let mut warnings = Vec::new();
        let mut pages: Vec<String> = Vec::new();

        match lopdf::Document::load_mem(content) {
            Ok(document) => {
                for (&number, _) in document.get_pages().iter() {
                    // A page that fails to yield text contributes nothing;
                    // the rest of the document still extracts.
                    match document.extract_text(&[number]) {
                        Ok(text) => {
                            let text = text.trim();
                            if !text.is_empty() {
                                pages.push(text.to_string());
                            }
                        }
                        Err(err) => {
                            warnings.push(format!("page {number} yielded no text: {err}"));
                        }
                    }
                }
            }
            Err(err) => {
                warnings.push(format!("input did not parse as a PDF document: {err}"));
            }
        }

        let text = normalize_newlines(&pages.join("\n"));

        debug!(
            pages = pages.len(),
            warnings = warnings.len(),
            chars = text.chars().count(),
            "Extracted page-based text"
        );

        let mut result = ExtractionResult::new(text, "application/pdf");
        result.warnings = warnings;
        result
    }

    fn name(&self) -> &'static str {
        "pdf"
    }
}

/// Registry dispatching raw bytes to the extractor for their format
pub struct ExtractorRegistry {
    markup: MarkupExtractor,
    pdf: PdfExtractor,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            markup: MarkupExtractor::new(),
            pdf: PdfExtractor::new(),
        }
    }

    /// Pick the extractor for a filename or path hint. Only the suffix is
    /// consulted: `.pdf` selects the page-based path, anything else markup.
    pub fn extractor_for(&self, file_hint: &str) -> &dyn TextExtractor {
        if file_hint.to_ascii_lowercase().ends_with(".pdf") {
            &self.pdf
        } else {
            &self.markup
        }
    }

    /// Extract normalized text from raw bytes using the hinted format.
    pub fn extract(&self, content: &[u8], file_hint: &str) -> ExtractionResult {
        self.extractor_for(file_hint).extract(content)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_markup_strips_script_and_style() {
        let html = br#"<html>
            <head><style>body { color: red; }</style><script>var x = 1;</script></head>
            <body>
                <h1>Annual Report</h1>
                <noscript>Enable JavaScript</noscript>
                <p>Revenue grew.</p>
            </body>
        </html>"#;

        let result = MarkupExtractor::new().extract(html);

        assert!(result.text.contains("Annual Report"));
        assert!(result.text.contains("Revenue grew."));
        assert!(!result.text.contains("color: red"));
        assert!(!result.text.contains("var x"));
        assert!(!result.text.contains("Enable JavaScript"));
        assert_eq!(result.content_type, "text/html");
    }

    #[test]
    fn test_markup_joins_text_nodes_with_line_breaks() {
        let html = b"<html><body><p>first</p><p>second</p></body></html>";
        let result = MarkupExtractor::new().extract(html);
        assert_eq!(result.text, "first\nsecond");
    }

    #[test]
    fn test_newline_collapse() {
        assert_eq!(normalize_newlines("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize_newlines("\n\na\n\nb\n\n"), "a\n\nb");
    }

    #[test]
    fn test_decode_lossy_invalid_utf8_never_errors() {
        // 0x92 is a curly apostrophe in WINDOWS-1252 and invalid UTF-8.
        let bytes = b"company\x92s results";
        let (text, encoding) = decode_lossy(bytes);
        assert_eq!(encoding, "windows-1252");
        assert!(text.starts_with("company"));
        assert!(text.ends_with("results"));
    }

    #[test]
    fn test_decode_lossy_plain_utf8() {
        let (text, encoding) = decode_lossy("r\u{00e9}sum\u{00e9}".as_bytes());
        assert_eq!(encoding, "utf-8");
        assert_eq!(text, "r\u{00e9}sum\u{00e9}");
    }

    #[test]
    fn test_pdf_garbage_bytes_degrade_to_empty() {
        let result = PdfExtractor::new().extract(b"definitely not a pdf");
        assert_eq!(result.text, "");
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_registry_dispatch_on_suffix() {
        let registry = ExtractorRegistry::new();
        assert_eq!(registry.extractor_for("filings/cat-10k.PDF").name(), "pdf");
        assert_eq!(registry.extractor_for("filings/cat-10k.htm").name(), "markup");
        assert_eq!(registry.extractor_for("no-extension").name(), "markup");
    }

    #[test]
    fn test_extraction_result_builder() {
        let result = ExtractionResult::new("content", "text/html")
            .with_encoding("windows-1252")
            .with_warning("partial");

        assert_eq!(result.text, "content");
        assert_eq!(result.encoding, "windows-1252");
        assert_eq!(result.warnings.len(), 1);
    }
}
