use crate::textprep;
use docgist_core::{Error, Result, PDF_MIME};
use serde::Serialize;
use std::io::Cursor;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Convert HTML to readable plain text.
///
/// Notes:
/// - Deterministic and "good enough"; this is not a readability engine.
/// - Width only affects wrapping; summaries are whitespace-collapsed later anyway.
pub fn html_to_text(html: &str, width: usize) -> String {
    html2text::from_read(Cursor::new(html.as_bytes()), width).unwrap_or_else(|_| html.to_string())
}

/// Extract text from a PDF body (in-memory bytes).
///
/// Extraction quality varies by PDF (text layer vs scanned images). Malformed files can
/// panic inside the PDF reader; that is reported as an extract error.
pub fn pdf_to_text(bytes: &[u8]) -> Result<String> {
    catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|_| Error::Extract("pdf reader panicked".to_string()))?
        .map_err(|e| Error::Extract(e.to_string()))
}

/// Best-effort sniff for PDF bytes (magic header).
pub fn bytes_look_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF-")
}

const HTML_OPENERS: [&[u8]; 4] = [b"<!doctype", b"<html", b"<head", b"<body"];

/// Best-effort guess for whether bytes are HTML-ish: leading whitespace, then one of the
/// usual document openers in any letter case.
pub fn bytes_look_like_html(bytes: &[u8]) -> bool {
    let rest = bytes.trim_ascii_start();
    HTML_OPENERS
        .iter()
        .any(|tag| rest.len() >= tag.len() && rest[..tag.len()].eq_ignore_ascii_case(tag))
}

fn content_type_lc_prefix(ct: Option<&str>) -> String {
    ct.unwrap_or("")
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Whether a declared MIME type (parameters ignored) is `application/pdf`.
pub fn is_pdf_content_type(content_type: Option<&str>) -> bool {
    content_type_lc_prefix(content_type) == PDF_MIME
}

fn is_text_like(ct: &str) -> bool {
    ct.starts_with("text/")
        || ct == "application/json"
        || ct == "application/xml"
        || ct.ends_with("+xml")
        || ct.ends_with("+json")
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractedText {
    pub engine: &'static str,
    /// Body text with replacement characters removed.
    pub text: String,
    pub warnings: Vec<&'static str>,
}

/// Turn a raw document body into plain text for summarization.
///
/// - PDF (by MIME type or magic bytes): pdf-extract; failures give empty text + warning.
/// - HTML: html2text.
/// - text-like MIME types: lossy UTF-8.
/// - unknown: lossy UTF-8 when the bytes decode cleanly, else empty text + warning.
pub fn body_text_from_bytes(bytes: &[u8], content_type: Option<&str>) -> ExtractedText {
    let mut warnings: Vec<&'static str> = Vec::new();
    let ct = content_type_lc_prefix(content_type);

    if ct == PDF_MIME || bytes_look_like_pdf(bytes) {
        let text = match pdf_to_text(bytes) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(error = %e, "pdf text extraction failed");
                warnings.push("pdf_extract_failed");
                String::new()
            }
        };
        return ExtractedText {
            engine: "pdf-extract",
            text: textprep::clean_field(&text),
            warnings,
        };
    }

    if ct == "text/html" || ct == "application/xhtml+xml" || bytes_look_like_html(bytes) {
        let html = String::from_utf8_lossy(bytes);
        return ExtractedText {
            engine: "html2text",
            text: textprep::clean_field(&html_to_text(&html, 120)),
            warnings,
        };
    }

    if is_text_like(&ct) {
        return ExtractedText {
            engine: "text",
            text: textprep::clean_field(&String::from_utf8_lossy(bytes)),
            warnings,
        };
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => ExtractedText {
            engine: "text",
            text: textprep::clean_field(s),
            warnings,
        },
        Err(_) => {
            warnings.push("unsupported_binary_content");
            ExtractedText {
                engine: "none",
                text: String::new(),
                warnings,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_from_simple_html() {
        let html = r#"<html><body><h1>Hello</h1><p>world</p></body></html>"#;
        let out = body_text_from_bytes(html.as_bytes(), Some("text/html; charset=utf-8"));
        assert_eq!(out.engine, "html2text");
        assert!(out.text.contains("Hello"));
        assert!(out.text.contains("world"));
    }

    #[test]
    fn pdf_magic_wins_over_declared_text_type() {
        let out = body_text_from_bytes(b"%PDF-1.7\nbroken", Some("text/plain"));
        assert_eq!(out.engine, "pdf-extract");
        assert!(out.text.trim().is_empty());
    }

    #[test]
    fn undeclared_body_with_leading_whitespace_routes_to_html2text() {
        let html = "\n   <Body><p>Coastal towns face rising seas.</p></Body>";
        assert!(bytes_look_like_html(html.as_bytes()));
        let out = body_text_from_bytes(html.as_bytes(), None);
        assert_eq!(out.engine, "html2text");
        assert!(out.text.contains("Coastal towns face rising seas."));
        assert!(!out.text.contains('<'));
    }

    #[test]
    fn html_sniff_rejects_json_and_blank_bodies() {
        assert!(bytes_look_like_html(b"<!DOCTYPE html>"));
        assert!(!bytes_look_like_html(br#"{"summary":"<p>"}"#));
        assert!(!bytes_look_like_html(b" \t\n"));
        assert!(!bytes_look_like_html(b"<bod"));
    }

    #[test]
    fn pdf_content_type_ignores_parameters_and_case() {
        assert!(is_pdf_content_type(Some("Application/PDF; qs=0.9")));
        assert!(!is_pdf_content_type(Some("text/html")));
        assert!(!is_pdf_content_type(None));
    }

    #[test]
    fn broken_pdf_yields_no_text() {
        let out = body_text_from_bytes(b"%PDF-1.4\nnot really a pdf", None);
        assert_eq!(out.engine, "pdf-extract");
        assert!(out.text.trim().is_empty());
    }

    #[test]
    fn plain_text_passes_through_without_replacement_chars() {
        let bytes = b"Plain body \xff text.";
        let out = body_text_from_bytes(bytes, Some("text/plain"));
        assert_eq!(out.engine, "text");
        assert_eq!(out.text, "Plain body  text.");
    }

    #[test]
    fn unknown_binary_is_unsupported() {
        let out = body_text_from_bytes(b"\x00\xff\xfe\x01", None);
        assert_eq!(out.engine, "none");
        assert!(out.text.is_empty());
        assert!(out.warnings.contains(&"unsupported_binary_content"));
    }

    #[test]
    fn unknown_utf8_is_treated_as_text() {
        let out = body_text_from_bytes("Grüße aus Berlin.".as_bytes(), None);
        assert_eq!(out.text, "Grüße aus Berlin.");
    }
}
