//! Result rendering: turn an [`AnalysisResult`] into display text.
//!
//! Everything here is a pure function (`&T → String`) with no I/O, so each
//! piece is independently testable and the CLI, a TUI, or a web handler can
//! all share the same output.
//!
//! Two kinds of field exist in an analysis payload:
//!
//! - **Plain text** (`summary`, `analysis`): model prose that often carries
//!   stray Markdown emphasis and blank-line padding. [`format_plain_text`]
//!   strips both.
//! - **Structured** (`entities`, `sentiment`): arbitrary nested JSON.
//!   [`format_structured`] flattens it into `key: value` lines. The
//!   flattening is for display only and is not reversible.

use crate::output::{AnalysisResult, Structured};
use once_cell::sync::Lazy;
use regex::Regex;

/// Rendered in place of a structured field that is missing or not a mapping.
pub const NOT_AVAILABLE: &str = "N/A";

const INDENT: &str = "  ";

// ── Plain text ───────────────────────────────────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Clean model prose for display.
///
/// 1. Remove Markdown emphasis markers (`**` and `*`)
/// 2. Collapse any newline / whitespace / newline run into a single newline
/// 3. Trim leading and trailing whitespace
///
/// Idempotent: after step 2 no whitespace run contains two newlines, and
/// neither step 1 nor step 3 can create one.
pub fn format_plain_text(input: &str) -> String {
    let s = strip_emphasis(input);
    let s = collapse_blank_lines(&s);
    s.trim().to_string()
}

fn strip_emphasis(input: &str) -> String {
    input.replace("**", "").replace('*', "")
}

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n").into_owned()
}

// ── Structured ───────────────────────────────────────────────────────────────

/// Flatten a structured value into one `key: value` line per mapping entry.
///
/// - list entries render inline: `key: a, b, c`
/// - nested mappings render as `key:` followed by the nested lines, each
///   indented by two spaces
/// - scalar entries render as `key: value`; null entries as `key: N/A`
///
/// Anything that is not a mapping renders as [`NOT_AVAILABLE`].
pub fn format_structured(value: &Structured) -> String {
    match value {
        Structured::Mapping(entries) => entries
            .iter()
            .map(|(key, value)| format_entry(key, value))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn format_entry(key: &str, value: &Structured) -> String {
    match value {
        Structured::List(items) => format!("{key}: {}", join_inline(items, ", ")),
        Structured::Mapping(entries) if entries.is_empty() => format!("{key}:"),
        Structured::Mapping(_) => format!("{key}:\n{}", indent(&format_structured(value))),
        Structured::Scalar(s) => format!("{key}: {s}"),
        Structured::Absent => format!("{key}: {NOT_AVAILABLE}"),
    }
}

/// Render a value on a single line, as a list element.
fn inline(value: &Structured) -> String {
    match value {
        Structured::Absent => String::new(),
        Structured::Scalar(s) => s.clone(),
        Structured::List(items) => join_inline(items, ","),
        Structured::Mapping(entries) => {
            let body = entries
                .iter()
                .map(|(k, v)| format!("{k}: {}", inline(v)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{body}}}")
        }
    }
}

fn join_inline(items: &[Structured], sep: &str) -> String {
    items.iter().map(inline).collect::<Vec<_>>().join(sep)
}

fn indent(block: &str) -> String {
    block
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{INDENT}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Report ───────────────────────────────────────────────────────────────────

/// Render the complete analysis block shown after a successful cycle.
pub fn render_report(result: &AnalysisResult) -> String {
    format!(
        "Analysis:\n\
         Summary: {}\n\
         Entities:\n{}\n\
         Sentiment:\n{}\n\
         AI Response: {}\n",
        format_plain_text(&result.summary),
        format_structured(&result.entities),
        format_structured(&result.sentiment),
        format_plain_text(&result.analysis),
    )
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_reference_example() {
        assert_eq!(
            format_plain_text("**bold** and *italic*\n\n\nend"),
            "bold and italic\nend"
        );
    }

    #[test]
    fn test_plain_text_collapses_whitespace_only_lines() {
        assert_eq!(format_plain_text("a\n   \n\t\nb"), "a\nb");
    }

    #[test]
    fn test_plain_text_keeps_single_newlines() {
        assert_eq!(format_plain_text("line one\nline two"), "line one\nline two");
    }

    #[test]
    fn test_plain_text_trims() {
        assert_eq!(format_plain_text("  \n **Summary** \n "), "Summary");
    }

    #[test]
    fn test_plain_text_idempotent() {
        let samples = [
            "",
            "   ",
            "**bold** and *italic*\n\n\nend",
            "a\r\n\r\nb",
            "x\n*\ny",
            "tail spaces\n\n  ",
            "* item\n* item\n\n\n* item",
            "\u{00A0}\n\u{2003}\nwide",
        ];
        for s in samples {
            let once = format_plain_text(s);
            assert_eq!(format_plain_text(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_structured_reference_example() {
        let v = Structured::from(json!({"a": "1", "b": [1, 2, 3], "c": {"d": "x"}}));
        assert_eq!(format_structured(&v), "a: 1\nb: 1, 2, 3\nc:\n  d: x");
    }

    #[test]
    fn test_structured_non_mapping_is_na() {
        assert_eq!(format_structured(&Structured::Absent), "N/A");
        assert_eq!(format_structured(&Structured::from(json!("string"))), "N/A");
        assert_eq!(format_structured(&Structured::from(json!([1, 2]))), "N/A");
    }

    #[test]
    fn test_structured_indents_every_nested_line() {
        let v = Structured::from(json!({
            "scores": {"pos": 0.8, "neg": 0.1, "detail": {"model": "v2"}}
        }));
        assert_eq!(
            format_structured(&v),
            "scores:\n  pos: 0.8\n  neg: 0.1\n  detail:\n    model: v2"
        );
    }

    #[test]
    fn test_structured_null_and_empty_entries() {
        let v = Structured::from(json!({"missing": null, "empty": {}, "none": []}));
        assert_eq!(format_structured(&v), "missing: N/A\nempty:\nnone: ");
    }

    #[test]
    fn test_structured_lists_of_objects_stay_inline() {
        let v = Structured::from(json!({
            "people": [{"name": "Ada", "role": "author"}, "Alan", null, [1, 2]]
        }));
        assert_eq!(
            format_structured(&v),
            "people: {name: Ada, role: author}, Alan, , 1,2"
        );
    }

    #[test]
    fn test_render_report_sections() {
        let result = AnalysisResult::from_value(json!({
            "summary": "**Quarterly** report\n\n\nfor Q3",
            "entities": {"orgs": ["ACME", "Globex"]},
            "sentiment": null,
            "analysis": "*Overall* stable."
        }))
        .unwrap();
        let report = render_report(&result);
        assert!(report.starts_with("Analysis:\n"));
        assert!(report.contains("Summary: Quarterly report\nfor Q3\n"));
        assert!(report.contains("Entities:\norgs: ACME, Globex\n"));
        assert!(report.contains("Sentiment:\nN/A\n"));
        assert!(report.ends_with("AI Response: Overall stable.\n"));
    }
}
