//! Line classification and option-text cleaning for the segmenter.
//!
//! The source convention is fixed: numbered stems (`12.`, `12 .`, `12)`,
//! `12-`), bullet-prefixed options, and a small set of glyphs flagging the
//! correct answer. Everything here is a pure function `&str -> ...` applied
//! per trimmed line.

use std::sync::LazyLock;

use regex::Regex;

/// Glyphs the source convention uses to flag the correct option.
pub(crate) const CORRECT_MARKS: [char; 4] = ['✔', '√', '✓', '+'];

/// Leading characters denoting a list item.
pub(crate) const BULLET_MARKS: [char; 5] = ['•', '●', '-', '*', ')'];

/// Substring inserted between pages by the upstream text extractor.
const PAGE_BREAK_SENTINEL: &str = "--- PAGE";

/// Document-template metadata field that must never become content.
const SUBJECT_LABEL: &str = "Subject:";

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Matches a question header: digits, optional space, then `.`, `)` or `-`.
/// Tolerates `1 .` as well as `1.`; the remainder is the initial stem text.
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*[.)\-]\s*(.*)$").expect("header regex"));

/// Matches a stray numbering artifact like `12.` left over after cleaning.
static BARE_NUMERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.$").expect("bare numeral regex"));

/// Matches leading list-marker decoration on an option line.
static LEADING_DECOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s•●\-*).]+").expect("leading decoration regex"));

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Structural noise from the source template: blank lines, page-break
/// sentinels, and metadata fields. Discarded with no state change.
pub(crate) fn is_noise(line: &str) -> bool {
    line.is_empty() || line.contains(PAGE_BREAK_SENTINEL) || line.contains(SUBJECT_LABEL)
}

/// If `line` is a question header, return the declared id and the initial
/// stem text (trimmed). Ids too large for `u32` are not headers.
pub(crate) fn match_header(line: &str) -> Option<(u32, &str)> {
    let caps = HEADER_RE.captures(line)?;
    let id: u32 = caps.get(1)?.as_str().parse().ok()?;
    let rest = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
    Some((id, rest))
}

/// True if the line carries a correctness glyph anywhere.
pub(crate) fn has_correct_mark(line: &str) -> bool {
    line.contains(CORRECT_MARKS)
}

/// True if the line starts with a bullet/list marker.
pub(crate) fn starts_with_bullet(line: &str) -> bool {
    line.starts_with(BULLET_MARKS)
}

/// True if the line reads like the continuation of wrapped text: it opens
/// with a lower-case letter or with `,` `;` `:`.
pub(crate) fn is_continuation_candidate(line: &str) -> bool {
    match line.chars().next() {
        Some(c) => c.is_lowercase() || matches!(c, ',' | ';' | ':'),
        None => false,
    }
}

/// True if cleaned option text is only digits followed by a period — a
/// mis-segmented header fragment, never a real option.
pub(crate) fn is_bare_numeral(text: &str) -> bool {
    BARE_NUMERAL_RE.is_match(text)
}

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

/// Clean an option line: remove every correctness glyph, then strip leading
/// list-marker decoration (whitespace, bullets, hyphens, asterisks, closing
/// parens, periods) without touching interior punctuation, then trim.
pub(crate) fn clean_option_text(line: &str) -> String {
    let without_marks: String = line.chars().filter(|c| !CORRECT_MARKS.contains(c)).collect();
    LEADING_DECOR_RE
        .replace(&without_marks, "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_lines_are_detected() {
        assert!(is_noise(""));
        assert!(is_noise("--- PAGE 3 ---"));
        assert!(is_noise("Subject: Civil Defense"));
        assert!(!is_noise("1. A real question"));
    }

    #[test]
    fn header_variants_all_match() {
        for line in ["3. Pick one", "3 . Pick one", "3) Pick one", "3- Pick one"] {
            let (id, rest) = match_header(line).expect(line);
            assert_eq!(id, 3);
            assert_eq!(rest, "Pick one");
        }
    }

    #[test]
    fn header_allows_leading_whitespace_and_empty_rest() {
        let (id, rest) = match_header("  17.").expect("header");
        assert_eq!(id, 17);
        assert_eq!(rest, "");
    }

    #[test]
    fn non_headers_do_not_match() {
        assert!(match_header("• Red").is_none());
        assert!(match_header("What about 3. in the middle").is_none());
        // Larger than u32::MAX
        assert!(match_header("99999999999. overflow").is_none());
    }

    #[test]
    fn correctness_glyphs() {
        assert!(has_correct_mark("✔ Blue"));
        assert!(has_correct_mark("√ Blue"));
        assert!(has_correct_mark("Blue ✓"));
        assert!(has_correct_mark("+ Blue"));
        assert!(!has_correct_mark("• Blue"));
    }

    #[test]
    fn continuation_candidates() {
        assert!(is_continuation_candidate("continued text"));
        assert!(is_continuation_candidate(", and more"));
        assert!(is_continuation_candidate("; also"));
        assert!(is_continuation_candidate(": namely"));
        assert!(!is_continuation_candidate("Capitalized"));
        assert!(!is_continuation_candidate("• bullet"));
    }

    #[test]
    fn cleaning_strips_marks_and_decoration() {
        assert_eq!(clean_option_text("✔ Blue"), "Blue");
        assert_eq!(clean_option_text("• - Red option"), "Red option");
        assert_eq!(clean_option_text("*) Green"), "Green");
        // Interior punctuation survives
        assert_eq!(clean_option_text("• a) first, b) second"), "a) first, b) second");
        // Glyphs are removed wherever they appear
        assert_eq!(clean_option_text("Blue ✔"), "Blue");
    }

    #[test]
    fn bare_numeral_filter() {
        assert!(is_bare_numeral("12."));
        assert!(!is_bare_numeral("12.5 meters"));
        assert!(!is_bare_numeral("twelve."));
    }
}
