//! Terminal rendering of generation results.
//!
//! The engine delivers the model's raw response text; this module is the
//! presentation-layer cleanup between that text and the terminal. Two steps:
//! strip the boilerplate labels some models prepend despite being told not
//! to, then apply a lightweight markdown-to-ANSI transform (bold spans,
//! bullet markers, tidy line spacing).

/// Leading labels the model sometimes adds around the improved prompt.
const KNOWN_LABELS: &[&str] = &[
    "Improved prompt:",
    "Improved version:",
    "Result:",
    "Answer:",
];

/// ANSI bold on / off.
const BOLD_ON: &str = "\x1b[1m";
const BOLD_OFF: &str = "\x1b[0m";

/// Full cleanup pipeline: label stripping followed by markup conversion.
pub fn render_response(raw: &str) -> String {
    markdown_to_ansi(&strip_known_labels(raw))
}

/// Remove known boilerplate labels and trim the result.
pub fn strip_known_labels(text: &str) -> String {
    let mut cleaned = text.to_owned();
    for label in KNOWN_LABELS {
        cleaned = cleaned.replace(label, "");
    }
    cleaned.trim().to_owned()
}

/// Convert the markdown subset models actually emit into terminal text:
/// `**bold**` becomes ANSI bold, a leading `* ` becomes a bullet, blank
/// lines are dropped, and every line is trimmed.
pub fn markdown_to_ansi(text: &str) -> String {
    let mut lines = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let line = match line.strip_prefix("* ") {
            Some(rest) => format!("• {rest}"),
            None => line.to_owned(),
        };

        lines.push(embolden(&line));
    }
    lines.join("\n")
}

/// Replace paired `**` markers with ANSI bold codes. An unpaired marker is
/// left as-is.
fn embolden(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(start) = rest.find("**") {
        match rest[start + 2..].find("**") {
            Some(len) => {
                out.push_str(&rest[..start]);
                out.push_str(BOLD_ON);
                out.push_str(&rest[start + 2..start + 2 + len]);
                out.push_str(BOLD_OFF);
                rest = &rest[start + 2 + len + 2..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_known_labels_and_whitespace() {
        assert_eq!(
            strip_known_labels("Improved prompt:  write a haiku about rust"),
            "write a haiku about rust"
        );
        assert_eq!(strip_known_labels("Answer:\nbe concise"), "be concise");
        assert_eq!(strip_known_labels("no label here"), "no label here");
    }

    #[test]
    fn bold_spans_become_ansi() {
        assert_eq!(
            embolden("use **exact** words"),
            format!("use {BOLD_ON}exact{BOLD_OFF} words")
        );
    }

    #[test]
    fn unpaired_marker_is_preserved() {
        assert_eq!(embolden("a ** b"), "a ** b");
        assert_eq!(
            embolden("**one** and ** stray"),
            format!("{BOLD_ON}one{BOLD_OFF} and ** stray")
        );
    }

    #[test]
    fn bullets_and_blank_lines() {
        let input = "First line\n\n* bullet one\n  * indented bullet\n\n";
        assert_eq!(
            markdown_to_ansi(input),
            "First line\n• bullet one\n• indented bullet"
        );
    }

    #[test]
    fn full_pipeline() {
        let raw = "Improved version: \n\n**Goal:** write a haiku\n* keep it short\n";
        let rendered = render_response(raw);
        assert_eq!(
            rendered,
            format!("{BOLD_ON}Goal:{BOLD_OFF} write a haiku\n• keep it short")
        );
    }
}
