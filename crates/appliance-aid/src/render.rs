//! Terminal rendering for the model's Markdown diagnosis.
//!
//! Line-oriented on purpose: the diagnosis prompt pins the reply to headings,
//! numbered lists, and paragraphs, so that is all this renders. Headings get
//! underline rules, numbered steps get an indent, inline markup passes
//! through untouched.

/// Render Markdown as plain terminal text.
#[must_use]
pub fn render_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        if let Some(heading) = line.strip_prefix("### ") {
            out.push_str(heading);
            out.push('\n');
        } else if let Some(heading) = line.strip_prefix("## ") {
            push_underlined(&mut out, heading, '-');
        } else if let Some(heading) = line.strip_prefix("# ") {
            push_underlined(&mut out, heading, '=');
        } else if is_numbered_item(line) {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        } else if line.trim().is_empty() {
            out.push('\n');
        } else {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

fn push_underlined(out: &mut String, heading: &str, rule: char) {
    out.push_str(heading);
    out.push('\n');
    out.extend(std::iter::repeat(rule).take(heading.chars().count()));
    out.push('\n');
}

/// Lines like `1. check the filter` are list items.
fn is_numbered_item(line: &str) -> bool {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return false;
    }
    let mut rest = line[digits..].chars();
    rest.next() == Some('.') && rest.next().is_some_and(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_h1_gets_equals_rule() {
        assert_eq!(render_markdown("# Diagnosis"), "Diagnosis\n=========\n");
    }

    #[test]
    fn test_h2_gets_dash_rule() {
        assert_eq!(
            render_markdown("## Likely Problem"),
            "Likely Problem\n--------------\n"
        );
    }

    #[test]
    fn test_h3_renders_bare() {
        assert_eq!(render_markdown("### Details"), "Details\n");
    }

    #[test]
    fn test_underline_counts_chars_not_bytes() {
        let rendered = render_markdown("## Überhitzung");
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0].chars().count(), lines[1].chars().count());
    }

    #[test]
    fn test_numbered_items_indented() {
        assert_eq!(
            render_markdown("1. Unplug the appliance\n2. Wait ten minutes"),
            "  1. Unplug the appliance\n  2. Wait ten minutes\n"
        );
    }

    #[test]
    fn test_number_without_dot_space_is_paragraph() {
        assert_eq!(render_markdown("1.5 liters of water"), "1.5 liters of water\n");
        assert_eq!(render_markdown("10 minutes"), "10 minutes\n");
    }

    #[test]
    fn test_blank_lines_preserved() {
        assert_eq!(render_markdown("one\n\ntwo"), "one\n\ntwo\n");
        // Whitespace-only lines collapse to empty ones
        assert_eq!(render_markdown("one\n   \ntwo"), "one\n\ntwo\n");
    }

    #[test]
    fn test_inline_markup_passes_through() {
        assert_eq!(
            render_markdown("This is **important** advice."),
            "This is **important** advice.\n"
        );
    }

    #[test]
    fn test_full_diagnosis_document() {
        let markdown = "## Likely Problem\n\
                        The drain pump is clogged.\n\
                        \n\
                        ## Simple Troubleshooting Steps\n\
                        1. Unplug the washer.\n\
                        2. Open the drain filter.\n";
        let expected = "Likely Problem\n\
                        --------------\n\
                        The drain pump is clogged.\n\
                        \n\
                        Simple Troubleshooting Steps\n\
                        ----------------------------\n\
                        \x20 1. Unplug the washer.\n\
                        \x20 2. Open the drain filter.\n";
        assert_eq!(render_markdown(markdown), expected);
    }

    #[test]
    fn test_is_numbered_item() {
        assert!(is_numbered_item("1. one"));
        assert!(is_numbered_item("42.\tstep"));
        assert!(!is_numbered_item("1.nope"));
        assert!(!is_numbered_item(". no digits"));
        assert!(!is_numbered_item("plain text"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render_markdown(""), "");
    }
}
