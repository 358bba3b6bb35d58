//! Code-section extraction.
//!
//! A Razor component may end with an `@code { ... }` block holding plain C#.
//! Everything from the first `@code {` to the end of input is kept out of the
//! scanner and re-attached verbatim as the last root text node.

use std::sync::OnceLock;

use regex::Regex;

fn code_section_regex() -> &'static Regex {
    static CODE_SECTION_REGEX: OnceLock<Regex> = OnceLock::new();
    CODE_SECTION_REGEX
        .get_or_init(|| Regex::new(r"@code\s*\{").expect("Invalid code section regex"))
}

/// Splits `text` into the part to scan and the trailing opaque code section.
///
/// Absence of a code section is normal and yields `(text, None)`.
pub fn extract_code_section(text: &str) -> (&str, Option<&str>) {
    match code_section_regex().find(text) {
        Some(m) => (&text[..m.start()], Some(&text[m.start()..])),
        None => (text, None),
    }
}

/// Whether `text` begins with the code-section opener.
pub fn is_code_section(text: &str) -> bool {
    code_section_regex()
        .find(text)
        .is_some_and(|m| m.start() == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_code_section() {
        let (parsable, section) = extract_code_section("<p>Hi</p>");
        assert_eq!(parsable, "<p>Hi</p>");
        assert_eq!(section, None);
    }

    #[test]
    fn splits_at_first_opener() {
        let input = "<p>Hi</p>\n@code {\n    int x;\n}\n";
        let (parsable, section) = extract_code_section(input);
        assert_eq!(parsable, "<p>Hi</p>\n");
        assert_eq!(section, Some("@code {\n    int x;\n}\n"));
    }

    #[test]
    fn opener_allows_whitespace_before_brace() {
        let (parsable, section) = extract_code_section("@code\n{ }");
        assert_eq!(parsable, "");
        assert_eq!(section, Some("@code\n{ }"));
    }

    #[test]
    fn similar_identifiers_are_not_openers() {
        let (_, section) = extract_code_section("@codeBehind { }");
        assert_eq!(section, None);
    }

    #[test]
    fn later_code_blocks_stay_in_the_section() {
        let input = "@code { a(); }\n@code { b(); }";
        let (parsable, section) = extract_code_section(input);
        assert_eq!(parsable, "");
        assert_eq!(section, Some(input));
    }

    #[test]
    fn detects_section_start() {
        assert!(is_code_section("@code { }"));
        assert!(!is_code_section("text @code { }"));
        assert!(!is_code_section("<p></p>"));
    }
}
