use regex::{Regex, RegexBuilder};

use crate::error::{FsError, Result};

/// A wildcard name pattern compiled into an anchored, case-insensitive rule.
///
/// `*` matches any run of characters (including none) and `?` exactly one;
/// every other character matches itself. The whole name must match.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
}

impl CompiledPattern {
    pub fn compile(glob: &str) -> Result<Self> {
        let regex = RegexBuilder::new(&glob_to_regex(glob))
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|source| FsError::InvalidPattern {
                pattern: glob.to_string(),
                source,
            })?;
        Ok(Self { regex })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() * 2 + 2);
    out.push('^');
    let mut literal = String::new();
    for c in glob.chars() {
        match c {
            '*' | '?' => {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                out.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    out.push_str(&regex::escape(&literal));
    out.push('$');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(glob: &str, name: &str) -> bool {
        CompiledPattern::compile(glob).unwrap().matches(name)
    }

    #[test]
    fn star_suffix() {
        assert!(m("*.txt", "a.txt"));
        assert!(m("*.txt", "a.TXT"));
        assert!(m("*.txt", ".txt"));
        assert!(!m("*.txt", "a.txt.bak"));
        assert!(!m("*.txt", "atxt"));
    }

    #[test]
    fn question_mark_is_exactly_one() {
        assert!(m("file?.md", "file1.md"));
        assert!(!m("file?.md", "file10.md"));
        assert!(!m("file?.md", "file.md"));
    }

    #[test]
    fn literal_pattern_is_exact_and_case_insensitive() {
        assert!(m("README.md", "readme.MD"));
        assert!(!m("README.md", "README.md.orig"));
        assert!(!m("README.md", "xREADME.md"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        assert!(m("a+b(1).log", "a+b(1).log"));
        assert!(!m("a+b(1).log", "aab1.log"));
        assert!(m("[x]*", "[x]yz"));
    }

    #[test]
    fn star_alone_matches_everything() {
        assert!(m("*", ""));
        assert!(m("*", "anything at all"));
    }

    #[test]
    fn equivalent_globs_compile_identically() {
        let a = glob_to_regex("*.rs");
        let b = glob_to_regex("*.rs");
        assert_eq!(a, b);
        assert_eq!(a, r"^.*\.rs$");
    }
}
