//! Small line helpers shared by directive detection and bundling.

pub fn is_shebang(line: &str) -> bool {
    line.starts_with("#!")
}

pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Drop entries that are empty or only whitespace.
pub fn delete_empty<'a>(values: &[&'a str]) -> Vec<&'a str> {
    values
        .iter()
        .copied()
        .filter(|v| !v.trim().is_empty())
        .collect()
}

/// Whitespace-separated fields of a line
pub fn fields(line: &str) -> Vec<&str> {
    let split: Vec<&str> = line.trim().split(char::is_whitespace).collect();
    delete_empty(&split)
}

/// Strip one layer of matching single or double quotes.
pub fn trim_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_shebang() {
        assert!(is_shebang("#!/bin/bash"));
        assert!(is_shebang("#!/usr/bin/env bash"));
        assert!(!is_shebang("# comment"));
        assert!(!is_shebang("echo \"#!\""));
        assert!(!is_shebang(""));
    }

    #[test]
    fn test_is_comment() {
        assert!(is_comment("# note"));
        assert!(is_comment("    # indented"));
        assert!(!is_comment("echo # trailing"));
    }

    #[test]
    fn test_delete_empty() {
        assert_eq!(delete_empty(&["a", "", "b", " ", "c"]), vec!["a", "b", "c"]);
        assert!(delete_empty(&["", "  "]).is_empty());
    }

    #[test]
    fn test_fields() {
        assert_eq!(fields("   source    lib.sh  "), vec!["source", "lib.sh"]);
        assert_eq!(fields("\tsource\t\"a.sh\""), vec!["source", "\"a.sh\""]);
    }

    #[test]
    fn test_trim_quotes() {
        assert_eq!(trim_quotes("\"lib.sh\""), "lib.sh");
        assert_eq!(trim_quotes("'lib.sh'"), "lib.sh");
        assert_eq!(trim_quotes("\"\"lib.sh\"\""), "\"lib.sh\"");
        assert_eq!(trim_quotes("\"lib.sh"), "\"lib.sh");
        assert_eq!(trim_quotes("lib.sh'"), "lib.sh'");
        assert_eq!(trim_quotes("\""), "\"");
        assert_eq!(trim_quotes("lib.sh"), "lib.sh");
    }
}
