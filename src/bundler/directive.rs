//! Include directives: `source path`, `. path` and `prefix$(source path)`.
//!
//! Detection works on one printed line at a time. The command word must be
//! `source` or `.`, optionally glued to an opening prefix that ends in `(`,
//! and the path is the next whitespace-separated field.

use std::path::Path;

use crate::bundler::text::{fields, is_comment, trim_quotes};

pub const SOURCE_KEYWORD: &str = "source";
pub const DOT_KEYWORD: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    pub raw_line: &'a str,
    /// Path as written, without quotes, a leading `./` or the closing `)`
    pub target: String,
    /// The directive sits inside a `$( ... )` that closes on the path token
    pub embedded: bool,
    /// Text glued before the keyword; empty unless embedded
    pub prefix: String,
}

impl<'a> Directive<'a> {
    pub fn detect(line: &'a str) -> Option<Self> {
        if !line.contains(SOURCE_KEYWORD) && !line.contains(DOT_KEYWORD) {
            return None;
        }
        if is_comment(line) {
            return None;
        }

        let set = fields(line);
        if set.len() < 2 {
            return None;
        }

        let command = set[0];
        let prefix = command
            .strip_suffix(SOURCE_KEYWORD)
            .or_else(|| command.strip_suffix(DOT_KEYWORD))?;
        if !prefix.is_empty() && !prefix.ends_with('(') {
            return None;
        }

        let mut path = set[1];
        let embedded = path.ends_with(')');
        if embedded {
            path = &path[..path.len() - 1];
        }
        // A glued `(` prefix only counts when the path token closes it
        if !prefix.is_empty() && !embedded {
            return None;
        }
        let path = trim_quotes(path);
        let path = path.strip_prefix("./").unwrap_or(path);
        if path.is_empty() {
            return None;
        }

        Some(Directive {
            raw_line: line,
            target: path.to_string(),
            embedded,
            prefix: prefix.to_string(),
        })
    }

    /// Path of the file to inline, relative to the including file's directory.
    /// Absolute targets are used as written.
    pub fn resolve(&self, directory: &str) -> String {
        if Path::new(&self.target).is_absolute() {
            self.target.clone()
        } else {
            format!("{directory}/{}", self.target)
        }
    }

    /// Text that replaces the directive line in the parent's output.
    pub fn splice(&self, child: &str) -> String {
        if self.embedded {
            format!("{}{child})\n", self.prefix)
        } else {
            child.to_string()
        }
    }
}

/// Directory that relative directives in `path` resolve against. Paths that
/// start with `.` keep an explicit `./` on their directory.
pub fn containing_directory(path: &str) -> String {
    let parent = Path::new(path)
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    if parent.is_empty() {
        return ".".to_string();
    }
    if path.starts_with('.') && !parent.starts_with("./") {
        format!("./{parent}")
    } else {
        parent
    }
}
