//! Printer for parsed scripts
//!
//! Renders statements back to text. The formatted mode re-indents lines by
//! nesting depth and either keeps or collapses the blanks between tokens.
//! The minified mode drops comments, indentation and blank lines, squeezes
//! blanks around control operators and minifies `$( ... )` bodies in place.
//!
//! Here-document bodies, quoted strings and line continuations are always
//! printed exactly as written.

use crate::ast::types::{ScriptNode, StatementNode};
use crate::parser::lexer::{Token, TokenType};
use crate::parser::types::is_separator_token;
use crate::parser::{parse_script, ParseOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Printer {
    /// Spaces per nesting level; 0 keeps the original indentation
    indent: usize,
    /// Keep the original blanks between tokens on a line
    keep_padding: bool,
    minify: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self {
            indent: 4,
            keep_padding: false,
            minify: false,
        }
    }
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Printer for the minified mode (no padding, no comments)
    pub fn minified() -> Self {
        Self {
            indent: 0,
            keep_padding: false,
            minify: true,
        }
    }

    pub fn indent(mut self, width: usize) -> Self {
        self.indent = width;
        self
    }

    pub fn keep_padding(mut self, keep: bool) -> Self {
        self.keep_padding = keep;
        self
    }

    /// Print one statement without a trailing newline.
    pub fn print_statement(&self, statement: &StatementNode) -> String {
        if self.minify {
            self.print_minified(statement)
        } else {
            self.print_formatted(statement)
        }
    }

    /// Print a whole script, one statement per line.
    pub fn print_script(&self, script: &ScriptNode) -> String {
        let mut out = String::new();
        for statement in &script.statements {
            let text = self.print_statement(statement);
            if self.minify && text.is_empty() {
                continue;
            }
            out.push_str(&text);
            out.push('\n');
        }
        out
    }

    fn print_formatted(&self, statement: &StatementNode) -> String {
        let mut out = String::new();
        if statement.blank_before {
            out.push('\n');
        }

        let mut first = true;
        let mut line_start = true;
        for token in &statement.tokens {
            match token.token_type {
                TokenType::Newline => {
                    out.push('\n');
                    line_start = true;
                    continue;
                }
                TokenType::HeredocContent => {
                    out.push_str(&token.value);
                    line_start = true;
                    continue;
                }
                _ => {}
            }

            if first {
                // The statement itself starts at column zero
            } else if line_start {
                self.push_indent(&mut out, token);
            } else {
                self.push_gap(&mut out, token);
            }
            out.push_str(&token.value);
            first = false;
            line_start = false;
        }

        if out.ends_with('\n') {
            out.pop();
        }
        out
    }

    fn push_indent(&self, out: &mut String, token: &Token) {
        if self.indent == 0 {
            out.push_str(&token.leading);
        } else {
            out.push_str(&" ".repeat(self.indent * token.depth));
        }
    }

    fn push_gap(&self, out: &mut String, token: &Token) {
        if self.keep_padding || token.leading.contains('\n') {
            out.push_str(&token.leading);
        } else if !token.leading.is_empty() {
            out.push(' ');
        }
    }

    fn print_minified(&self, statement: &StatementNode) -> String {
        let mut out = String::new();
        let mut prev: Option<TokenType> = None;

        for token in &statement.tokens {
            let tt = token.token_type;
            match tt {
                TokenType::Comment => continue,
                TokenType::Newline => {
                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                    continue;
                }
                TokenType::HeredocContent => {
                    if !out.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str(&token.value);
                    continue;
                }
                _ => {}
            }

            if let Some(prev) = prev {
                let at_line_start = out.is_empty() || out.ends_with('\n');
                let squeezable = is_separator_token(prev)
                    || (is_separator_token(tt) && tt != TokenType::LParen);
                if !at_line_start && !token.leading.is_empty() && !squeezable {
                    out.push(' ');
                }
            }
            out.push_str(&minify_word(token));
            prev = Some(tt);
        }

        while out.ends_with('\n') {
            out.pop();
        }
        out
    }
}

/// Rebuild a word with each recorded `$( ... )` body minified. Bodies that do
/// not parse on their own are left untouched.
fn minify_word(token: &Token) -> String {
    if token.substitutions.is_empty() {
        return token.value.clone();
    }

    let chars: Vec<char> = token.value.chars().collect();
    let mut out = String::with_capacity(token.value.len());
    let mut last = 0;
    for &(start, end) in &token.substitutions {
        out.extend(&chars[last..start]);
        let body: String = chars[start..end].iter().collect();
        out.push_str(&minify_fragment(&body).unwrap_or(body));
        last = end;
    }
    out.extend(&chars[last..]);
    out
}

fn minify_fragment(body: &str) -> Option<String> {
    let script = parse_script(body, ParseOptions { keep_comments: false }).ok()?;
    let printed = Printer::minified().print_script(&script);
    let mut printed = printed.trim_end_matches('\n').to_string();
    // The closing `)` may not share a line with a here-document delimiter
    let ends_in_heredoc = script
        .statements
        .last()
        .and_then(|s| s.tokens.last())
        .is_some_and(|t| t.token_type == TokenType::HeredocContent);
    if ends_in_heredoc {
        printed.push('\n');
    }
    // `$( (cmd) )` must not collapse into arithmetic `$((`
    if printed.starts_with('(') {
        printed.insert(0, ' ');
    }
    Some(printed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn formatted(input: &str, printer: Printer) -> Vec<String> {
        let script = parse(input).unwrap();
        script
            .statements
            .iter()
            .map(|s| printer.print_statement(s))
            .collect()
    }

    fn minified(input: &str) -> String {
        let script = parse_script(input, ParseOptions::default()).unwrap();
        Printer::minified().print_script(&script)
    }

    #[test]
    fn test_keep_padding() {
        let printer = Printer::new().keep_padding(true);
        assert_eq!(formatted("echo   a  b\n", printer), vec!["echo   a  b"]);
        let printer = Printer::new();
        assert_eq!(formatted("echo   a  b\n", printer), vec!["echo a b"]);
    }

    #[test]
    fn test_reindent() {
        let input = "if x; then\n\techo y\n  if z; then\n w\n fi\nfi\n";
        assert_eq!(
            formatted(input, Printer::new().indent(4)),
            vec!["if x; then\n    echo y\n    if z; then\n        w\n    fi\nfi"]
        );
        assert_eq!(
            formatted(input, Printer::new().indent(0)),
            vec!["if x; then\n\techo y\n  if z; then\n w\n fi\nfi"]
        );
    }

    #[test]
    fn test_blank_line_before_statement() {
        assert_eq!(
            formatted("a\n\n\nb\n", Printer::new()),
            vec!["a".to_string(), "\nb".to_string()]
        );
    }

    #[test]
    fn test_heredoc_printed_verbatim() {
        let input = "cat <<EOF\n  keep   me\nEOF\n";
        assert_eq!(formatted(input, Printer::new()), vec!["cat <<EOF\n  keep   me\nEOF"]);
    }

    #[test]
    fn test_comment_lines() {
        let input = "#!/bin/bash\n# note\necho a   # trailing\n";
        assert_eq!(
            formatted(input, Printer::new().keep_padding(true)),
            vec!["#!/bin/bash", "# note", "echo a   # trailing"]
        );
    }

    #[test]
    fn test_minify() {
        let input = "#!/bin/bash\n# c\nif [ -f x ]; then\n    echo  \"a  b\"   # t\nfi\n\n\nfoo() {\n  echo x\n}\n";
        assert_eq!(
            minified(input),
            "if [ -f x ];then\necho \"a  b\"\nfi\nfoo(){\necho x\n}\n"
        );
    }

    #[test]
    fn test_minify_operators() {
        assert_eq!(minified("a  &&  b  ||  c | d &\n"), "a&&b||c|d&\n");
        assert_eq!(minified("echo 2 > f 2>&1\n"), "echo 2 > f 2>&1\n");
    }

    #[test]
    fn test_minify_keeps_heredoc() {
        let input = "  cat <<EOF   # c\n  body  \nEOF\necho   done\n";
        assert_eq!(minified(input), "cat <<EOF\n  body  \nEOF\necho done\n");
    }

    #[test]
    fn test_minify_substitution_body() {
        assert_eq!(
            minified("x=$( # comment\n  echo   hi\n)\n"),
            "x=$(echo hi)\n"
        );
        assert_eq!(minified("x=$( (cd /  ) )\n"), "x=$( (cd /))\n");
    }

    #[test]
    fn test_minify_substitution_ending_in_heredoc() {
        let input = "x=$(cat <<EOF\nit's :)\nEOF\n)\n";
        assert_eq!(minified(input), input);
        assert_eq!(
            formatted(input, Printer::new().keep_padding(true)),
            vec!["x=$(cat <<EOF\nit's :)\nEOF\n)"]
        );
    }

    #[test]
    fn test_minify_is_stable() {
        let input = "#!/bin/bash\nfor i in 1 2; do\n  echo \"$i\" # loop\ndone\n";
        let once = minified(input);
        assert_eq!(minified(&once), once);
    }
}
