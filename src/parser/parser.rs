//! Statement Parser for Bash Scripts
//!
//! This parser consumes tokens from the lexer and groups them into top-level
//! statements. It does not build a typed command tree; it tracks just enough
//! structure to know where a statement ends and how deeply each line is nested.
//!
//! Structure tracked:
//!   if ... then ... [elif ... then ...] [else ...] fi
//!   for|while|until|select ... do ... done
//!   case word in [(]pattern[|pattern]) list ;; ... esac
//!   { list; }      ( list )
//!
//! Reserved words are only keywords in command position, so `echo done` is a
//! plain command and does not close anything.

use crate::ast::types::{ScriptNode, StatementNode};
use crate::parser::lexer::{Lexer, Token, TokenType};
use crate::parser::types::{
    is_redirection_token, starts_command_position, ParseException, MAX_INPUT_SIZE, MAX_TOKENS,
};

/// Options controlling what the parser keeps
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Keep comment tokens (standalone comment lines become statements)
    pub keep_comments: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaseState {
    /// Between `case` and `in`
    Head,
    /// Reading patterns up to `)`
    Pattern,
    /// Inside an item's command list
    Body,
}

/// An open compound construct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    If,
    /// `for`/`while`/`until`/`select` waiting for `do`
    Loop,
    Do,
    Case(CaseState),
    Brace,
    Paren,
}

impl Frame {
    fn describe(&self) -> &'static str {
        match self {
            Frame::If => "`if`",
            Frame::Loop => "loop without `do`",
            Frame::Do => "`do`",
            Frame::Case(_) => "`case`",
            Frame::Brace => "`{`",
            Frame::Paren => "`(`",
        }
    }

    /// Case item bodies sit one level deeper than their patterns
    fn weight(&self) -> usize {
        match self {
            Frame::Case(CaseState::Body) => 2,
            _ => 1,
        }
    }
}

/// Main parser struct
pub struct Parser {
    options: ParseOptions,
    frames: Vec<Frame>,
    command_position: bool,
    /// The next word is the name following `function`
    after_function_keyword: bool,
    /// `{` may open a group even outside command position (`function name {`)
    brace_allowed: bool,
    /// The next word is a redirection target
    redirect_target: bool,
    pending_heredocs: usize,
    current: Vec<Token>,
    statements: Vec<StatementNode>,
    blank_lines: usize,
    /// The previous statement ended on `;` or `&`, so the next newline only ends its line
    line_open: bool,
}

impl Parser {
    /// Create a new parser instance
    pub fn new(options: ParseOptions) -> Self {
        Parser {
            options,
            frames: Vec::new(),
            command_position: true,
            after_function_keyword: false,
            brace_allowed: false,
            redirect_target: false,
            pending_heredocs: 0,
            current: Vec::new(),
            statements: Vec::new(),
            blank_lines: 0,
            line_open: false,
        }
    }

    /// Parse a bash script string
    pub fn parse(&mut self, input: &str) -> Result<ScriptNode, ParseException> {
        if input.len() > MAX_INPUT_SIZE {
            return Err(ParseException::new(
                format!(
                    "Input too large: {} bytes exceeds limit of {}",
                    input.len(),
                    MAX_INPUT_SIZE
                ),
                1,
                1,
            ));
        }

        *self = Parser::new(self.options);

        let tokens = Lexer::new(input).tokenize()?;
        if tokens.len() > MAX_TOKENS {
            return Err(ParseException::new(
                format!("Too many tokens: {} exceeds limit of {}", tokens.len(), MAX_TOKENS),
                1,
                1,
            ));
        }

        for token in tokens {
            if token.token_type == TokenType::Eof {
                if let Some(frame) = self.frames.last() {
                    return Err(ParseException::at_token(
                        format!("unexpected end of file: {} is not closed", frame.describe()),
                        &token,
                    ));
                }
                self.finish_statement();
                break;
            }
            self.step(token)?;
        }

        Ok(ScriptNode::new(std::mem::take(&mut self.statements)))
    }

    fn depth(&self) -> usize {
        self.frames.iter().map(Frame::weight).sum()
    }

    fn at_top_level(&self) -> bool {
        self.frames.is_empty() && self.pending_heredocs == 0
    }

    fn push(&mut self, mut token: Token, depth: usize) {
        token.depth = depth;
        self.current.push(token);
        self.line_open = false;
    }

    fn finish_statement(&mut self) {
        if !self.current.is_empty() {
            let blank_before = self.blank_lines > 0 && !self.statements.is_empty();
            let tokens = std::mem::take(&mut self.current);
            self.statements.push(StatementNode::new(tokens, blank_before));
        }
        self.blank_lines = 0;
        self.command_position = true;
        self.after_function_keyword = false;
        self.brace_allowed = false;
        self.redirect_target = false;
    }

    fn step(&mut self, token: Token) -> Result<(), ParseException> {
        match token.token_type {
            TokenType::Comment => {
                if self.options.keep_comments {
                    let depth = self.depth();
                    self.push(token, depth);
                }
                return Ok(());
            }
            TokenType::Newline => {
                if self.at_top_level() {
                    if !self.current.is_empty() {
                        self.finish_statement();
                    } else if self.line_open {
                        self.line_open = false;
                    } else {
                        self.blank_lines += 1;
                    }
                } else {
                    self.push(token, 0);
                    self.command_position = true;
                }
                return Ok(());
            }
            TokenType::HeredocContent => {
                self.pending_heredocs = self.pending_heredocs.saturating_sub(1);
                self.push(token, 0);
                if self.at_top_level() {
                    self.finish_statement();
                }
                return Ok(());
            }
            _ => {}
        }

        if let Some(Frame::Case(state)) = self.frames.last().copied() {
            if state != CaseState::Body {
                return self.step_case_head(token, state);
            }
            if matches!(
                token.token_type,
                TokenType::DSemi | TokenType::SemiAnd | TokenType::SemiSemiAnd
            ) {
                let depth = self.depth();
                self.set_case_state(CaseState::Pattern);
                self.push(token, depth);
                return Ok(());
            }
        }

        let tt = token.token_type;
        let keyword = self.command_position && tt.is_reserved_word();
        let mut depth = self.depth();
        // Whether the token acted as syntax rather than as a plain word
        let mut structural = true;

        match tt {
            TokenType::If if keyword => self.frames.push(Frame::If),
            TokenType::Then | TokenType::Elif | TokenType::Else if keyword => {
                self.expect_top(Frame::If, &token)?;
                depth -= 1;
            }
            TokenType::Fi if keyword => {
                self.expect_top(Frame::If, &token)?;
                self.frames.pop();
                depth = self.depth();
            }
            TokenType::For | TokenType::While | TokenType::Until | TokenType::Select if keyword => {
                self.frames.push(Frame::Loop)
            }
            TokenType::Do if keyword => {
                self.expect_top(Frame::Loop, &token)?;
                self.frames.pop();
                self.frames.push(Frame::Do);
                depth -= 1;
            }
            TokenType::Done if keyword => {
                self.expect_top(Frame::Do, &token)?;
                self.frames.pop();
                depth = self.depth();
            }
            TokenType::Case if keyword => self.frames.push(Frame::Case(CaseState::Head)),
            TokenType::Esac if keyword => {
                match self.frames.last() {
                    Some(Frame::Case(_)) => {
                        self.frames.pop();
                    }
                    _ => return Err(unexpected(&token)),
                }
                depth = self.depth();
            }
            TokenType::LBrace if self.command_position || self.brace_allowed => {
                self.frames.push(Frame::Brace)
            }
            TokenType::RBrace if self.command_position => {
                self.expect_top(Frame::Brace, &token)?;
                self.frames.pop();
                depth = self.depth();
            }
            TokenType::LParen => self.frames.push(Frame::Paren),
            TokenType::RParen => {
                self.expect_top(Frame::Paren, &token)?;
                self.frames.pop();
                depth = self.depth();
            }
            TokenType::DSemi | TokenType::SemiAnd | TokenType::SemiSemiAnd => {
                return Err(unexpected(&token));
            }
            TokenType::Function if keyword => {}
            _ => structural = false,
        }

        self.update_command_position(tt, keyword, structural);

        let ends_statement = self.at_top_level()
            && matches!(tt, TokenType::Semicolon | TokenType::Amp);
        if tt != TokenType::Semicolon || !ends_statement {
            self.push(token, depth);
        }
        if ends_statement {
            self.finish_statement();
            self.line_open = true;
        }
        Ok(())
    }

    /// Tokens between `case` and `in`, and pattern lists up to `)`.
    fn step_case_head(&mut self, token: Token, state: CaseState) -> Result<(), ParseException> {
        let depth = self.depth();
        match (state, token.token_type) {
            (CaseState::Head, TokenType::In) => self.set_case_state(CaseState::Pattern),
            (CaseState::Pattern, TokenType::Esac) => {
                self.frames.pop();
                let depth = self.depth();
                self.push(token, depth);
                self.command_position = false;
                return Ok(());
            }
            (CaseState::Pattern, TokenType::RParen) => {
                self.set_case_state(CaseState::Body);
                self.push(token, depth);
                self.command_position = true;
                return Ok(());
            }
            _ => {}
        }
        self.push(token, depth);
        self.command_position = false;
        Ok(())
    }

    fn set_case_state(&mut self, state: CaseState) {
        if let Some(frame) = self.frames.last_mut() {
            *frame = Frame::Case(state);
        }
    }

    fn expect_top(&self, frame: Frame, token: &Token) -> Result<(), ParseException> {
        if self.frames.last() == Some(&frame) {
            Ok(())
        } else {
            Err(unexpected(token))
        }
    }

    fn update_command_position(&mut self, tt: TokenType, keyword: bool, structural: bool) {
        let naming_function = std::mem::take(&mut self.after_function_keyword);
        self.brace_allowed = false;

        if self.redirect_target && !is_redirection_token(tt) {
            self.redirect_target = false;
            return;
        }
        if is_redirection_token(tt) {
            self.redirect_target = true;
            if matches!(tt, TokenType::DLess | TokenType::DLessDash) {
                self.pending_heredocs += 1;
            }
            return;
        }

        match tt {
            TokenType::Function if keyword => {
                self.after_function_keyword = true;
                self.command_position = false;
            }
            TokenType::AssignmentWord if self.command_position => {}
            TokenType::LBrace | TokenType::RBrace => {
                self.command_position = structural && tt == TokenType::LBrace;
            }
            _ if tt.is_reserved_word() && !keyword => {
                self.command_position = false;
                self.brace_allowed = naming_function;
            }
            _ if starts_command_position(tt) => self.command_position = true,
            _ => {
                self.command_position = false;
                self.brace_allowed = naming_function;
            }
        }
    }
}

fn unexpected(token: &Token) -> ParseException {
    ParseException::at_token(format!("unexpected `{}`", token.value), token)
}

/// Parse a script, keeping comments
pub fn parse(input: &str) -> Result<ScriptNode, ParseException> {
    parse_script(input, ParseOptions { keep_comments: true })
}

/// Parse a script with explicit options
pub fn parse_script(input: &str, options: ParseOptions) -> Result<ScriptNode, ParseException> {
    Parser::new(options).parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement_texts(input: &str) -> Vec<String> {
        parse(input)
            .unwrap()
            .statements
            .iter()
            .map(|s| {
                s.tokens
                    .iter()
                    .map(|t| t.value.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    #[test]
    fn test_simple_statements() {
        assert_eq!(
            statement_texts("echo a\necho b; echo c &\n"),
            vec!["echo a", "echo b", "echo c &"]
        );
    }

    #[test]
    fn test_if_is_one_statement() {
        let script = parse("if [ -f x ]; then\n  echo yes\nelse\n  echo no\nfi\necho after\n").unwrap();
        assert_eq!(script.statements.len(), 2);
        let first = &script.statements[0];
        assert_eq!(first.tokens.first().unwrap().token_type, TokenType::If);
        assert_eq!(first.tokens.last().unwrap().token_type, TokenType::Fi);
    }

    #[test]
    fn test_nesting_depths() {
        let script = parse("for f in a b; do\n  if x; then\n    y\n  fi\ndone\n").unwrap();
        let tokens = &script.statements[0].tokens;
        let depth_of = |value: &str| tokens.iter().find(|t| t.value == value).unwrap().depth;
        assert_eq!(depth_of("for"), 0);
        assert_eq!(depth_of("if"), 1);
        assert_eq!(depth_of("y"), 2);
        assert_eq!(depth_of("fi"), 1);
        assert_eq!(depth_of("done"), 0);
    }

    #[test]
    fn test_keywords_as_arguments() {
        assert_eq!(
            statement_texts("echo done fi esac\necho }\n"),
            vec!["echo done fi esac", "echo }"]
        );
    }

    #[test]
    fn test_functions() {
        let script = parse("f() {\n  echo f\n}\nfunction g {\n  echo g\n}\ng\n").unwrap();
        assert_eq!(script.statements.len(), 3);
    }

    #[test]
    fn test_case() {
        let input = "case \"$1\" in\n  (a|b) echo ab ;;\n  c)\n    echo c\n    ;;\n  *) echo other;;\nesac\necho next\n";
        let script = parse(input).unwrap();
        assert_eq!(script.statements.len(), 2);
        let tokens = &script.statements[0].tokens;
        let depth_of = |value: &str| tokens.iter().find(|t| t.value == value).unwrap().depth;
        assert_eq!(depth_of("c"), 1);
        assert_eq!(depth_of("echo"), 2);
        assert_eq!(depth_of("esac"), 0);
    }

    #[test]
    fn test_heredoc_stays_with_statement() {
        let script = parse("cat <<EOF; echo x\nif\nEOF\necho y\n").unwrap();
        assert_eq!(script.statements.len(), 2);
        let first = &script.statements[0];
        assert_eq!(
            first.tokens.last().unwrap().token_type,
            TokenType::HeredocContent
        );
        assert_eq!(first.tokens.last().unwrap().value, "if\nEOF\n");
    }

    #[test]
    fn test_comments() {
        let input = "#!/bin/bash\n# lead\necho a # trailing\n";
        assert_eq!(
            statement_texts(input),
            vec!["#!/bin/bash", "# lead", "echo a # trailing"]
        );
        let script = parse_script(input, ParseOptions::default()).unwrap();
        assert_eq!(script.statements.len(), 1);
        assert_eq!(script.statements[0].tokens.len(), 2);
    }

    #[test]
    fn test_blank_lines() {
        let script = parse("echo a\n\n\necho b\necho c; \necho d\n").unwrap();
        let blanks: Vec<bool> = script.statements.iter().map(|s| s.blank_before).collect();
        assert_eq!(blanks, vec![false, true, false, false]);
    }

    #[test]
    fn test_unclosed_if() {
        let err = parse("if true; then\n  echo\n").unwrap_err();
        assert!(err.message.contains("`if` is not closed"), "{}", err.message);
    }

    #[test]
    fn test_unexpected_closers() {
        assert!(parse("fi\n").is_err());
        assert!(parse("echo a)\n").is_err());
        assert!(parse("while true; done\n").is_err());
        assert!(parse("echo ;;\n").is_err());
    }

    #[test]
    fn test_subshell_and_group() {
        assert_eq!(
            statement_texts("(cd /tmp; ls)\n{ echo a; echo b; } > out\n"),
            vec!["( cd /tmp ; ls )", "{ echo a ; echo b ; } > out"]
        );
    }

    #[test]
    fn test_heredoc_in_substitution_is_one_statement() {
        let script = parse("usage=$(cat <<EOF\ndon't :)\nEOF\n)\necho \"$usage\"\n").unwrap();
        assert_eq!(script.statements.len(), 2);
        assert_eq!(script.statements[0].tokens.len(), 1);
    }

    #[test]
    fn test_lexer_errors_become_parse_errors() {
        let err = parse("echo 'oops\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.to_string().starts_with("line 1:"));
    }
}
