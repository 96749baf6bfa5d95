//! Lexer for Bash Scripts
//!
//! The lexer splits shell source into tokens that keep their raw text.
//! Nothing is unquoted or expanded: a token's `value` is exactly the slice of
//! input it covers, so statements can be printed back byte for byte.
//! It handles:
//! - Operators and delimiters
//! - Words (with quoting, `$(...)`, `${...}` and backticks)
//! - Comments
//! - Here-documents
//! - Line continuations

use std::collections::{HashMap, VecDeque};

/// Token types for bash lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // End of input
    Eof,

    // Newlines and separators
    Newline,
    Semicolon,
    Amp, // &

    // Operators
    Pipe,    // |
    PipeAmp, // |&
    AndAnd,  // &&
    OrOr,    // ||
    Bang,    // !

    // Redirections
    Less,      // <
    Great,     // >
    DLess,     // <<
    DGreat,    // >>
    LessAnd,   // <&
    GreatAnd,  // >&
    LessGreat, // <>
    DLessDash, // <<-
    Clobber,   // >|
    TLess,     // <<<
    AndGreat,  // &>
    AndDGreat, // &>>

    // Grouping
    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }

    // Case terminators
    DSemi,       // ;;
    SemiAnd,     // ;&
    SemiSemiAnd, // ;;&

    // Compound commands
    DBrackStart,   // [[
    DBrackEnd,     // ]]
    ArithCommand,  // (( ... )) as a single token

    // Reserved words
    If,
    Then,
    Else,
    Elif,
    Fi,
    For,
    While,
    Until,
    Do,
    Done,
    Case,
    Esac,
    In,
    Function,
    Select,
    Time,
    Coproc,

    // Words
    Word,
    AssignmentWord, // VAR=value

    // Comments
    Comment,

    // Here-document body, including its terminator line
    HeredocContent,
}

impl TokenType {
    /// Reserved words only act as keywords in command position; elsewhere the
    /// parser treats them as plain words.
    pub fn is_reserved_word(&self) -> bool {
        matches!(
            self,
            Self::If
                | Self::Then
                | Self::Else
                | Self::Elif
                | Self::Fi
                | Self::For
                | Self::While
                | Self::Until
                | Self::Do
                | Self::Done
                | Self::Case
                | Self::Esac
                | Self::In
                | Self::Function
                | Self::Select
                | Self::Time
                | Self::Coproc
        )
    }
}

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    /// Raw source text covered by the token
    pub value: String,
    /// Original position in input (in chars)
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
    /// Blanks and line continuations between the previous token and this one
    pub leading: String,
    /// Char ranges of the top-level `$( ... )` bodies inside `value`
    pub substitutions: Vec<(usize, usize)>,
    /// Nesting depth of the line this token sits on, assigned by the parser
    pub depth: usize,
}

impl Token {
    pub fn new(
        token_type: TokenType,
        value: impl Into<String>,
        start: usize,
        end: usize,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            token_type,
            value: value.into(),
            start,
            end,
            line,
            column,
            leading: String::new(),
            substitutions: Vec::new(),
            depth: 0,
        }
    }
}

/// Error thrown when the lexer encounters invalid input
#[derive(Debug, Clone)]
pub struct LexerError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for LexerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for LexerError {}

impl LexerError {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

/// Pending heredoc information
#[derive(Debug, Clone)]
struct PendingHeredoc {
    delimiter: String,
    strip_tabs: bool,
}

lazy_static::lazy_static! {
    /// Reserved words in bash
    static ref RESERVED_WORDS: HashMap<&'static str, TokenType> = {
        let mut m = HashMap::new();
        m.insert("if", TokenType::If);
        m.insert("then", TokenType::Then);
        m.insert("else", TokenType::Else);
        m.insert("elif", TokenType::Elif);
        m.insert("fi", TokenType::Fi);
        m.insert("for", TokenType::For);
        m.insert("while", TokenType::While);
        m.insert("until", TokenType::Until);
        m.insert("do", TokenType::Do);
        m.insert("done", TokenType::Done);
        m.insert("case", TokenType::Case);
        m.insert("esac", TokenType::Esac);
        m.insert("in", TokenType::In);
        m.insert("function", TokenType::Function);
        m.insert("select", TokenType::Select);
        m.insert("time", TokenType::Time);
        m.insert("coproc", TokenType::Coproc);
        m
    };

    /// Single-character operators
    static ref SINGLE_CHAR_OPS: HashMap<char, TokenType> = {
        let mut m = HashMap::new();
        m.insert('|', TokenType::Pipe);
        m.insert('&', TokenType::Amp);
        m.insert(';', TokenType::Semicolon);
        m.insert('(', TokenType::LParen);
        m.insert(')', TokenType::RParen);
        m.insert('<', TokenType::Less);
        m.insert('>', TokenType::Great);
        m
    };
}

/// Three-character operators
const THREE_CHAR_OPS: &[(&str, TokenType)] = &[
    (";;&", TokenType::SemiSemiAnd),
    ("<<<", TokenType::TLess),
    ("&>>", TokenType::AndDGreat),
];

/// Two-character operators
const TWO_CHAR_OPS: &[(&str, TokenType)] = &[
    ("[[", TokenType::DBrackStart),
    ("]]", TokenType::DBrackEnd),
    ("&&", TokenType::AndAnd),
    ("||", TokenType::OrOr),
    (";;", TokenType::DSemi),
    (";&", TokenType::SemiAnd),
    ("|&", TokenType::PipeAmp),
    (">>", TokenType::DGreat),
    ("<&", TokenType::LessAnd),
    (">&", TokenType::GreatAnd),
    ("<>", TokenType::LessGreat),
    (">|", TokenType::Clobber),
    ("&>", TokenType::AndGreat),
];

/// Check if a string is a valid variable name
fn is_valid_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Check if a character is a word boundary (ends a word token)
fn is_word_boundary(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | ';' | '&' | '|' | '(' | ')' | '<' | '>')
}

/// Check if a string is a valid assignment LHS: `name`, `name+`, `name[sub]` or `name[sub]+`
fn is_valid_assignment_lhs(s: &str) -> bool {
    let s = s.strip_suffix('+').unwrap_or(s);
    match s.find('[') {
        Some(open) => is_valid_name(&s[..open]) && s.ends_with(']'),
        None => is_valid_name(s),
    }
}

/// Byte index of the assignment `=` outside of brackets.
fn find_assignment_eq(s: &str) -> Option<usize> {
    let mut depth = 0i32;
    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            '=' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

fn classify_word(value: &str) -> TokenType {
    if let Some(&reserved) = RESERVED_WORDS.get(value) {
        return reserved;
    }
    match find_assignment_eq(value) {
        Some(eq) if is_valid_assignment_lhs(&value[..eq]) => TokenType::AssignmentWord,
        _ => TokenType::Word,
    }
}

/// Lexer class
pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    pending_heredocs: VecDeque<PendingHeredoc>,
    /// Whitespace skipped since the last token
    gap: String,
    /// Start of the word being read, for substitution offsets
    word_start: usize,
    substitutions: Vec<(usize, usize)>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            pending_heredocs: VecDeque::new(),
            gap: String::new(),
            word_start: 0,
            substitutions: Vec::new(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexerError> {
        let len = self.input.len();

        while self.pos < len {
            // Here-document bodies start right after the newline that ends their line
            if !self.pending_heredocs.is_empty()
                && self.tokens.last().map(|t| t.token_type) == Some(TokenType::Newline)
            {
                self.read_heredoc_content()?;
                continue;
            }

            self.skip_whitespace();

            if self.pos >= len {
                break;
            }

            let token = self.next_token()?;
            self.tokens.push(token);
        }

        if let Some(heredoc) = self.pending_heredocs.front() {
            return Err(LexerError::new(
                format!("unclosed here-document '{}'", heredoc.delimiter),
                self.line,
                self.column,
            ));
        }

        let eof = self.make_token(TokenType::Eof, self.pos, self.line, self.column);
        self.tokens.push(eof);

        Ok(self.tokens)
    }

    fn current(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.input[start..end].iter().collect()
    }

    fn make_token(&mut self, token_type: TokenType, start: usize, line: usize, column: usize) -> Token {
        let mut token = Token::new(token_type, self.slice(start, self.pos), start, self.pos, line, column);
        token.leading = std::mem::take(&mut self.gap);
        token.substitutions = std::mem::take(&mut self.substitutions);
        token
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current() {
            match c {
                ' ' | '\t' | '\r' => {
                    self.gap.push(c);
                    self.advance();
                }
                '\\' if self.peek(1) == Some('\n') => {
                    // Line continuation
                    self.gap.push_str("\\\n");
                    self.advance_by(2);
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, LexerError> {
        let start_line = self.line;
        let start_column = self.column;
        let start_pos = self.pos;

        let c0 = match self.current() {
            Some(c) => c,
            None => return Ok(self.make_token(TokenType::Eof, start_pos, start_line, start_column)),
        };
        let c1 = self.peek(1);
        let c2 = self.peek(2);

        if c0 == '#' {
            while self.current().is_some_and(|c| c != '\n') {
                self.advance();
            }
            return Ok(self.make_token(TokenType::Comment, start_pos, start_line, start_column));
        }

        if c0 == '\n' {
            self.advance();
            return Ok(self.make_token(TokenType::Newline, start_pos, start_line, start_column));
        }

        if c0 == '(' && c1 == Some('(') {
            return self.read_arith_command(start_pos, start_line, start_column);
        }

        // Special case: <<- (heredoc with tab stripping)
        if c0 == '<' && c1 == Some('<') && c2 == Some('-') {
            self.advance_by(3);
            self.register_heredoc(true);
            return Ok(self.make_token(TokenType::DLessDash, start_pos, start_line, start_column));
        }

        for (op_str, token_type) in THREE_CHAR_OPS {
            let chars: Vec<char> = op_str.chars().collect();
            if c0 == chars[0] && c1 == Some(chars[1]) && c2 == Some(chars[2]) {
                self.advance_by(3);
                return Ok(self.make_token(*token_type, start_pos, start_line, start_column));
            }
        }

        // Special case: << (heredoc)
        if c0 == '<' && c1 == Some('<') {
            self.advance_by(2);
            self.register_heredoc(false);
            return Ok(self.make_token(TokenType::DLess, start_pos, start_line, start_column));
        }

        for (op_str, token_type) in TWO_CHAR_OPS {
            let chars: Vec<char> = op_str.chars().collect();
            if c0 == chars[0] && c1 == Some(chars[1]) {
                // [[ and ]] are only operators when they stand alone
                if matches!(token_type, TokenType::DBrackStart | TokenType::DBrackEnd)
                    && c2.is_some_and(|after| !is_word_boundary(after))
                {
                    break;
                }
                self.advance_by(2);
                return Ok(self.make_token(*token_type, start_pos, start_line, start_column));
            }
        }

        if let Some(&token_type) = SINGLE_CHAR_OPS.get(&c0) {
            self.advance();
            return Ok(self.make_token(token_type, start_pos, start_line, start_column));
        }

        match c0 {
            // { must be followed by whitespace to be a group start
            '{' if c1.map_or(true, char::is_whitespace) => {
                self.advance();
                Ok(self.make_token(TokenType::LBrace, start_pos, start_line, start_column))
            }
            '}' if c1.map_or(true, is_word_boundary) => {
                self.advance();
                Ok(self.make_token(TokenType::RBrace, start_pos, start_line, start_column))
            }
            '!' if c1.map_or(true, is_word_boundary) => {
                self.advance();
                Ok(self.make_token(TokenType::Bang, start_pos, start_line, start_column))
            }
            _ => self.read_word(start_pos, start_line, start_column),
        }
    }

    fn read_word(&mut self, start: usize, line: usize, column: usize) -> Result<Token, LexerError> {
        self.word_start = start;

        while let Some(c) = self.current() {
            match c {
                '\\' => {
                    self.advance();
                    self.advance();
                }
                '\'' => self.skip_single_quoted()?,
                '"' => self.skip_double_quoted(true)?,
                '`' => self.skip_backtick()?,
                '$' => self.skip_dollar(true)?,
                // Extglob: @(...), *(...), +(...), ?(...), !(...)
                '(' if self.pos > start && matches!(self.input[self.pos - 1], '@' | '*' | '+' | '?' | '!') => {
                    self.skip_parens()?
                }
                '[' if is_valid_name(&self.slice(start, self.pos)) => self.skip_subscript(),
                c if is_word_boundary(c) => break,
                _ => {
                    self.advance();
                }
            }
        }

        let token_type = classify_word(&self.slice(start, self.pos));
        Ok(self.make_token(token_type, start, line, column))
    }

    /// `(( ... ))` is kept whole; its contents are arithmetic, not commands.
    fn read_arith_command(&mut self, start: usize, line: usize, column: usize) -> Result<Token, LexerError> {
        self.skip_parens()?;
        Ok(self.make_token(TokenType::ArithCommand, start, line, column))
    }

    fn skip_single_quoted(&mut self) -> Result<(), LexerError> {
        let (line, column) = (self.line, self.column);
        self.advance();
        while let Some(c) = self.advance() {
            if c == '\'' {
                return Ok(());
            }
        }
        Err(LexerError::new("unterminated single quote", line, column))
    }

    /// `$'...'`, positioned on the quote
    fn skip_ansi_quoted(&mut self) -> Result<(), LexerError> {
        let (line, column) = (self.line, self.column);
        self.advance();
        while let Some(c) = self.advance() {
            match c {
                '\\' => {
                    self.advance();
                }
                '\'' => return Ok(()),
                _ => {}
            }
        }
        Err(LexerError::new("unterminated $'' quote", line, column))
    }

    fn skip_double_quoted(&mut self, record: bool) -> Result<(), LexerError> {
        let (line, column) = (self.line, self.column);
        self.advance();
        while let Some(c) = self.current() {
            match c {
                '\\' => {
                    self.advance();
                    self.advance();
                }
                '"' => {
                    self.advance();
                    return Ok(());
                }
                '`' => self.skip_backtick()?,
                '$' if matches!(self.peek(1), Some('(' | '{')) => self.skip_dollar(record)?,
                _ => {
                    self.advance();
                }
            }
        }
        Err(LexerError::new("unterminated double quote", line, column))
    }

    fn skip_backtick(&mut self) -> Result<(), LexerError> {
        let (line, column) = (self.line, self.column);
        self.advance();
        while let Some(c) = self.advance() {
            match c {
                '\\' => {
                    self.advance();
                }
                '`' => return Ok(()),
                _ => {}
            }
        }
        Err(LexerError::new("unterminated backquote", line, column))
    }

    /// Positioned on `$`. Records `$(` bodies when `record` is set so the
    /// printer can minify them later.
    fn skip_dollar(&mut self, record: bool) -> Result<(), LexerError> {
        match self.peek(1) {
            Some('(') => {
                let (line, column) = (self.line, self.column);
                self.advance_by(2);
                let arithmetic = self.current() == Some('(');
                let body_start = self.pos;
                self.scan_command_substitution(line, column, arithmetic)?;
                if record && !arithmetic {
                    self.substitutions
                        .push((body_start - self.word_start, self.pos - 1 - self.word_start));
                }
                Ok(())
            }
            Some('{') => {
                self.advance_by(2);
                self.skip_braced()
            }
            Some('\'') => {
                self.advance();
                self.skip_ansi_quoted()
            }
            Some('"') => {
                self.advance();
                self.skip_double_quoted(record)
            }
            _ => {
                self.advance();
                Ok(())
            }
        }
    }

    /// Positioned just after `$(`; stops after the matching `)`. Here-document
    /// bodies opened inside are skipped as raw lines.
    fn scan_command_substitution(
        &mut self,
        line: usize,
        column: usize,
        arithmetic: bool,
    ) -> Result<(), LexerError> {
        let mut depth = 1usize;
        let mut heredocs: Vec<PendingHeredoc> = Vec::new();
        let mut word = String::new();
        let mut case_depth = 0usize;
        let mut in_case_pattern = false;
        let mut at_word_start = true;

        while let Some(c) = self.current() {
            if c.is_ascii_alphanumeric() || c == '_' {
                word.push(c);
                self.advance();
                at_word_start = false;
                continue;
            }

            match word.as_str() {
                "case" => {
                    case_depth += 1;
                    in_case_pattern = false;
                }
                "in" if case_depth > 0 => in_case_pattern = true,
                "esac" if case_depth > 0 => {
                    case_depth -= 1;
                    in_case_pattern = false;
                }
                _ => {}
            }
            word.clear();

            match c {
                '\\' => {
                    self.advance();
                    self.advance();
                }
                '\'' => self.skip_single_quoted()?,
                '"' => self.skip_double_quoted(false)?,
                '`' => self.skip_backtick()?,
                '$' => self.skip_dollar(false)?,
                '#' if at_word_start => {
                    while self.current().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                '(' => {
                    if !in_case_pattern {
                        depth += 1;
                    }
                    self.advance();
                }
                ')' => {
                    self.advance();
                    if in_case_pattern {
                        in_case_pattern = false;
                    } else {
                        depth -= 1;
                        if depth == 0 {
                            return Ok(());
                        }
                    }
                }
                '<' if !arithmetic
                    && self.peek(1) == Some('<')
                    && self.peek(2) != Some('<') =>
                {
                    let strip_tabs = self.peek(2) == Some('-');
                    self.advance_by(if strip_tabs { 3 } else { 2 });
                    heredocs.extend(self.heredoc_delimiter(self.pos, strip_tabs));
                }
                '\n' if !heredocs.is_empty() => {
                    self.advance();
                    for heredoc in heredocs.drain(..) {
                        self.skip_heredoc_body(&heredoc, self.line, self.column)?;
                    }
                }
                ';' => {
                    self.advance();
                    if case_depth > 0 && self.current() == Some(';') {
                        self.advance();
                        in_case_pattern = true;
                    }
                }
                _ => {
                    self.advance();
                }
            }

            at_word_start = matches!(c, ' ' | '\t' | '\n' | ';' | '(' | '|' | '&');
        }

        Err(LexerError::new("unterminated command substitution", line, column))
    }

    /// Positioned just after `${`; stops after the matching `}`.
    fn skip_braced(&mut self) -> Result<(), LexerError> {
        let (line, column) = (self.line, self.column);
        let mut depth = 1usize;
        while let Some(c) = self.current() {
            match c {
                '\\' => {
                    self.advance();
                    self.advance();
                }
                '\'' => self.skip_single_quoted()?,
                '"' => self.skip_double_quoted(false)?,
                '`' => self.skip_backtick()?,
                '$' => self.skip_dollar(false)?,
                '{' => {
                    depth += 1;
                    self.advance();
                }
                '}' => {
                    self.advance();
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
        Err(LexerError::new("unterminated parameter expansion", line, column))
    }

    /// Positioned on `(`; stops after the matching `)`.
    fn skip_parens(&mut self) -> Result<(), LexerError> {
        let (line, column) = (self.line, self.column);
        let mut depth = 0usize;
        while let Some(c) = self.current() {
            match c {
                '\\' => {
                    self.advance();
                    self.advance();
                }
                '\'' => self.skip_single_quoted()?,
                '"' => self.skip_double_quoted(false)?,
                '`' => self.skip_backtick()?,
                '$' => self.skip_dollar(false)?,
                '(' => {
                    depth += 1;
                    self.advance();
                }
                ')' => {
                    self.advance();
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
        Err(LexerError::new("unterminated parenthesis", line, column))
    }

    /// Array subscript after a name: `arr[i + 1]=x`. Only consumed when the
    /// closing bracket sits on the same line.
    fn skip_subscript(&mut self) {
        let mut depth = 0usize;
        let mut end = None;
        for (offset, &c) in self.input[self.pos..].iter().enumerate() {
            match c {
                '\n' => break,
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(offset + 1);
                        break;
                    }
                }
                _ => {}
            }
        }
        self.advance_by(end.unwrap_or(1));
    }

    fn read_heredoc_content(&mut self) -> Result<(), LexerError> {
        while let Some(heredoc) = self.pending_heredocs.pop_front() {
            let (start, line, column) = (self.pos, self.line, self.column);
            self.skip_heredoc_body(&heredoc, line, column)?;
            let token = self.make_token(TokenType::HeredocContent, start, line, column);
            self.tokens.push(token);
        }
        Ok(())
    }

    /// Consume body lines up to and including the delimiter line.
    fn skip_heredoc_body(
        &mut self,
        heredoc: &PendingHeredoc,
        line: usize,
        column: usize,
    ) -> Result<(), LexerError> {
        loop {
            if self.pos >= self.input.len() {
                return Err(LexerError::new(
                    format!("unclosed here-document '{}'", heredoc.delimiter),
                    line,
                    column,
                ));
            }

            let line_start = self.pos;
            while self.current().is_some_and(|c| c != '\n') {
                self.advance();
            }
            let text = self.slice(line_start, self.pos);
            let text = text.trim_end_matches('\r');
            let candidate = if heredoc.strip_tabs {
                text.trim_start_matches('\t')
            } else {
                text
            };
            let done = candidate == heredoc.delimiter;

            // Consume the newline
            self.advance();
            if done {
                return Ok(());
            }
        }
    }

    fn register_heredoc(&mut self, strip_tabs: bool) {
        if let Some(heredoc) = self.heredoc_delimiter(self.pos, strip_tabs) {
            self.pending_heredocs.push_back(heredoc);
        }
    }

    /// Read the delimiter word starting at `pos` without consuming it.
    fn heredoc_delimiter(&self, mut pos: usize, strip_tabs: bool) -> Option<PendingHeredoc> {
        while matches!(self.input.get(pos), Some(' ' | '\t')) {
            pos += 1;
        }

        let mut delimiter = String::new();
        while let Some(&c) = self.input.get(pos) {
            if c.is_whitespace() || matches!(c, ';' | '<' | '>' | '&' | '|' | '(' | ')') {
                break;
            }
            match c {
                '\'' | '"' => {
                    pos += 1;
                    while let Some(&q) = self.input.get(pos) {
                        pos += 1;
                        if q == c {
                            break;
                        }
                        delimiter.push(q);
                    }
                }
                '\\' => {
                    pos += 1;
                    if let Some(&escaped) = self.input.get(pos) {
                        delimiter.push(escaped);
                        pos += 1;
                    }
                }
                _ => {
                    delimiter.push(c);
                    pos += 1;
                }
            }
        }

        if delimiter.is_empty() {
            None
        } else {
            Some(PendingHeredoc {
                delimiter,
                strip_tabs,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(input: &str) -> Vec<TokenType> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token_type)
            .collect()
    }

    #[test]
    fn test_simple_command() {
        let tokens = Lexer::new("echo hello").tokenize().unwrap();
        assert_eq!(tokens.len(), 3); // echo, hello, EOF
        assert_eq!(tokens[0].token_type, TokenType::Word);
        assert_eq!(tokens[0].value, "echo");
        assert_eq!(tokens[1].value, "hello");
        assert_eq!(tokens[1].leading, " ");
    }

    #[test]
    fn test_pipeline() {
        let tokens = Lexer::new("cat file | grep pattern").tokenize().unwrap();
        assert_eq!(tokens[2].token_type, TokenType::Pipe);
    }

    #[test]
    fn test_redirection() {
        assert_eq!(
            types("echo hello 2>&1 > file.txt"),
            vec![
                TokenType::Word,
                TokenType::Word,
                TokenType::Word,
                TokenType::GreatAnd,
                TokenType::Word,
                TokenType::Great,
                TokenType::Word,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_assignment() {
        let tokens = Lexer::new("VAR=value arr[1]=x n+=2 =nope").tokenize().unwrap();
        assert_eq!(tokens[0].token_type, TokenType::AssignmentWord);
        assert_eq!(tokens[0].value, "VAR=value");
        assert_eq!(tokens[1].token_type, TokenType::AssignmentWord);
        assert_eq!(tokens[2].token_type, TokenType::AssignmentWord);
        assert_eq!(tokens[3].token_type, TokenType::Word);
    }

    #[test]
    fn test_quotes_are_kept_raw() {
        let tokens = Lexer::new("echo \"hello world\" 'a b'").tokenize().unwrap();
        assert_eq!(tokens[1].value, "\"hello world\"");
        assert_eq!(tokens[2].value, "'a b'");
    }

    #[test]
    fn test_reserved_words() {
        let tokens = Lexer::new("if then else fi").tokenize().unwrap();
        assert_eq!(tokens[0].token_type, TokenType::If);
        assert_eq!(tokens[1].token_type, TokenType::Then);
        assert_eq!(tokens[2].token_type, TokenType::Else);
        assert_eq!(tokens[3].token_type, TokenType::Fi);
    }

    #[test]
    fn test_heredoc() {
        let tokens = Lexer::new("cat <<EOF\nhello\nEOF\necho done\n").tokenize().unwrap();
        assert_eq!(tokens[1].token_type, TokenType::DLess);
        let heredoc = tokens
            .iter()
            .find(|t| t.token_type == TokenType::HeredocContent)
            .unwrap();
        assert_eq!(heredoc.value, "hello\nEOF\n");
        assert_eq!(tokens.last().unwrap().token_type, TokenType::Eof);
    }

    #[test]
    fn test_heredoc_with_tabs_and_quoted_delimiter() {
        let tokens = Lexer::new("cat <<-'END'\n\t$x source y\n\tEND\n").tokenize().unwrap();
        let heredoc = tokens
            .iter()
            .find(|t| t.token_type == TokenType::HeredocContent)
            .unwrap();
        assert_eq!(heredoc.value, "\t$x source y\n\tEND\n");
    }

    #[test]
    fn test_unclosed_heredoc() {
        let err = Lexer::new("cat <<EOF\nhello\n").tokenize().unwrap_err();
        assert!(err.message.contains("unclosed here-document"));
    }

    #[test]
    fn test_comment() {
        let tokens = Lexer::new("echo hello # this is a comment").tokenize().unwrap();
        let comment = tokens.iter().find(|t| t.token_type == TokenType::Comment).unwrap();
        assert_eq!(comment.value, "# this is a comment");
    }

    #[test]
    fn test_hash_inside_word_is_not_a_comment() {
        let tokens = Lexer::new("echo a#b ${#x}").tokenize().unwrap();
        assert!(tokens.iter().all(|t| t.token_type != TokenType::Comment));
    }

    #[test]
    fn test_arithmetic() {
        let tokens = Lexer::new("(( x + (1) ))").tokenize().unwrap();
        assert_eq!(tokens[0].token_type, TokenType::ArithCommand);
        assert_eq!(tokens[0].value, "(( x + (1) ))");
    }

    #[test]
    fn test_conditional() {
        let tokens = Lexer::new("[[ -f file ]]").tokenize().unwrap();
        assert_eq!(tokens[0].token_type, TokenType::DBrackStart);
        assert_eq!(tokens[3].token_type, TokenType::DBrackEnd);
    }

    #[test]
    fn test_command_substitution_is_one_word() {
        let tokens = Lexer::new("x=$(source \"lib.sh\") y").tokenize().unwrap();
        assert_eq!(tokens[0].value, "x=$(source \"lib.sh\")");
        assert_eq!(tokens[0].substitutions, vec![(4, 19)]);
        assert_eq!(tokens[1].value, "y");
    }

    #[test]
    fn test_command_substitution_with_case_and_comment() {
        let input = "v=$(case $a in\n  x) echo ')' ;; # )\nesac)";
        let tokens = Lexer::new(input).tokenize().unwrap();
        assert_eq!(tokens[0].value, input);
    }

    #[test]
    fn test_heredoc_inside_command_substitution() {
        let tokens = Lexer::new("x=$(cat <<EOF\nit's :)\nEOF\n)\necho after\n")
            .tokenize()
            .unwrap();
        assert_eq!(tokens[0].token_type, TokenType::AssignmentWord);
        assert_eq!(tokens[0].value, "x=$(cat <<EOF\nit's :)\nEOF\n)");
        assert_eq!(tokens[0].substitutions, vec![(4, 26)]);
        assert_eq!(tokens[1].token_type, TokenType::Newline);
        assert_eq!(tokens[2].value, "echo");
        assert_eq!(tokens[2].line, 5);
    }

    #[test]
    fn test_tab_stripped_heredoc_inside_command_substitution() {
        let tokens = Lexer::new("v=$(cat <<-'END' | tr a b\n\t(unbalanced\n\tEND\n)")
            .tokenize()
            .unwrap();
        assert_eq!(tokens[0].value, "v=$(cat <<-'END' | tr a b\n\t(unbalanced\n\tEND\n)");
    }

    #[test]
    fn test_shift_in_arithmetic_is_not_a_heredoc() {
        let tokens = Lexer::new("echo $((1 << 2))\necho next\n").tokenize().unwrap();
        assert_eq!(tokens[1].value, "$((1 << 2))");
        assert_eq!(tokens[3].value, "echo");
    }

    #[test]
    fn test_unclosed_heredoc_inside_command_substitution() {
        let err = Lexer::new("x=$(cat <<EOF\nbody\n)\n").tokenize().unwrap_err();
        assert!(err.message.contains("unclosed here-document"));
    }

    #[test]
    fn test_arithmetic_expansion_is_not_recorded() {
        let tokens = Lexer::new("echo $((1 + 2))").tokenize().unwrap();
        assert_eq!(tokens[1].value, "$((1 + 2))");
        assert!(tokens[1].substitutions.is_empty());
    }

    #[test]
    fn test_line_continuation_is_leading_gap() {
        let tokens = Lexer::new("echo a \\\n  b").tokenize().unwrap();
        assert_eq!(tokens[2].value, "b");
        assert_eq!(tokens[2].leading, " \\\n  ");
    }

    #[test]
    fn test_braces() {
        assert_eq!(
            types("f() { echo {a,b}; }"),
            vec![
                TokenType::Word,
                TokenType::LParen,
                TokenType::RParen,
                TokenType::LBrace,
                TokenType::Word,
                TokenType::Word,
                TokenType::Semicolon,
                TokenType::RBrace,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_quote() {
        let err = Lexer::new("echo \"oops\n").tokenize().unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("double quote"));
    }

    #[test]
    fn test_unterminated_substitution() {
        let err = Lexer::new("x=$(echo").tokenize().unwrap_err();
        assert!(err.message.contains("command substitution"));
    }
}
