//! Lexer (tokenizer) for C-minus source code
//!
//! Produces the `(line, kind, lexeme)` token stream the predictive parser
//! consumes through [`TokenSource`]. Comments and whitespace come out as trivia
//! tokens, and malformed input comes out as `ERROR` tokens while the matching
//! [`LexicalError`] is collected on the side. The stream ends with a single EOF
//! token whose lexeme is `$`.

use std::fmt;

/// Token category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Num,
    Id,
    Keyword,
    Symbol,
    Comment,
    Whitespace,
    Error,
    Eof,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Num => "NUM",
            TokenKind::Id => "ID",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Symbol => "SYMBOL",
            TokenKind::Comment => "COMMENT",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::Error => "ERROR",
            TokenKind::Eof => "EOF",
        }
    }

    /// Kinds the parser skips without matching.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Comment | TokenKind::Whitespace | TokenKind::Error
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scanned token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub line: usize,
    pub kind: TokenKind,
    pub lexeme: String,
}

impl Token {
    pub fn new(line: usize, kind: TokenKind, lexeme: impl Into<String>) -> Self {
        Token {
            line,
            kind,
            lexeme: lexeme.into(),
        }
    }

    /// The end-of-input sentinel.
    pub fn eof(line: usize) -> Self {
        Token::new(line, TokenKind::Eof, "$")
    }

    /// Key used against the parse table: the lexeme, except that every
    /// number and identifier shares its category name.
    pub fn match_key(&self) -> &str {
        match self.kind {
            TokenKind::Num | TokenKind::Id => self.kind.name(),
            _ => &self.lexeme,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.match_key())
    }
}

/// Anything that yields tokens one at a time.
///
/// A source yields one EOF token and then `None`.
pub trait TokenSource {
    fn next_token(&mut self) -> Option<Token>;
}

impl<I> TokenSource for I
where
    I: Iterator<Item = Token>,
{
    fn next_token(&mut self) -> Option<Token> {
        self.next()
    }
}

pub const KEYWORDS: [&str; 8] = [
    "if", "else", "void", "int", "repeat", "break", "until", "return",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorKind {
    InvalidInput,
    InvalidNumber,
    UnmatchedComment,
    UnclosedComment,
}

impl fmt::Display for LexicalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LexicalErrorKind::InvalidInput => "Invalid input",
            LexicalErrorKind::InvalidNumber => "Invalid number",
            LexicalErrorKind::UnmatchedComment => "Unmatched comment",
            LexicalErrorKind::UnclosedComment => "Unclosed comment",
        };
        f.write_str(text)
    }
}

/// Malformed input found while scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalError {
    pub line: usize,
    pub lexeme: String,
    pub kind: LexicalErrorKind,
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lexeme, self.kind)
    }
}

/// Renders lexical errors grouped by line, one line of the report per
/// source line.
pub fn render_lexical_report(errors: &[LexicalError]) -> String {
    if errors.is_empty() {
        return "There is no lexical error.\n".to_string();
    }

    let mut lines: Vec<usize> = errors.iter().map(|e| e.line).collect();
    lines.sort_unstable();
    lines.dedup();

    let mut out = String::new();
    for line in lines {
        let entries: Vec<String> = errors
            .iter()
            .filter(|e| e.line == line)
            .map(ToString::to_string)
            .collect();
        out.push_str(&format!("{} {}\n", line, entries.join(" ")));
    }
    out
}

/// Lexer for C-minus source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    finished: bool,
    errors: Vec<LexicalError>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            finished: false,
            errors: Vec::new(),
        }
    }

    /// Scan the whole input, returning every token (trivia included) and the
    /// lexical errors.
    pub fn tokenize(input: &str) -> (Vec<Token>, Vec<LexicalError>) {
        let mut lexer = Lexer::new(input);
        let tokens: Vec<Token> = lexer.by_ref().collect();
        (tokens, lexer.into_errors())
    }

    pub fn into_errors(self) -> Vec<LexicalError> {
        self.errors
    }

    /// Get next token
    fn scan(&mut self) -> Token {
        let line = self.line;
        let start = self.position;
        let Some(ch) = self.advance() else {
            return Token::eof(line);
        };

        match ch {
            ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c' => {
                while matches!(
                    self.peek(),
                    Some(' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c')
                ) {
                    self.advance();
                }
                Token::new(line, TokenKind::Whitespace, self.lexeme_from(start))
            }

            '0'..='9' => self.number_literal(line, start),

            'a'..='z' | 'A'..='Z' => self.identifier_or_keyword(line, start),

            '/' => match self.peek() {
                Some('*') => {
                    self.advance();
                    self.block_comment(line, start)
                }
                Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                    Token::new(line, TokenKind::Comment, self.lexeme_from(start))
                }
                _ => self.error(line, "/", LexicalErrorKind::InvalidInput),
            },

            '*' => {
                if self.peek() == Some('/') {
                    self.advance();
                    self.error(line, "*/", LexicalErrorKind::UnmatchedComment)
                } else {
                    Token::new(line, TokenKind::Symbol, "*")
                }
            }

            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::new(line, TokenKind::Symbol, "==")
                } else {
                    Token::new(line, TokenKind::Symbol, "=")
                }
            }

            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::new(line, TokenKind::Symbol, "<=")
                } else {
                    Token::new(line, TokenKind::Symbol, "<")
                }
            }

            ';' | ',' | '[' | ']' | '(' | ')' | '{' | '}' | '+' | '-' => {
                Token::new(line, TokenKind::Symbol, ch.to_string())
            }

            _ => self.error(line, &ch.to_string(), LexicalErrorKind::InvalidInput),
        }
    }

    /// Digits; a letter glued to the digits makes the whole run invalid.
    fn number_literal(&mut self, line: usize, start: usize) -> Token {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }

        if matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric()) {
                self.advance();
            }
            let lexeme = self.lexeme_from(start);
            return self.error(line, &lexeme, LexicalErrorKind::InvalidNumber);
        }

        Token::new(line, TokenKind::Num, self.lexeme_from(start))
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, line: usize, start: usize) -> Token {
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric()) {
            self.advance();
        }

        let lexeme = self.lexeme_from(start);
        if KEYWORDS.contains(&lexeme.as_str()) {
            Token::new(line, TokenKind::Keyword, lexeme)
        } else {
            Token::new(line, TokenKind::Id, lexeme)
        }
    }

    /// Block comment body; the opening `/*` is already consumed.
    fn block_comment(&mut self, line: usize, start: usize) -> Token {
        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Token::new(line, TokenKind::Comment, self.lexeme_from(start));
            }
            self.advance();
        }

        let lexeme = self.lexeme_from(start);
        let head: String = lexeme.chars().take(7).collect();
        self.error(line, &format!("{}...", head), LexicalErrorKind::UnclosedComment)
    }

    fn error(&mut self, line: usize, lexeme: &str, kind: LexicalErrorKind) -> Token {
        log::debug!("lexical error at line {}: ({}, {})", line, lexeme, kind);
        self.errors.push(LexicalError {
            line,
            lexeme: lexeme.to_string(),
            kind,
        });
        Token::new(line, TokenKind::Error, lexeme)
    }

    fn lexeme_from(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.scan();
        if token.is_eof() {
            self.finished = true;
        }
        Some(token)
    }
}
