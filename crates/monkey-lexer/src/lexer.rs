//! Core Monkey lexer: converts source text to a token stream.
//!
//! - Whitespace, including newlines, is insignificant; `;` separates statements
//! - Single-line comments (`//`) are stripped
//! - String literals support the escapes `\"`, `\\`, `\n`, `\t`
//! - Error recovery: illegal input is reported and skipped, up to
//!   [`monkey_types::MAX_ERRORS`] errors

use monkey_types::{ErrorCode, SourceFile, Span, SyntaxError, SyntaxErrors};
use tracing::debug;

use crate::token::{Token, TokenKind};

pub struct Lexer<'src> {
    source: &'src [u8],
    source_file: &'src SourceFile,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line (1-based).
    line: u32,
    /// Current column (1-based, in bytes).
    col: u32,
    errors: SyntaxErrors,
}

/// Result of lexing: tokens + any errors collected.
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::Eof`]).
    pub tokens: Vec<Token>,
    pub errors: SyntaxErrors,
}

impl<'src> Lexer<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: source_file.source.as_bytes(),
            source_file,
            pos: 0,
            line: 1,
            col: 1,
            errors: SyntaxErrors::empty(),
        }
    }

    /// Lex the entire source file into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();
        loop {
            if self.errors.is_full() {
                tokens.push(Token::new(TokenKind::Eof, self.current_span()));
                break;
            }
            let Some(token) = self.scan_token() else {
                continue;
            };
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        debug!(
            file = %self.source_file.name,
            tokens = tokens.len(),
            errors = self.errors.total_errors,
            "lexed source"
        );
        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    /// Consume the next byte if it equals `expected`.
    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn emit_error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        let err = SyntaxError::new(&self.source_file.name, code, message, span, source_line);
        self.errors.push(err);
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => {
                    self.advance();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while self.peek().is_some_and(|ch| ch != b'\n') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    /// Scan one token. Returns `None` when the input was illegal and has
    /// been reported and skipped.
    fn scan_token(&mut self) -> Option<Token> {
        self.skip_trivia();

        let start_line = self.line;
        let start_col = self.col;
        let Some(ch) = self.advance() else {
            return Some(Token::new(TokenKind::Eof, self.current_span()));
        };

        let kind = match ch {
            b'"' => return self.scan_string(start_line, start_col),
            b'0'..=b'9' => return self.scan_integer(start_line, start_col),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                return Some(self.scan_identifier(start_line, start_col))
            }

            b'+' if self.eat(b'+') => TokenKind::PlusPlus,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'<' => TokenKind::Less,
            b'>' => TokenKind::Greater,
            b'=' if self.eat(b'=') => TokenKind::EqEq,
            b'=' => TokenKind::Assign,
            b'!' if self.eat(b'=') => TokenKind::BangEq,
            b'!' => TokenKind::Bang,

            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,

            other => {
                self.report_illegal(other, start_line, start_col);
                return None;
            }
        };
        Some(Token::new(kind, self.span_from(start_line, start_col)))
    }

    fn report_illegal(&mut self, first: u8, start_line: u32, start_col: u32) {
        // Swallow the rest of a multi-byte UTF-8 sequence so it is reported once.
        let start = self.pos - 1;
        while self.peek().is_some_and(|b| b & 0b1100_0000 == 0b1000_0000) {
            self.advance();
        }
        let text = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
        let span = self.span_from(start_line, start_col);
        let message = if first.is_ascii() {
            format!("illegal character '{}'", first.escape_ascii())
        } else {
            format!("illegal character '{text}'")
        };
        self.emit_error(ErrorCode::ILLEGAL_CHARACTER, message, span);
    }

    fn scan_identifier(&mut self, start_line: u32, start_col: u32) -> Token {
        let start = self.pos - 1;
        while matches!(
            self.peek(),
            Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')
        ) {
            self.advance();
        }
        let word = String::from_utf8_lossy(&self.source[start..self.pos]);
        let kind =
            TokenKind::from_keyword(&word).unwrap_or_else(|| TokenKind::Identifier(word.into_owned()));
        Token::new(kind, self.span_from(start_line, start_col))
    }

    fn scan_integer(&mut self, start_line: u32, start_col: u32) -> Option<Token> {
        let start = self.pos - 1;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
        }
        let digits = String::from_utf8_lossy(&self.source[start..self.pos]);
        let span = self.span_from(start_line, start_col);
        match digits.parse::<i64>() {
            Ok(n) => Some(Token::new(TokenKind::Int(n), span)),
            Err(_) => {
                self.emit_error(
                    ErrorCode::INTEGER_OUT_OF_RANGE,
                    format!("integer literal {digits} does not fit in 64 bits"),
                    span,
                );
                None
            }
        }
    }

    /// Scan a string literal; the opening `"` has been consumed.
    fn scan_string(&mut self, start_line: u32, start_col: u32) -> Option<Token> {
        let mut bytes = Vec::new();
        loop {
            let Some(ch) = self.advance() else {
                let span = self.span_from(start_line, start_col);
                self.emit_error(
                    ErrorCode::UNTERMINATED_STRING,
                    "unterminated string literal",
                    span,
                );
                return None;
            };
            match ch {
                b'"' => break,
                b'\\' => {
                    let escape_line = self.line;
                    let escape_col = self.col - 1;
                    match self.advance() {
                        Some(b'"') => bytes.push(b'"'),
                        Some(b'\\') => bytes.push(b'\\'),
                        Some(b'n') => bytes.push(b'\n'),
                        Some(b't') => bytes.push(b'\t'),
                        other => {
                            let span = self.span_from(escape_line, escape_col);
                            let shown = other.map_or_else(
                                || "end of file".to_string(),
                                |b| format!("\\{}", b.escape_ascii()),
                            );
                            self.emit_error(
                                ErrorCode::INVALID_ESCAPE,
                                format!("invalid escape sequence '{shown}'"),
                                span,
                            );
                            if other.is_none() {
                                return None;
                            }
                        }
                    }
                }
                other => bytes.push(other),
            }
        }
        let text = String::from_utf8_lossy(&bytes).into_owned();
        Some(Token::new(
            TokenKind::Str(text),
            self.span_from(start_line, start_col),
        ))
    }
}
