use std::fmt;
use std::io::{self, BufRead};

use super::reserved;
use crate::session::Listing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Служебные
    EndFile,
    Error,
    // Ключевые слова
    If,
    Then,
    Else,
    EndIf,
    EndWhile,
    Repeat,
    Until,
    Read,
    Write,
    While,
    // Идентификаторы и литералы
    Id,
    Num,
    // Операторы
    Assign,        // :=
    Eq,            // =
    Lt,            // <
    Plus,          // +
    Minus,         // -
    Times,         // *
    Over,          // /
    LParen,        // (
    RParen,        // )
    Semi,          // ;
    Colon,         // : not followed by =
}

impl TokenKind {
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            Self::If
                | Self::Then
                | Self::Else
                | Self::EndIf
                | Self::EndWhile
                | Self::Repeat
                | Self::Until
                | Self::Read
                | Self::Write
                | Self::While
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Line the token starts on.
    pub line: usize,
    pub lexeme: String,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            kind if kind.is_reserved() => write!(f, "reserved word: {}", self.lexeme),
            TokenKind::EndFile => write!(f, "EOF"),
            TokenKind::Error => write!(f, "ERROR: {}", self.lexeme),
            TokenKind::Id => write!(f, "ID, name= {}", self.lexeme),
            TokenKind::Num => write!(f, "NUM, val= {}", self.lexeme),
            TokenKind::Assign => write!(f, ":="),
            TokenKind::Eq => write!(f, "="),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Times => write!(f, "*"),
            TokenKind::Over => write!(f, "/"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Semi => write!(f, ";"),
            TokenKind::Colon => write!(f, ":"),
            _ => write!(f, "{:?}", self.kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    InAssign,
    InComment,
    InNumber,
    InIdentifier,
    Done,
}

/// DFA scanner over a line-buffered source with one character of pushback.
pub struct Lexer<'l, R> {
    reader: R,
    listing: &'l mut Listing,
    buffer: Vec<char>,
    position: usize,
    line: usize,
    eof: bool,
    io_error: Option<io::Error>,
}

impl<'l, R: BufRead> Lexer<'l, R> {
    pub fn new(reader: R, listing: &'l mut Listing) -> Self {
        Self {
            reader,
            listing,
            buffer: Vec::new(),
            position: 0,
            line: 0,
            eof: false,
            io_error: None,
        }
    }

    /// Read failure that ended the input early, if any.
    pub fn take_io_error(&mut self) -> Option<io::Error> {
        self.io_error.take()
    }

    pub fn next_token(&mut self) -> Token {
        let mut lexeme = String::new();
        let mut kind = TokenKind::EndFile;
        let mut state = State::Start;
        let mut line = self.line;

        while state != State::Done {
            let ch = self.next_char();
            let mut save = true;

            match state {
                State::Start => {
                    line = self.line;
                    match ch {
                        Some(c) if c.is_ascii_digit() => state = State::InNumber,
                        Some(c) if c.is_ascii_alphabetic() => state = State::InIdentifier,
                        Some(':') => state = State::InAssign,
                        Some(c) if c.is_ascii_whitespace() => save = false,
                        Some('{') => {
                            save = false;
                            state = State::InComment;
                        }
                        Some(c) => {
                            state = State::Done;
                            kind = single_char_kind(c);
                        }
                        None => {
                            save = false;
                            state = State::Done;
                            kind = TokenKind::EndFile;
                        }
                    }
                }
                State::InComment => {
                    save = false;
                    match ch {
                        // an unterminated comment just ends the input
                        None => {
                            line = self.line;
                            state = State::Done;
                            kind = TokenKind::EndFile;
                        }
                        Some('}') => state = State::Start,
                        Some(_) => {}
                    }
                }
                State::InAssign => {
                    state = State::Done;
                    if ch == Some('=') {
                        kind = TokenKind::Assign;
                    } else {
                        self.unget_char();
                        save = false;
                        kind = TokenKind::Colon;
                    }
                }
                State::InNumber => {
                    if !matches!(ch, Some(c) if c.is_ascii_digit()) {
                        self.unget_char();
                        save = false;
                        state = State::Done;
                        kind = TokenKind::Num;
                    }
                }
                State::InIdentifier => {
                    if !matches!(ch, Some(c) if is_ident_continue(c)) {
                        self.unget_char();
                        save = false;
                        state = State::Done;
                        kind = TokenKind::Id;
                    }
                }
                State::Done => {}
            }

            if save {
                if let Some(c) = ch {
                    lexeme.push(c);
                }
            }
        }

        if kind == TokenKind::Id {
            if let Some(reserved) = reserved::lookup(&lexeme) {
                kind = reserved;
            }
        }

        let token = Token { kind, line, lexeme };
        tracing::trace!(line = token.line, token = %token, "scanned");
        if self.listing.options().trace_scan {
            self.listing.push(format!("\t{}: {}", token.line, token));
        }
        token
    }

    /// Next character of the current line, refilling the buffer when it runs out.
    fn next_char(&mut self) -> Option<char> {
        if self.position >= self.buffer.len() {
            if self.eof {
                return None;
            }
            self.line += 1;

            let mut raw = Vec::new();
            match self.reader.read_until(b'\n', &mut raw) {
                Ok(0) => {
                    self.eof = true;
                    return None;
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(line = self.line, error = %err, "source read failed, treating as end of input");
                    self.io_error = Some(err);
                    self.eof = true;
                    return None;
                }
            }

            // invalid UTF-8 becomes U+FFFD, which scans as an error token
            let text = String::from_utf8_lossy(&raw);
            if self.listing.options().echo_source {
                self.listing.push(format!("{:4}: {}", self.line, text.trim_end_matches(['\r', '\n'])));
            }
            self.buffer = text.chars().collect();
            self.position = 0;
        }

        let ch = self.buffer.get(self.position).copied();
        self.position += 1;
        ch
    }

    /// Push back the last character. No-op once the input is exhausted.
    fn unget_char(&mut self) {
        if !self.eof && self.position > 0 {
            self.position -= 1;
        }
    }
}

fn single_char_kind(ch: char) -> TokenKind {
    match ch {
        '=' => TokenKind::Eq,
        '<' => TokenKind::Lt,
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Times,
        '/' => TokenKind::Over,
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        ';' => TokenKind::Semi,
        _ => TokenKind::Error,
    }
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Scans a whole source string. The last token is always `EndFile`.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut listing = Listing::default();
    let mut lexer = Lexer::new(source.as_bytes(), &mut listing);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::EndFile;
        tokens.push(token);
        if done {
            break;
        }
    }

    tokens
}
