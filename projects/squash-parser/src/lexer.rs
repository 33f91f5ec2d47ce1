use squash_types::Span;
use std::str::Chars;
use std::iter::Peekable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Symbols
    LBrace,      // {
    RBrace,      // }
    LParen,      // (
    RParen,      // )
    LBracket,    // [
    RBracket,    // ]
    Comma,       // ,
    Semicolon,   // ;
    Eq,          // =
    Arrow,       // ->
    DoubleArrow, // =>
    DoubleColon, // ::

    // Literals
    Variable,
    Ident,
    String,
    Number,

    // Trivia
    Whitespace,

    // Anything else is carried through verbatim
    Other,
    EOF,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

impl Token {
    /// The content of a quoted string token, with quotes and escapes removed.
    pub fn unquoted(&self) -> String {
        let inner = self.text.get(1..).unwrap_or_default();
        let inner = match inner.chars().last() {
            Some(c) if self.text.len() > 1 && self.text.starts_with(c) => &inner[..inner.len() - c.len_utf8()],
            _ => inner,
        };

        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(c);
            }
        }
        out
    }
}

pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<Chars<'a>>,
    cursor: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().peekable(),
            cursor: 0,
        }
    }

    /// All tokens of the source except whitespace, ending with `EOF`.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            match token.kind {
                TokenKind::Whitespace => continue,
                TokenKind::EOF => {
                    tokens.push(token);
                    return tokens;
                }
                _ => tokens.push(token),
            }
        }
    }

    pub fn next_token(&mut self) -> Token {
        let start = self.cursor;

        let kind = match self.advance() {
            Some(c) => match c {
                c if c.is_whitespace() => {
                    self.consume_while(|c| c.is_whitespace());
                    TokenKind::Whitespace
                }

                c if c.is_ascii_digit() => {
                    self.consume_while(|c| c.is_ascii_digit() || c == '.');
                    TokenKind::Number
                }

                '$' => {
                    self.consume_while(|c| c.is_alphanumeric() || c == '_');
                    TokenKind::Variable
                }

                c if c.is_alphabetic() || c == '_' || c == '\\' => {
                    self.consume_while(|c| c.is_alphanumeric() || c == '_' || c == '\\');
                    TokenKind::Ident
                }

                quote @ ('\'' | '"' | '`') => {
                    while let Some(c) = self.peek() {
                        if c == quote {
                            self.advance();
                            break;
                        }
                        if c == '\\' {
                            self.advance();
                        }
                        self.advance();
                    }
                    TokenKind::String
                }

                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                ',' => TokenKind::Comma,
                ';' => TokenKind::Semicolon,
                '-' if self.peek() == Some('>') => {
                    self.advance();
                    TokenKind::Arrow
                }
                '=' if self.peek() == Some('>') => {
                    self.advance();
                    TokenKind::DoubleArrow
                }
                '=' => TokenKind::Eq,
                ':' if self.peek() == Some(':') => {
                    self.advance();
                    TokenKind::DoubleColon
                }
                _ => TokenKind::Other,
            },
            None => TokenKind::EOF,
        };

        let end = self.cursor;
        Token {
            kind,
            span: Span { start, end },
            text: self.source[start..end].to_string(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(c) = c {
            self.cursor += c.len_utf8();
        }
        c
    }

    fn consume_while<F>(&mut self, mut f: F)
    where
        F: FnMut(char) -> bool,
    {
        while let Some(c) = self.peek() {
            if f(c) {
                self.advance();
            } else {
                break;
            }
        }
    }
}
