use crate::lexer::{Token, TokenKind};
use smallvec::SmallVec;

/// A literal argument of a call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Argument {
    /// A quoted string, unquoted.
    String(String),
    /// A `[...]` array literal.
    Array(Vec<Argument>),
    /// Anything else (numbers, booleans, constants, closures), verbatim.
    Raw(String),
}

impl Argument {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Argument::String(s) => Some(s),
            _ => None,
        }
    }

    /// The argument itself if it is a string, or every string inside an array.
    pub fn strings(&self) -> Vec<&str> {
        match self {
            Argument::String(s) => vec![s.as_str()],
            Argument::Array(items) => items.iter().filter_map(Argument::as_str).collect(),
            Argument::Raw(_) => Vec::new(),
        }
    }
}

/// One `name(args)` link of a call chain.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Call {
    pub name: String,
    pub args: Vec<Argument>,
    /// Source text between the parentheses.
    pub raw_args: String,
    /// Source text of the arguments after the first one.
    pub trailing_args: Option<String>,
}

impl Call {
    /// The first argument as a string, or the first string of an array argument.
    pub fn first_string(&self) -> Option<&str> {
        self.args.first().and_then(|arg| arg.strings().into_iter().next())
    }

    pub fn string_at(&self, index: usize) -> Option<&str> {
        self.args.get(index).and_then(Argument::as_str)
    }

    /// Every string named by the arguments, flattening arrays.
    pub fn strings(&self) -> Vec<&str> {
        self.args.iter().flat_map(Argument::strings).collect()
    }
}

/// `receiver->call(..)->call(..)` or `Class::call(..)->call(..)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallChain {
    pub receiver: String,
    pub calls: SmallVec<[Call; 4]>,
}

impl CallChain {
    /// The first call of the chain; everything after it is a modifier.
    pub fn head(&self) -> Option<&Call> {
        self.calls.first()
    }

    pub fn modifiers(&self) -> &[Call] {
        self.calls.get(1..).unwrap_or_default()
    }

    pub fn find(&self, name: &str) -> Option<&Call> {
        self.calls.iter().find(|call| call.name == name)
    }
}

/// What follows the receiver: a call chain or a property assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chained {
    Calls(CallChain),
    Assignment { receiver: String, property: String, value: String },
}

pub(crate) struct ChainParser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> ChainParser<'a> {
    pub(crate) fn new(source: &'a str, tokens: &'a [Token]) -> Self {
        Self { source, tokens, pos: 0 }
    }

    /// Finds the first `$var->` on the line and parses from there.
    pub(crate) fn parse_instance(&mut self) -> Option<Chained> {
        let start = self.tokens.windows(2).position(|pair| {
            pair[0].kind == TokenKind::Variable && pair[1].kind == TokenKind::Arrow
        })?;
        self.pos = start;
        self.parse_from_receiver()
    }

    /// Finds the first `Class::` on the line (namespaced or not) and parses
    /// from there.
    pub(crate) fn parse_static(&mut self, class: &str) -> Option<CallChain> {
        let start = self.tokens.windows(2).position(|pair| {
            pair[0].kind == TokenKind::Ident
                && pair[0].text.rsplit('\\').next() == Some(class)
                && pair[1].kind == TokenKind::DoubleColon
        })?;
        self.pos = start;
        match self.parse_from_receiver()? {
            Chained::Calls(chain) => Some(chain),
            Chained::Assignment { .. } => None,
        }
    }

    fn parse_from_receiver(&mut self) -> Option<Chained> {
        let receiver = self.bump()?.text.clone();
        let mut calls = SmallVec::new();

        while matches!(self.peek_kind(), Some(TokenKind::Arrow | TokenKind::DoubleColon)) {
            self.bump();
            let name = match self.peek() {
                Some(token) if token.kind == TokenKind::Ident => token.text.clone(),
                _ => break,
            };
            self.bump();

            match self.peek_kind() {
                Some(TokenKind::LParen) => calls.push(self.parse_call(name)),
                Some(TokenKind::Eq) if calls.is_empty() => {
                    self.bump();
                    return Some(Chained::Assignment {
                        receiver,
                        property: name,
                        value: self.parse_assigned_value(),
                    });
                }
                // property access without a call
                _ => break,
            }
        }

        if calls.is_empty() {
            return None;
        }
        Some(Chained::Calls(CallChain { receiver, calls }))
    }

    fn parse_call(&mut self, name: String) -> Call {
        let open = self.bump().map(|t| t.span.end).unwrap_or(self.source.len());
        let mut args = Vec::new();
        let mut first_comma = None;
        let mut arg_start = self.pos;
        let mut depth = 0usize;
        let mut close = self.source.len();

        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace if depth > 0 => depth -= 1,
                TokenKind::RParen => {
                    close = token.span.start;
                    if arg_start < self.pos {
                        args.push(self.argument(arg_start, self.pos));
                    }
                    self.bump();
                    return self.finish_call(name, args, open, close, first_comma);
                }
                TokenKind::Comma if depth == 0 => {
                    if first_comma.is_none() {
                        first_comma = Some(token.span.end);
                    }
                    args.push(self.argument(arg_start, self.pos));
                    arg_start = self.pos + 1;
                }
                TokenKind::EOF => {
                    close = token.span.start;
                    break;
                }
                _ => {}
            }
            self.bump();
        }

        // unterminated: the argument list runs to the end of the line
        if arg_start < self.pos {
            args.push(self.argument(arg_start, self.pos));
        }
        self.finish_call(name, args, open, close, first_comma)
    }

    fn finish_call(&self, name: String, args: Vec<Argument>, open: usize, close: usize, first_comma: Option<usize>) -> Call {
        let raw_args = self.slice(open, close).trim().to_string();
        let trailing_args = first_comma
            .map(|comma| self.slice(comma, close).trim().to_string())
            .filter(|text| !text.is_empty());
        Call { name, args, raw_args, trailing_args }
    }

    /// Builds one argument from `tokens[from..to]`.
    fn argument(&self, from: usize, to: usize) -> Argument {
        let tokens = &self.tokens[from..to];
        match tokens {
            [single] if single.kind == TokenKind::String => Argument::String(single.unquoted()),
            [first, .., last] if first.kind == TokenKind::LBracket && last.kind == TokenKind::RBracket => {
                Argument::Array(self.array_items(from + 1, to - 1))
            }
            [] => Argument::Raw(String::new()),
            [first, .., last] => Argument::Raw(self.slice(first.span.start, last.span.end).to_string()),
            [single] => Argument::Raw(single.text.clone()),
        }
    }

    fn array_items(&self, from: usize, to: usize) -> Vec<Argument> {
        let mut items = Vec::new();
        let mut depth = 0usize;
        let mut item_start = from;
        for index in from..to {
            match self.tokens[index].kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => depth = depth.saturating_sub(1),
                TokenKind::Comma if depth == 0 => {
                    if item_start < index {
                        items.push(self.argument(item_start, index));
                    }
                    item_start = index + 1;
                }
                _ => {}
            }
        }
        if item_start < to {
            items.push(self.argument(item_start, to));
        }
        items
    }

    fn parse_assigned_value(&mut self) -> String {
        let mut parts = Vec::new();
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Semicolon | TokenKind::EOF => break,
                TokenKind::String => parts.push(token.unquoted()),
                _ => parts.push(token.text.clone()),
            }
            self.bump();
        }
        parts.concat()
    }

    fn slice(&self, from: usize, to: usize) -> &'a str {
        self.source.get(from..to).unwrap_or_default()
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    fn bump(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }
}
