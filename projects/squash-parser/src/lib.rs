pub mod chain;
pub mod lexer;
pub mod normalize;
pub mod recognizer;

pub use chain::{Argument, Call, CallChain};
pub use lexer::{Lexer, Token, TokenKind};
pub use normalize::normalize;
pub use recognizer::{recognize, RawAlteration, Statement, TableVerb};
