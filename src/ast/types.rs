use std::fmt::Display;

use crate::lexer::tokens::TokenKind;

/// Data type attached to declarations and function results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    Int,
    Void,
    #[default]
    Unset,
}

impl DataType {
    /// Maps a type-specifier token to its data type.
    pub fn from_token(kind: TokenKind) -> Option<DataType> {
        match kind {
            TokenKind::Int => Some(DataType::Int),
            TokenKind::Void => Some(DataType::Void),
            _ => None,
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Int => write!(f, "INT"),
            DataType::Void => write!(f, "VOID"),
            DataType::Unset => write!(f, "-"),
        }
    }
}

/// Node payload, chosen by the node's kind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Attribute {
    #[default]
    None,
    Name(String),
    Value(i64),
    Operator(TokenKind),
}

impl Attribute {
    pub fn name(&self) -> Option<&str> {
        match self {
            Attribute::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<i64> {
        match self {
            Attribute::Value(value) => Some(*value),
            _ => None,
        }
    }
}
