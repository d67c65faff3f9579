use std::rc::Rc;

use regex::Regex;

use crate::{errors::errors::{Error, ErrorImpl}, Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

#[derive(Clone)]
pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler
}

impl RegexPattern {
    fn new(pattern: &str, handler: RegexHandler) -> Result<Self, regex::Error> {
        Ok(RegexPattern { regex: Regex::new(pattern)?, handler })
    }
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    line: u32,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            line: 1,
            tokens: vec![],
            source,
            file: file_name,
        }
    }

    /// Advances past `n` bytes, keeping the line counter in step with any newlines consumed.
    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());
        self.line += self.source[self.pos..end].matches('\n').count() as u32;
        self.pos = end;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn here(&self) -> Position {
        Position(self.line, Rc::clone(&self.file))
    }
}

fn patterns() -> Result<Vec<RegexPattern>, regex::Error> {
    Ok(vec![
        RegexPattern::new("^\\s+", skip_handler)?,
        RegexPattern::new("^//[^\n]*", skip_handler)?,
        RegexPattern::new("^/\\*(?s:.*?)\\*/", skip_handler)?,
        RegexPattern::new("^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler)?,
        RegexPattern::new("^[0-9]+", number_handler)?,
        RegexPattern::new("^\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "["))?,
        RegexPattern::new("^\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]"))?,
        RegexPattern::new("^\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{"))?,
        RegexPattern::new("^\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}"))?,
        RegexPattern::new("^\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "("))?,
        RegexPattern::new("^\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")"))?,
        RegexPattern::new("^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "=="))?,
        RegexPattern::new("^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!="))?,
        RegexPattern::new("^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "="))?,
        RegexPattern::new("^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<="))?,
        RegexPattern::new("^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<"))?,
        RegexPattern::new("^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">="))?,
        RegexPattern::new("^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">"))?,
        RegexPattern::new("^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";"))?,
        RegexPattern::new("^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ","))?,
        RegexPattern::new("^\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+"))?,
        RegexPattern::new("^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-"))?,
        RegexPattern::new("^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/"))?,
        RegexPattern::new("^\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*"))?,
    ])
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = match regex.find(lexer.remainder()) {
        Some(matched) => matched.as_str().to_string(),
        None => return,
    };

    let span = Span { start: lexer.here(), end: lexer.here() };
    lexer.push(MK_TOKEN!(TokenKind::Number, matched.clone(), span));
    lexer.advance_n(matched.len());
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    if let Some(matched) = regex.find(lexer.remainder()) {
        lexer.advance_n(matched.end());
    }
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = match regex.find(lexer.remainder()) {
        Some(matched) => matched.as_str().to_string(),
        None => return,
    };

    let span = Span { start: lexer.here(), end: lexer.here() };
    if let Some(kind) = RESERVED_LOOKUP.get(value.as_str()) {
        lexer.push(MK_TOKEN!(*kind, value.clone(), span));
    } else {
        lexer.push(MK_TOKEN!(TokenKind::Identifier, value.clone(), span));
    }

    lexer.advance_n(value.len());
}

pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);
    let patterns = patterns().map_err(|err| {
        Error::new(ErrorImpl::UnrecognisedToken { token: err.to_string() }, lex.here())
    })?;

    while !lex.at_eof() {
        let pattern = patterns.iter().find(|pattern| pattern.regex.is_match(lex.remainder()));

        match pattern {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex),
            None => {
                let token = lex.at().map(String::from).unwrap_or_default();
                return Err(Error::new(ErrorImpl::UnrecognisedToken { token }, lex.here()));
            }
        }
    }

    let span = Span { start: lex.here(), end: lex.here() };
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
    Ok(lex.tokens)
}
