#![allow(clippy::module_inception)]

use std::{path::Path, rc::Rc};

use crate::errors::errors::{Error, ErrorTip};

pub mod analyzer;
pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod symtab;
pub mod type_checker;

extern crate regex;

/// A source location: line number (1-based, 0 for synthesized entries) and file name.
#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }

    pub fn line(&self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Returns the text of the given 1-based line, without its line terminator.
pub fn get_source_line(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }

    source
        .split('\n')
        .nth((line - 1) as usize)
        .map(|text| text.trim_end_matches('\r'))
}


/// Renders a front-end error together with the offending source line.
pub fn display_error(error: &Error, file: &Path, source: &str) {
    /*
        Error: UnexpectedToken (Unexpected token: `}`, did you miss a semicolon?)
        -> program.c-
           |
        20 | x = 1
           |
    */

    let line = error.get_position().line();
    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("-> {}", file.as_os_str().to_string_lossy());
    eprintln!("{:>padding$}", "|");

    if let Some(line_text) = get_source_line(source, line) {
        eprintln!("{} | {}", line_string, line_text.trim());
    }

    eprintln!("{:>padding$}", "|");
}
