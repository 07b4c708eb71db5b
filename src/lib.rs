#![allow(clippy::module_inception)]

use std::rc::Rc;

pub mod ast;
pub mod binder;
pub mod cfg;
pub mod compilation;
pub mod errors;
pub mod evaluator;
pub mod lexer;
pub mod lowering;
pub mod macros;
pub mod parser;
pub mod symbols;

extern crate regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Span covering a single position, used for front-end errors that only
    /// know where they started.
    pub fn at(position: Position) -> Self {
        Span {
            start: position.clone(),
            end: position,
        }
    }

    pub fn length(&self) -> u32 {
        self.end.0.saturating_sub(self.start.0)
    }
}

/// Finds the line containing byte offset `position`.
///
/// Returns the 1-based line number, the line text and the offset of
/// `position` within that line.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    // Offset one past the last character (e.g. an EOF token)
    let last = content.split_inclusive('\n').last().unwrap_or("");
    Some((line_number.saturating_sub(1).max(1), last.to_string(), last.len()))
}
