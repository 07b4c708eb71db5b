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

// Every pattern is anchored with `^`, and the first matching pattern wins,
// so longer operators must come before their prefixes.
fn pattern(regex: &str, handler: RegexHandler) -> RegexPattern {
    // Patterns are fixed at compile time, a bad one is a programming error
    RegexPattern { regex: Regex::new(regex).unwrap(), handler }
}

#[derive(Clone)]
pub struct Lexer {
    patterns: Vec<RegexPattern>,
    tokens: Vec<Token>,
    source: String,
    pos: usize,
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
            tokens: vec![],
            patterns: vec![
                pattern("^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
                pattern("^[0-9]+", number_handler),
                pattern("^\\s+", skip_handler),
                pattern("^\"(?:[^\"\\\\\\n]|\\\\.)*\"", string_handler),
                pattern("^//[^\\n]*", skip_handler),
                pattern("^\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
                pattern("^\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
                pattern("^\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
                pattern("^\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
                pattern("^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
                pattern("^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
                pattern("^!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
                pattern("^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
                pattern("^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
                pattern("^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
                pattern("^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
                pattern("^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
                pattern("^\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
                pattern("^&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
                pattern("^\\|=", MK_DEFAULT_HANDLER!(TokenKind::PipeEquals, "|=")),
                pattern("^&=", MK_DEFAULT_HANDLER!(TokenKind::AmpersandEquals, "&=")),
                pattern("^\\^=", MK_DEFAULT_HANDLER!(TokenKind::HatEquals, "^=")),
                pattern("^\\|", MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|")),
                pattern("^&", MK_DEFAULT_HANDLER!(TokenKind::Ampersand, "&")),
                pattern("^\\^", MK_DEFAULT_HANDLER!(TokenKind::Hat, "^")),
                pattern("^~", MK_DEFAULT_HANDLER!(TokenKind::Tilde, "~")),
                pattern("^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
                pattern("^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
                pattern("^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
                pattern("^->", MK_DEFAULT_HANDLER!(TokenKind::Arrow, "->")),
                pattern("^\\+=", MK_DEFAULT_HANDLER!(TokenKind::PlusEquals, "+=")),
                pattern("^-=", MK_DEFAULT_HANDLER!(TokenKind::MinusEquals, "-=")),
                pattern("^\\*=", MK_DEFAULT_HANDLER!(TokenKind::StarEquals, "*=")),
                pattern("^/=", MK_DEFAULT_HANDLER!(TokenKind::SlashEquals, "/=")),
                pattern("^%=", MK_DEFAULT_HANDLER!(TokenKind::PercentEquals, "%=")),
                pattern("^\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
                pattern("^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
                pattern("^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
                pattern("^\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
                pattern("^%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
            ],
            source,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Span starting at the current position and covering `len` bytes.
    pub fn span_of(&self, len: usize) -> Span {
        Span {
            start: Position(self.pos as u32, Rc::clone(&self.file)),
            end: Position((self.pos + len) as u32, Rc::clone(&self.file)),
        }
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

fn matched_len(lexer: &Lexer, regex: &Regex) -> usize {
    regex.find(lexer.remainder()).map(|m| m.end()).unwrap_or(0)
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let len = matched_len(lexer, regex);
    let matched = lexer.remainder()[..len].to_string();

    let span = lexer.span_of(len);
    lexer.push(MK_TOKEN!(TokenKind::Number, matched, span));
    lexer.advance_n(len);
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let len = matched_len(lexer, regex);
    lexer.advance_n(len);
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) {
    let len = matched_len(lexer, regex);
    let raw = lexer.remainder()[1..len - 1].to_string();

    let mut result = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.peek() {
                Some('n') => {
                    result.push('\n');
                    chars.next();
                }
                Some('t') => {
                    result.push('\t');
                    chars.next();
                }
                Some('r') => {
                    result.push('\r');
                    chars.next();
                }
                Some('\\') => {
                    result.push('\\');
                    chars.next();
                }
                Some('"') => {
                    result.push('"');
                    chars.next();
                }
                Some('0') => {
                    result.push('\0');
                    chars.next();
                }
                _ => result.push(ch), // Keep the backslash
            }
        } else {
            result.push(ch);
        }
    }

    let span = lexer.span_of(len);
    lexer.push(MK_TOKEN!(TokenKind::String, result, span));
    lexer.advance_n(len);
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let len = matched_len(lexer, regex);
    let value = lexer.remainder()[..len].to_string();
    let kind = RESERVED_LOOKUP.get(value.as_str()).copied().unwrap_or(TokenKind::Identifier);

    let span = lexer.span_of(len);
    lexer.push(MK_TOKEN!(kind, value, span));
    lexer.advance_n(len);
}

pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);
    let patterns = lex.patterns.clone();

    while !lex.at_eof() {
        let mut matched = false;

        for pattern in patterns.iter() {
            if pattern.regex.is_match(lex.remainder()) {
                (pattern.handler)(&mut lex, &pattern.regex);
                matched = true;
                break;
            }
        }

        if !matched {
            let position = Position(lex.pos as u32, Rc::clone(&lex.file));
            if lex.at() == '"' {
                return Err(Error::new(ErrorImpl::UnterminatedString, position));
            }
            return Err(Error::new(ErrorImpl::UnrecognisedToken { token: lex.at().to_string() }, position));
        }
    }

    let span = lex.span_of(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
    Ok(lex.tokens)
}
