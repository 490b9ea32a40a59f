//! Decoding of interpreter output into structured values.
//!
//! Output that looks like a bracketed list (what `Deno.inspect` prints for an
//! array) is read back with a small literal parser for that subset of the
//! grammar: nested lists of strings, numbers, booleans and bare words. Any
//! other text, or a list the parser cannot read completely, comes back as
//! the raw string.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::script::{Scalar, Value};

/// Lists nested deeper than this are returned as text.
const MAX_DEPTH: usize = 512;

/// Result of decoding captured output.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Structured(Value),
    Raw(String),
}

/// Decode `raw` as a list literal when it is bracket-shaped, else pass it through.
pub fn decode(raw: &str) -> Decoded {
    let trimmed = raw.trim();
    if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return Decoded::Raw(raw.to_string());
    }
    let mut reader = Reader::new(trimmed);
    match reader.list() {
        Some(value) if reader.at_end() => Decoded::Structured(value),
        _ => {
            tracing::debug!("bracketed output did not parse as a list; returning text");
            Decoded::Raw(raw.to_string())
        }
    }
}

struct Reader<'a> {
    chars: Peekable<CharIndices<'a>>,
    src: &'a str,
    depth: usize,
}

impl<'a> Reader<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            chars: src.char_indices().peekable(),
            src,
            depth: 0,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map(|&(i, _)| i).unwrap_or(self.src.len())
    }

    fn at_end(&mut self) -> bool {
        self.skip_whitespace();
        self.peek().is_none()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn skip_separators(&mut self) {
        while self.peek().is_some_and(|c| c == ',' || c.is_whitespace()) {
            self.bump();
        }
    }

    fn list(&mut self) -> Option<Value> {
        if self.depth >= MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        let list = self.list_items();
        self.depth -= 1;
        list
    }

    fn list_items(&mut self) -> Option<Value> {
        if self.bump()? != '[' {
            return None;
        }
        let mut items = Vec::new();
        loop {
            self.skip_separators();
            match self.peek()? {
                ']' => {
                    self.bump();
                    return Some(Value::Sequence(items));
                }
                _ => items.push(self.value()?),
            }
            // Elements must be separated; `[1x]` is not a list.
            match self.peek()? {
                ']' | ',' => {}
                c if c.is_whitespace() => {}
                _ => return None,
            }
        }
    }

    fn value(&mut self) -> Option<Value> {
        match self.peek()? {
            '[' => self.list(),
            '"' | '\'' | '`' => self.string().map(|s| Value::Scalar(Scalar::Str(s))),
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            c if c.is_alphabetic() || c == '_' || c == '$' => Some(word_value(&self.word(), false)),
            _ => None,
        }
    }

    fn word(&mut self) -> String {
        let start = self.offset();
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.bump();
        }
        let end = self.offset();
        self.src[start..end].to_string()
    }

    fn number(&mut self) -> Option<Value> {
        let start = self.offset();
        let negative = match self.peek()? {
            '-' => {
                self.bump();
                true
            }
            '+' => {
                self.bump();
                false
            }
            _ => false,
        };
        if self.peek().is_some_and(char::is_alphabetic) {
            return match word_value(&self.word(), negative) {
                v @ Value::Scalar(Scalar::Float(_)) => Some(v),
                _ => None,
            };
        }

        let mut prev = ' ';
        while let Some(c) = self.peek() {
            let exponent_sign = matches!(c, '+' | '-') && matches!(prev, 'e' | 'E');
            if c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E') || exponent_sign {
                prev = c;
                self.bump();
            } else {
                break;
            }
        }
        let end = self.offset();
        let text = &self.src[start..end];
        if let Ok(i) = text.parse::<i64>() {
            return Some(Value::Scalar(Scalar::Int(i)));
        }
        text.parse::<f64>().ok().map(|f| Value::Scalar(Scalar::Float(f)))
    }

    fn string(&mut self) -> Option<String> {
        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            match self.bump()? {
                c if c == quote => return Some(out),
                '\\' => out.push(self.escape()?),
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self) -> Option<char> {
        let c = self.bump()?;
        Some(match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '0' => '\0',
            'x' => self.hex_digits(2)?,
            'u' if self.peek() == Some('{') => {
                self.bump();
                let start = self.offset();
                while self.peek().is_some_and(|c| c != '}') {
                    self.bump();
                }
                let end = self.offset();
                self.bump()?;
                char::from_u32(u32::from_str_radix(&self.src[start..end], 16).ok()?)?
            }
            'u' => self.hex_digits(4)?,
            other => other,
        })
    }

    fn hex_digits(&mut self, n: usize) -> Option<char> {
        let start = self.offset();
        for _ in 0..n {
            if !self.bump()?.is_ascii_hexdigit() {
                return None;
            }
        }
        let end = self.offset();
        char::from_u32(u32::from_str_radix(&self.src[start..end], 16).ok()?)
    }
}

fn word_value(word: &str, negative: bool) -> Value {
    let sign = if negative { -1.0 } else { 1.0 };
    match word {
        "true" => Value::Scalar(Scalar::Bool(true)),
        "false" => Value::Scalar(Scalar::Bool(false)),
        "Infinity" => Value::Scalar(Scalar::Float(sign * f64::INFINITY)),
        "NaN" => Value::Scalar(Scalar::Float(f64::NAN)),
        other => Value::atom(other),
    }
}
