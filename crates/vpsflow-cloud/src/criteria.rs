//! Criteria filters
//!
//! A criteria filter is a mapping of attribute name to expected value. A
//! record matches when every pair matches; the empty filter matches
//! everything.
//!
//! Filters come either from the provisioning document (YAML mappings) or
//! from the command line as a mapping literal:
//!
//! ```text
//! {'family': 'ubuntu', 'arch': 'x64'}
//! {"vcpu_count": "1", 'windows': False}
//! ```

use crate::error::{CloudError, Result};
use crate::provider::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::str::FromStr;

/// Attribute name to expected value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Criteria(IndexMap<String, Value>);

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Parse an optional mapping literal; absent or blank input is the empty filter
    pub fn parse_optional(input: Option<&str>) -> Result<Self> {
        match input {
            Some(text) => text.parse(),
            None => Ok(Self::default()),
        }
    }

    /// Check a record against every pair of the filter
    ///
    /// A record attribute that is missing or falsy never matches, even when
    /// the expected value is itself falsy.
    pub fn matches(&self, record: &Record) -> bool {
        self.0.iter().all(|(key, expected)| match record.get(key) {
            Some(actual) => is_truthy(actual) && values_equal(actual, expected),
            None => false,
        })
    }
}

impl From<IndexMap<String, Value>> for Criteria {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self(map)
    }
}

/// Structural equality, except that numbers compare by value (`512 == 512.0`)
fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        _ => actual == expected,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

impl FromStr for Criteria {
    type Err = CloudError;

    fn from_str(input: &str) -> Result<Self> {
        LiteralParser::new(input).parse()
    }
}

impl std::fmt::Display for Criteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_quoted(f, key)?;
            f.write_str(": ")?;
            match value {
                Value::String(s) => write_quoted(f, s)?,
                Value::Bool(true) => f.write_str("True")?,
                Value::Bool(false) => f.write_str("False")?,
                Value::Null => f.write_str("None")?,
                other => write!(f, "{}", other)?,
            }
        }
        f.write_str("}")
    }
}

fn write_quoted(f: &mut std::fmt::Formatter<'_>, s: &str) -> std::fmt::Result {
    f.write_str("'")?;
    for c in s.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("'")
}

/// Recursive-descent parser for the mapping literal syntax
struct LiteralParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> LiteralParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(mut self) -> Result<Criteria> {
        self.skip_whitespace();
        if self.at_end() {
            return Ok(Criteria::default());
        }

        self.expect('{')?;
        let mut map = IndexMap::new();
        loop {
            self.skip_whitespace();
            if self.eat('}') {
                break;
            }

            let key = self.parse_string()?;
            self.skip_whitespace();
            self.expect(':')?;
            self.skip_whitespace();
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            self.expect('}')?;
            break;
        }

        self.skip_whitespace();
        if !self.at_end() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(Criteria(map))
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", expected)))
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, reason: &str) -> CloudError {
        CloudError::MalformedCriteria {
            input: self.input.to_string(),
            offset: self.pos,
            reason: reason.to_string(),
        }
    }

    fn parse_string(&mut self) -> Result<String> {
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected a quoted string")),
        };
        self.bump();

        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c) => out.push(c),
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        match self.peek() {
            Some('\'' | '"') => Ok(Value::String(self.parse_string()?)),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                self.parse_number()
            }
            Some(c) if c.is_ascii_alphabetic() => self.parse_keyword(),
            _ => Err(self.error("expected a value")),
        }
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
        {
            self.bump();
        }
        let text = &self.input[start..self.pos];

        if let Ok(i) = text.parse::<i64>() {
            return Ok(Value::Number(i.into()));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| CloudError::MalformedCriteria {
                input: self.input.to_string(),
                offset: start,
                reason: format!("invalid number '{}'", text),
            })
    }

    fn parse_keyword(&mut self) -> Result<Value> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.bump();
        }

        match &self.input[start..self.pos] {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            word => Err(CloudError::MalformedCriteria {
                input: self.input.to_string(),
                offset: start,
                reason: format!("unknown literal '{}'", word),
            }),
        }
    }
}
