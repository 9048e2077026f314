//! Bracketed text form.
//!
//! ```text
//! «AND "comment" «n:anyof"Lightning Bolt"» «cmc:<=1»»
//! ```
//!
//! A group is its mode keyword, an optional quoted comment and its
//! children. A leaf is `code:body`; the body grammar depends on the leaf
//! family. Inside quoted strings and regex literals a backslash escapes
//! the next character, and the delimiters, quotes, slashes and
//! backslashes are always escaped on output, so delimiter depth can be
//! tracked without understanding the bodies.

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::cards::{ColorSet, ManaCost};
use crate::error::ParseError;
use crate::filter::attribute::{FilterAttribute, LeafShape};
use crate::filter::comparison::Comparison;
use crate::filter::containment::Containment;
use crate::filter::group::{FilterGroup, GroupMode};
use crate::filter::leaf::{
    ColorFilter, LeafFilter, LegalityFilter, ManaCostFilter, NumberFilter, OptionsFilter,
    TextFilter, TypeLineFilter, VariableNumberFilter,
};
use crate::filter::{Filter, BEGIN_GROUP, END_GROUP, MAX_DEPTH};

const ESCAPE: char = '\\';
const QUOTE: char = '"';
const SLASH: char = '/';

// === Writing ===

pub(crate) fn write(filter: &Filter, out: &mut String) {
    out.push(BEGIN_GROUP);
    match filter {
        Filter::Group(group) => {
            out.push_str(group.mode.keyword());
            if !group.comment.is_empty() {
                out.push(' ');
                push_quoted(out, &group.comment, QUOTE);
            }
            for child in group.children() {
                out.push(' ');
                write(child, out);
            }
        }
        Filter::Leaf(leaf) => {
            out.push_str(leaf.attribute().code());
            out.push(':');
            write_body(leaf, out);
        }
    }
    out.push(END_GROUP);
}

fn write_body(leaf: &LeafFilter, out: &mut String) {
    match leaf {
        LeafFilter::Text(f) => {
            out.push_str(f.contain.code());
            let delimiter = if f.is_regex() { SLASH } else { QUOTE };
            push_quoted(out, f.text(), delimiter);
        }
        LeafFilter::Options(f) => {
            out.push_str(f.contain.code());
            push_values(out, &f.selected);
        }
        LeafFilter::Legality(f) => {
            out.push_str(f.contain.code());
            push_values(out, &f.selected);
            if f.restricted {
                out.push('r');
            }
        }
        LeafFilter::Number(f) => push_operation(out, f.operation, f.operand),
        LeafFilter::VariableNumber(f) => {
            let default_operation = f.operation == Comparison::default() && f.operand == 0.0;
            if f.varies {
                out.push('*');
            }
            if !f.varies || !default_operation {
                push_operation(out, f.operation, f.operand);
            }
        }
        LeafFilter::ManaCost(f) => {
            out.push_str(f.contain.code());
            push_quoted(out, &f.cost.to_string(), QUOTE);
        }
        LeafFilter::Color(f) => {
            out.push_str(f.contain.code());
            push_quoted(out, &f.colors.to_string(), QUOTE);
            if f.multicolored {
                out.push('M');
            }
        }
        LeafFilter::TypeLine(f) => {
            out.push_str(f.contain.code());
            push_quoted(out, &f.line, QUOTE);
        }
        LeafFilter::Binary(_) => {}
    }
}

fn push_operation(out: &mut String, operation: Comparison, operand: f64) {
    // Writing to a String cannot fail.
    let _ = write!(out, "{}{}", operation.symbol(), operand);
}

fn push_values(out: &mut String, values: &BTreeSet<String>) {
    out.push('{');
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_quoted(out, value, QUOTE);
    }
    out.push('}');
}

fn push_quoted(out: &mut String, text: &str, delimiter: char) {
    out.push(delimiter);
    for c in text.chars() {
        if matches!(c, ESCAPE | QUOTE | SLASH | BEGIN_GROUP | END_GROUP) {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out.push(delimiter);
}

// === Parsing ===

pub(crate) fn parse(text: &str) -> Result<Filter, ParseError> {
    let mut parser = Parser {
        src: text,
        pos: 0,
        depth: 0,
    };
    parser.skip_whitespace();
    if parser.at_end() {
        return Err(ParseError::Empty);
    }

    let filter = parser.node()?;

    parser.skip_whitespace();
    match parser.peek() {
        None => Ok(filter),
        Some(END_GROUP) => Err(ParseError::Unbalanced { offset: parser.pos }),
        Some(_) => Err(ParseError::TrailingInput(parser.rest().to_string())),
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    /// Groups currently open.
    depth: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            None if expected == END_GROUP => Err(ParseError::Unbalanced { offset: self.pos }),
            _ => Err(ParseError::Expected {
                expected,
                offset: self.pos,
            }),
        }
    }

    /// One bracketed filter, starting at `«`.
    fn node(&mut self) -> Result<Filter, ParseError> {
        self.expect(BEGIN_GROUP)?;

        let head_len = self
            .rest()
            .find(|c: char| matches!(c, ':' | BEGIN_GROUP | END_GROUP | QUOTE) || c.is_whitespace())
            .unwrap_or(self.rest().len());
        let head = &self.rest()[..head_len];
        let is_leaf = self.rest()[head_len..].starts_with(':');
        self.pos += head_len;

        if is_leaf {
            self.bump();
            let attribute = FilterAttribute::from_code(head)
                .ok_or_else(|| ParseError::UnknownAttribute(head.to_string()))?;
            let body = self.leaf_body()?;
            self.expect(END_GROUP)?;
            parse_leaf(attribute, body).map(Filter::Leaf)
        } else {
            let mode: GroupMode = head.parse()?;
            if self.depth >= MAX_DEPTH {
                return Err(ParseError::TooDeep(MAX_DEPTH));
            }
            self.depth += 1;
            let group = self.group(mode);
            self.depth -= 1;
            group.map(Filter::Group)
        }
    }

    /// Raw body of a leaf, up to its unescaped closing delimiter.
    fn leaf_body(&mut self) -> Result<&'a str, ParseError> {
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(ParseError::Unbalanced { offset: self.pos }),
                Some(END_GROUP) => return Ok(&self.src[start..self.pos]),
                Some(BEGIN_GROUP) => return Err(ParseError::Unbalanced { offset: self.pos }),
                Some(ESCAPE) => {
                    self.bump();
                    self.bump();
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn group(&mut self, mode: GroupMode) -> Result<FilterGroup, ParseError> {
        let mut group = FilterGroup::new(mode);

        self.skip_whitespace();
        if self.peek() == Some(QUOTE) {
            let (comment, rest) = unquote(self.rest(), QUOTE).ok_or(ParseError::Expected {
                expected: QUOTE,
                offset: self.src.len(),
            })?;
            group.comment = comment;
            self.pos = self.src.len() - rest.len();
        }

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(END_GROUP) => {
                    self.bump();
                    return Ok(group);
                }
                Some(BEGIN_GROUP) => {
                    let index = group.len();
                    let child = self.node().map_err(|source| ParseError::Child {
                        index,
                        source: Box::new(source),
                    })?;
                    group.push(child);
                }
                None => return Err(ParseError::Unbalanced { offset: self.pos }),
                Some(_) => {
                    return Err(ParseError::Expected {
                        expected: BEGIN_GROUP,
                        offset: self.pos,
                    })
                }
            }
        }
    }
}

/// Read a delimited, escaped string from the start of `input`.
///
/// Returns the unescaped contents and the input after the closing
/// delimiter, or `None` if the string is not terminated.
fn unquote(input: &str, delimiter: char) -> Option<(String, &str)> {
    let mut chars = input.strip_prefix(delimiter)?.char_indices();
    let offset = delimiter.len_utf8();
    let mut text = String::new();
    while let Some((i, c)) = chars.next() {
        match c {
            ESCAPE => text.push(chars.next()?.1),
            c if c == delimiter => return Some((text, &input[offset + i + c.len_utf8()..])),
            c => text.push(c),
        }
    }
    None
}

// === Leaf bodies ===

fn parse_leaf(attribute: FilterAttribute, body: &str) -> Result<LeafFilter, ParseError> {
    let code = attribute.code();
    let body = body.trim();
    let leaf = match attribute.shape() {
        LeafShape::Text => {
            let (contain, rest) = Containment::split_prefix(body)?;
            let regex = rest.starts_with(SLASH);
            let delimiter = if regex { SLASH } else { QUOTE };
            let text = quoted_only(code, rest, delimiter)?;
            LeafFilter::Text(
                TextFilter::for_attribute(attribute)
                    .with_containment(contain)
                    .with_regex(regex)
                    .with_text(text),
            )
        }
        LeafShape::Options => {
            let (contain, rest) = Containment::split_prefix(body)?;
            let (selected, rest) = values(code, rest)?;
            trailing(code, rest)?;
            let mut f = OptionsFilter::for_attribute(attribute).with_containment(contain);
            f.selected = selected;
            LeafFilter::Options(f)
        }
        LeafShape::Legality => {
            let (contain, rest) = Containment::split_prefix(body)?;
            let (selected, rest) = values(code, rest)?;
            let restricted = flag(code, rest, 'r')?;
            LeafFilter::Legality(LegalityFilter {
                contain,
                selected,
                restricted,
            })
        }
        LeafShape::Number => {
            let (operation, operand) = operation(code, body)?;
            LeafFilter::Number(NumberFilter::new().with(operation, operand))
        }
        LeafShape::VariableNumber => {
            let (varies, rest) = match body.strip_prefix('*') {
                Some(rest) => (true, rest.trim_start()),
                None => (false, body),
            };
            let f = VariableNumberFilter::for_attribute(attribute).with_varies(varies);
            if varies && rest.is_empty() {
                LeafFilter::VariableNumber(f)
            } else {
                let (operation, operand) = operation(code, rest)?;
                LeafFilter::VariableNumber(f.with(operation, operand))
            }
        }
        LeafShape::ManaCost => {
            let (contain, rest) = Containment::split_prefix(body)?;
            let cost: ManaCost = quoted_only(code, rest, QUOTE)?.parse()?;
            LeafFilter::ManaCost(ManaCostFilter::new().with_containment(contain).with_cost(cost))
        }
        LeafShape::Color => {
            let (contain, rest) = Containment::split_prefix(body)?;
            let (symbols, rest) = quoted(code, rest, QUOTE)?;
            let colors = ColorSet::parse(&symbols)
                .ok_or_else(|| ParseError::body(code, format!("invalid colors {symbols:?}")))?;
            let multicolored = flag(code, rest, 'M')?;
            LeafFilter::Color(
                ColorFilter::for_attribute(attribute)
                    .with_containment(contain)
                    .with_colors(colors)
                    .with_multicolored(multicolored),
            )
        }
        LeafShape::TypeLine => {
            let (contain, rest) = Containment::split_prefix(body)?;
            let line = quoted_only(code, rest, QUOTE)?;
            LeafFilter::TypeLine(TypeLineFilter::new().with_containment(contain).with_line(line))
        }
        LeafShape::Binary => {
            trailing(code, body)?;
            LeafFilter::Binary(attribute == FilterAttribute::AnyCard)
        }
    };
    Ok(leaf)
}

fn quoted<'b>(code: &str, body: &'b str, delimiter: char) -> Result<(String, &'b str), ParseError> {
    unquote(body.trim_start(), delimiter)
        .ok_or_else(|| ParseError::body(code, format!("expected a {delimiter}-delimited string")))
}

fn quoted_only(code: &str, body: &str, delimiter: char) -> Result<String, ParseError> {
    let (text, rest) = quoted(code, body, delimiter)?;
    trailing(code, rest)?;
    Ok(text)
}

fn values<'b>(code: &str, body: &'b str) -> Result<(BTreeSet<String>, &'b str), ParseError> {
    let mut rest = body
        .trim_start()
        .strip_prefix('{')
        .ok_or_else(|| ParseError::body(code, "expected '{'"))?
        .trim_start();

    let mut selected = BTreeSet::new();
    if let Some(after) = rest.strip_prefix('}') {
        return Ok((selected, after));
    }
    loop {
        let (value, after) = quoted(code, rest, QUOTE)?;
        selected.insert(value);
        let after = after.trim_start();
        if let Some(after) = after.strip_prefix(',') {
            rest = after;
        } else if let Some(after) = after.strip_prefix('}') {
            return Ok((selected, after));
        } else {
            return Err(ParseError::body(code, "expected ',' or '}'"));
        }
    }
}

fn operation(code: &str, body: &str) -> Result<(Comparison, f64), ParseError> {
    let (operation, rest) = Comparison::split_prefix(body.trim())?;
    let operand = rest
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseError::body(code, format!("invalid number {:?}", rest.trim())))?;
    Ok((operation, operand))
}

/// An optional single-letter flag ending a body.
fn flag(code: &str, rest: &str, letter: char) -> Result<bool, ParseError> {
    let rest = rest.trim();
    match rest.strip_prefix(letter) {
        Some(after) => trailing(code, after).map(|()| true),
        None => trailing(code, rest).map(|()| false),
    }
}

fn trailing(code: &str, rest: &str) -> Result<(), ParseError> {
    match rest.trim() {
        "" => Ok(()),
        s => Err(ParseError::body(code, format!("unexpected {s:?}"))),
    }
}
