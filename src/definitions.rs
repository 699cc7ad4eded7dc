//! The grammar: every reader the trees build upon, registered by name.

use crate::ast::{
    ArrayToken, DataToken, IdentifierToken, LiteralToken, ObjectToken, PropertyToken, Scalar, Token,
    UnknownToken,
};
use crate::error::ParserError;
use crate::lexer::{Lexer, Reader};
use log::warn;

/// Readers producing a literal value.
pub const SCALAR: &[&str] = &["Null", "Boolean", "String", "Float", "Integer", "Environment"];

/// Readers producing any data value.
pub const DATA: &[&str] = &[
    "Null",
    "Boolean",
    "String",
    "Float",
    "Integer",
    "Environment",
    "Object",
    "Array",
];

/// Readers for text that carries no meaning.
pub const NONCODE: &[&str] = &["whitespace", "comment", "note"];

const CATALOG: &[(&str, Reader)] = &[
    ("line", line),
    ("space", space),
    ("whitespace", whitespace),
    ("note", note),
    ("comment", comment),
    (")", paren_close),
    ("(", paren_open),
    ("}", brace_close),
    ("{", brace_open),
    ("]", square_close),
    ("[", square_open),
    ("!", bang),
    ("Null", null),
    ("Boolean", boolean),
    ("String", string),
    ("Float", float),
    ("Integer", integer),
    ("Array", array),
    ("Object", object),
    ("Environment", environment),
    ("AnyIdentifier", any_identifier),
    ("UpperIdentifier", upper_identifier),
    ("CapitalIdentifier", capital_identifier),
    ("CamelIdentifier", camel_identifier),
    ("LowerIdentifier", lower_identifier),
    ("AttributeIdentifier", attribute_identifier),
];

/// Registers the whole catalog. Installing twice keeps one entry per key.
pub fn install(lexer: &mut Lexer) -> &mut Lexer {
    for (key, reader) in CATALOG {
        lexer.define(key, *reader);
    }
    lexer
}

/// Skips whitespace and comments at the cursor.
pub fn noncode(lexer: &mut Lexer) {
    while let Ok(Some(_)) = lexer.optional(NONCODE) {}
}

// --- Scanning helpers ---

/// Length in bytes of the longest prefix of `code[start..]` whose chars satisfy `accept`.
fn span_while(code: &str, start: usize, accept: impl Fn(char) -> bool) -> usize {
    code.get(start..).map_or(0, |rest| {
        rest.char_indices()
            .find(|(_, c)| !accept(*c))
            .map_or(rest.len(), |(offset, _)| offset)
    })
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// True when `code[end..]` does not continue a word.
fn boundary(code: &str, end: usize) -> bool {
    !code.get(end..).and_then(|rest| rest.chars().next()).is_some_and(is_word)
}

/// Matches `word` at `start` only as a whole word.
pub fn keyword(word: &str, code: &str, start: usize) -> Option<usize> {
    let end = start + word.len();
    (code.get(start..end)? == word && boundary(code, end)).then_some(end)
}

/// Builds a structural token spanning `start..end`.
pub fn scan(kind: &str, code: &str, start: usize, end: usize) -> Option<Token> {
    if end <= start {
        return None;
    }
    let value = code.get(start..end)?.to_string();
    Some(Token::Unknown(UnknownToken {
        kind: kind.to_string(),
        start,
        end,
        raw: value.clone(),
        value,
    }))
}

fn literal(value: Scalar, code: &str, start: usize, end: usize) -> Option<Token> {
    Some(Token::Data(DataToken::Literal(LiteralToken {
        start,
        end,
        value,
        raw: code.get(start..end)?.to_string(),
    })))
}

/// Reads a whole word and hands it to `valid` before accepting it as an identifier.
fn identifier(code: &str, start: usize, valid: impl Fn(&str) -> bool) -> Option<Token> {
    let first = code.get(start..)?.chars().next()?;
    if first.is_ascii_digit() {
        return None;
    }
    let end = start + span_while(code, start, is_word);
    let name = code.get(start..end)?;
    if name.is_empty() || !valid(name) {
        return None;
    }
    Some(Token::Data(DataToken::Identifier(IdentifierToken {
        start,
        end,
        name: name.to_string(),
    })))
}

// --- Whitespace and comments ---

fn line(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    let end = start + span_while(code, start, |c| c == '\n' || c == '\r');
    scan("_Line", code, start, end)
}

fn space(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    let end = start + span_while(code, start, |c| c == ' ');
    scan("_Space", code, start, end)
}

fn whitespace(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    let end = start + span_while(code, start, char::is_whitespace);
    scan("_Whitespace", code, start, end)
}

/// `/* ... */`, ending at the first `*/`.
fn note(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    let body = code.get(start..)?.strip_prefix("/*")?;
    let close = body.find("*/")?;
    scan("_Note", code, start, start + 2 + close + 2)
}

fn comment(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    code.get(start..)?.strip_prefix("//")?;
    let end = start + 2 + span_while(code, start + 2, |c| c != '\n' && c != '\r');
    scan("_Comment", code, start, end)
}

// --- Structural ---

fn symbol(kind: &str, symbol: char, code: &str, start: usize) -> Option<Token> {
    if code.get(start..)?.starts_with(symbol) {
        scan(kind, code, start, start + symbol.len_utf8())
    } else {
        None
    }
}

fn paren_close(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    symbol("_ParenClose", ')', code, start)
}

fn paren_open(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    symbol("_ParenOpen", '(', code, start)
}

fn brace_close(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    symbol("_BraceClose", '}', code, start)
}

fn brace_open(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    symbol("_BraceOpen", '{', code, start)
}

fn square_close(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    symbol("_SquareClose", ']', code, start)
}

fn square_open(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    symbol("_SquareOpen", '[', code, start)
}

fn bang(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    symbol("_Final", '!', code, start)
}

// --- Literals ---

fn null(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    let end = keyword("null", code, start)?;
    literal(Scalar::Null, code, start, end)
}

fn boolean(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    if let Some(end) = keyword("true", code, start) {
        return literal(Scalar::Boolean(true), code, start, end);
    }
    let end = keyword("false", code, start)?;
    literal(Scalar::Boolean(false), code, start, end)
}

/// Double or single quoted. There are no escapes; the string ends at the next matching quote.
fn string(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    let rest = code.get(start..)?;
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let close = rest[1..].find(quote)?;
    let value = rest[1..1 + close].to_string();
    literal(Scalar::String(value), code, start, start + close + 2)
}

/// Length of `-?\d+` at `start`.
fn digits(code: &str, start: usize) -> Option<usize> {
    let sign = usize::from(code.get(start..)?.starts_with('-'));
    let count = span_while(code, start + sign, |c| c.is_ascii_digit());
    (count > 0).then_some(sign + count)
}

fn float(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    let whole = start + digits(code, start)?;
    if !code.get(whole..)?.starts_with('.') {
        return None;
    }
    let fraction = span_while(code, whole + 1, |c| c.is_ascii_digit());
    if fraction == 0 {
        return None;
    }
    let end = whole + 1 + fraction;
    let value = code.get(start..end)?.parse::<f64>().ok()?;
    literal(Scalar::Float(value), code, start, end)
}

fn integer(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    let end = start + digits(code, start)?;
    let value = code.get(start..end)?.parse::<i64>().ok()?;
    literal(Scalar::Integer(value), code, start, end)
}

/// `env("NAME")`, `env('NAME')` or `env(NAME)`, read from the process environment.
fn environment(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    let inner = code.get(start..)?.strip_prefix("env(")?;
    let (name, length) = match inner.chars().next()? {
        quote @ ('"' | '\'') => {
            let close = inner[1..].find(quote)?;
            if !inner[1 + close + 1..].starts_with(')') {
                return None;
            }
            (&inner[1..1 + close], close + 3)
        }
        _ => {
            let close = inner.find(')')?;
            let name = &inner[..close];
            if name.is_empty() || !name.chars().all(is_word) {
                return None;
            }
            (name, close + 1)
        }
    };

    let value = std::env::var(name).unwrap_or_else(|_| {
        warn!("Environment variable `{}` is not set, using an empty string", name);
        String::new()
    });
    literal(Scalar::String(value), code, start, start + 4 + length)
}

// --- Composites ---

fn array(code: &str, start: usize, lexer: &Lexer) -> Option<Token> {
    if !code.get(start..)?.starts_with('[') {
        return None;
    }
    let mut sub = lexer.fork(code, start);
    let elements = read_elements(&mut sub).ok()?;
    Some(Token::Data(DataToken::Array(ArrayToken {
        start,
        end: sub.index(),
        elements,
    })))
}

fn read_elements(lexer: &mut Lexer) -> Result<Vec<DataToken>, ParserError> {
    lexer.expect(&["["])?;
    noncode(lexer);
    let mut elements = Vec::new();
    while lexer.next(DATA)? {
        elements.push(lexer.expect_data(DATA)?);
        noncode(lexer);
    }
    lexer.expect(&["]"])?;
    Ok(elements)
}

fn object(code: &str, start: usize, lexer: &Lexer) -> Option<Token> {
    if !code.get(start..)?.starts_with('{') {
        return None;
    }
    let mut sub = lexer.fork(code, start);
    let properties = read_properties(&mut sub).ok()?;
    Some(Token::Data(DataToken::Object(ObjectToken {
        start,
        end: sub.index(),
        properties,
    })))
}

fn read_properties(lexer: &mut Lexer) -> Result<Vec<PropertyToken>, ParserError> {
    lexer.expect(&["{"])?;
    noncode(lexer);
    let mut properties = Vec::new();
    while lexer.next(&["AnyIdentifier"])? {
        let key = lexer.expect_identifier(&["AnyIdentifier"])?;
        lexer.expect(NONCODE)?;
        noncode(lexer);
        let value = lexer.expect_data(DATA)?;
        noncode(lexer);
        let (start, end) = (key.start, value.end());
        properties.push(PropertyToken::new(key, value, start, end));
    }
    lexer.expect(&["}"])?;
    Ok(properties)
}

// --- Identifiers ---

fn any_identifier(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    identifier(code, start, |_| true)
}

/// `[A-Z_][A-Z0-9_]*`
fn upper_identifier(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    identifier(code, start, |name| {
        name.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    })
}

/// `[A-Z_][a-zA-Z0-9_]*`
fn capital_identifier(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    identifier(code, start, |name| {
        name.starts_with(|c: char| c.is_ascii_uppercase() || c == '_')
    })
}

/// `[a-z_][a-zA-Z0-9_]*`
fn camel_identifier(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    identifier(code, start, |name| {
        name.starts_with(|c: char| c.is_ascii_lowercase() || c == '_')
    })
}

/// `[a-z_][a-z0-9_]*`
fn lower_identifier(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    identifier(code, start, |name| {
        name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    })
}

/// `@name` or `@ns.name`. The `@` is not part of the identifier name.
fn attribute_identifier(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    let rest = code.get(start..)?.strip_prefix('@')?;
    if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let mut end = start + 1 + span_while(code, start + 1, is_word);
    while code.get(end..)?.starts_with('.') {
        let segment = span_while(code, end + 1, is_word);
        if segment == 0 {
            break;
        }
        end += 1 + segment;
    }
    Some(Token::Data(DataToken::Identifier(IdentifierToken {
        start,
        end,
        name: code.get(start + 1..end)?.to_string(),
    })))
}
