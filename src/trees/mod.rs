//! Recursive-descent parsers, one per declaration kind.
//!
//! Every tree owns a [`Lexer`] loaded with the readers it needs. The actual
//! grammar lives in free functions over `&mut Lexer` so that [`SchemaTree`]
//! can sequence the other trees on a single lexer.

mod enum_tree;
mod model_tree;
mod plugin_tree;
mod prop_tree;
mod schema_tree;
mod type_tree;
mod use_tree;

pub use enum_tree::EnumTree;
pub use model_tree::ModelTree;
pub use plugin_tree::PluginTree;
pub use prop_tree::PropTree;
pub use schema_tree::SchemaTree;
pub use type_tree::TypeTree;
pub use use_tree::UseTree;

use crate::ast::{ArrayToken, DataToken, LiteralToken, ObjectToken, PropertyToken, Scalar, Token};
use crate::definitions::{self, noncode};
use crate::error::ParserError;
use crate::lexer::Lexer;

pub trait Tree: Sized {
    type Output;

    /// Installs the readers this tree relies on.
    fn definitions(lexer: &mut Lexer) -> &mut Lexer;

    fn lexer(&mut self) -> &mut Lexer;

    /// Parses one construct at the lexer's cursor.
    fn declaration(&mut self) -> Result<Self::Output, ParserError>;

    fn parse(&mut self, code: &str, start: usize) -> Result<Self::Output, ParserError> {
        self.lexer().load(code, start);
        self.declaration()
    }

    /// Parses `code` with a throwaway tree.
    fn parse_str(code: &str) -> Result<Self::Output, ParserError>
    where
        Self: Default,
    {
        Self::default().parse(code, 0)
    }
}

/// Attribute arguments: any data value or a bare identifier reference.
const ARGUMENTS: &[&str] = &[
    "Null",
    "Boolean",
    "String",
    "Float",
    "Integer",
    "Environment",
    "Object",
    "Array",
    "AnyIdentifier",
];

/// A keyword read as a whole word.
fn word(kind: &str, word: &str, code: &str, start: usize) -> Option<Token> {
    let end = definitions::keyword(word, code, start)?;
    definitions::scan(kind, code, start, end)
}

/// Repeats `attempt` on a snapshot of the lexer until it fails or stops
/// making progress; the lexer is left after the last success.
///
/// Only expectation failures end the loop. An unknown definition is a
/// programming error and propagates.
fn dotry<T>(
    lexer: &mut Lexer,
    mut attempt: impl FnMut(&mut Lexer) -> Result<T, ParserError>,
) -> Result<Vec<T>, ParserError> {
    let mut results = Vec::new();
    loop {
        let checkpoint = lexer.clone();
        match attempt(lexer) {
            Ok(result) if lexer.index() > checkpoint.index() => results.push(result),
            Err(err @ ParserError::UnknownDefinition { .. }) => return Err(err),
            _ => {
                *lexer = checkpoint;
                return Ok(results);
            }
        }
    }
}

/// `{ property* }`
fn body(
    lexer: &mut Lexer,
    mut property: impl FnMut(&mut Lexer) -> Result<PropertyToken, ParserError>,
) -> Result<ObjectToken, ParserError> {
    let open = lexer.expect(&["{"])?;
    noncode(lexer);
    let properties = dotry(lexer, |lexer| {
        let property = property(lexer)?;
        noncode(lexer);
        Ok(property)
    })?;
    lexer.expect(&["}"])?;
    Ok(ObjectToken {
        start: open.start(),
        end: lexer.index(),
        properties,
    })
}

/// At least one whitespace or comment token, then any more of them.
fn gap(lexer: &mut Lexer) -> Result<(), ParserError> {
    lexer.expect(definitions::NONCODE)?;
    noncode(lexer);
    Ok(())
}

/// `@name` or `@name(arguments...)`.
///
/// A bare flag becomes `true`; an argument list becomes an array, even when empty.
fn parameter(lexer: &mut Lexer) -> Result<PropertyToken, ParserError> {
    let key = lexer.expect_identifier(&["AttributeIdentifier"])?;
    let value = if lexer.next(&["("])? {
        let open = lexer.expect(&["("])?;
        noncode(lexer);
        let mut elements = Vec::new();
        while lexer.next(ARGUMENTS)? {
            elements.push(lexer.expect_data(ARGUMENTS)?);
            noncode(lexer);
        }
        lexer.expect(&[")"])?;
        DataToken::Array(ArrayToken {
            start: open.start(),
            end: lexer.index(),
            elements,
        })
    } else {
        DataToken::Literal(LiteralToken {
            start: key.start,
            end: key.end,
            value: Scalar::Boolean(true),
            raw: "true".to_string(),
        })
    };
    let (start, end) = (key.start, value.end());
    Ok(PropertyToken::new(key, value, start, end))
}

/// Trailing attributes of a declaration or column.
fn attributes(lexer: &mut Lexer) -> Result<ObjectToken, ParserError> {
    let start = lexer.index();
    let properties = dotry(lexer, |lexer| {
        noncode(lexer);
        parameter(lexer)
    })?;
    Ok(ObjectToken {
        start,
        end: lexer.index(),
        properties,
    })
}
