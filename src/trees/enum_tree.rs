use super::{body, gap, word, Tree};
use crate::ast::{DataToken, DeclarationToken, Kind, PropertyToken, Token};
use crate::definitions::{self, noncode, SCALAR};
use crate::error::ParserError;
use crate::lexer::Lexer;

/// `enum Name { KEY "value" ... }`
#[derive(Debug, Clone)]
pub struct EnumTree {
    lexer: Lexer,
}

impl EnumTree {
    pub fn new() -> Self {
        Self::with_lexer(Lexer::new())
    }

    pub fn with_lexer(mut lexer: Lexer) -> Self {
        Self::definitions(&mut lexer);
        Self { lexer }
    }
}

impl Default for EnumTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree for EnumTree {
    type Output = DeclarationToken;

    fn definitions(lexer: &mut Lexer) -> &mut Lexer {
        definitions::install(lexer).define("EnumWord", enum_word)
    }

    fn lexer(&mut self) -> &mut Lexer {
        &mut self.lexer
    }

    fn declaration(&mut self) -> Result<DeclarationToken, ParserError> {
        enumeration(&mut self.lexer)
    }
}

fn enum_word(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    word("_EnumWord", "enum", code, start)
}

pub(super) fn enumeration(lexer: &mut Lexer) -> Result<DeclarationToken, ParserError> {
    let keyword = lexer.expect(&["EnumWord"])?;
    lexer.expect(&["whitespace"])?;
    let id = lexer.expect_identifier(&["CapitalIdentifier"])?;
    noncode(lexer);
    let init = body(lexer, option)?;
    Ok(DeclarationToken::new(Kind::Enum, id, init, keyword.start(), lexer.index()))
}

/// `KEY "value"`; enum values are always scalars.
fn option(lexer: &mut Lexer) -> Result<PropertyToken, ParserError> {
    let key = lexer.expect_identifier(&["AnyIdentifier"])?;
    gap(lexer)?;
    let value = lexer.expect_literal(SCALAR)?;
    let (start, end) = (key.start, value.end);
    Ok(PropertyToken::new(key, DataToken::Literal(value), start, end))
}
