use super::{attributes, body, word, Tree};
use crate::ast::{
    DataToken, DeclarationToken, IdentifierToken, Kind, LiteralToken, ObjectToken, PropertyToken,
    Scalar, Token,
};
use crate::definitions::{self, noncode};
use crate::error::ParserError;
use crate::lexer::Lexer;

/// `type Name[!] @attribute... { column Type[][?] @attribute... }`
///
/// Types are mutable unless the name carries a trailing `!`.
#[derive(Debug, Clone)]
pub struct TypeTree {
    lexer: Lexer,
}

impl TypeTree {
    pub fn new() -> Self {
        Self::with_lexer(Lexer::new())
    }

    pub fn with_lexer(mut lexer: Lexer) -> Self {
        Self::definitions(&mut lexer);
        Self { lexer }
    }
}

impl Default for TypeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree for TypeTree {
    type Output = DeclarationToken;

    fn definitions(lexer: &mut Lexer) -> &mut Lexer {
        definitions::install(lexer)
            .define("ColumnType", column_type)
            .define("TypeWord", type_word)
    }

    fn lexer(&mut self) -> &mut Lexer {
        &mut self.lexer
    }

    fn declaration(&mut self) -> Result<DeclarationToken, ParserError> {
        structure(&mut self.lexer, Kind::Type)
    }
}

fn type_word(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    word("_TypeWord", "type", code, start)
}

/// A column type such as `String`, `Address[]` or `Date[]?`, read as one string literal.
fn column_type(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    let rest = code.get(start..)?;
    if !rest.starts_with(|c: char| c.is_ascii_uppercase()) {
        return None;
    }
    let mut end = start
        + rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
    if code[end..].starts_with("[]") {
        end += 2;
    }
    if code[end..].starts_with('?') {
        end += 1;
    }
    let raw = code[start..end].to_string();
    Some(Token::Data(DataToken::Literal(LiteralToken {
        start,
        end,
        value: Scalar::String(raw.clone()),
        raw,
    })))
}

/// Shared by `type` and `model`: the two differ only by keyword and by
/// which way `!` flips mutability.
pub(super) fn structure(lexer: &mut Lexer, kind: Kind) -> Result<DeclarationToken, ParserError> {
    let (reader, default) = match kind {
        Kind::Model => ("ModelWord", false),
        _ => ("TypeWord", true),
    };
    let keyword = lexer.expect(&[reader])?;
    lexer.expect(&["whitespace"])?;
    let id = lexer.expect_identifier(&["CapitalIdentifier"])?;
    let flipped = lexer.optional(&["!"])?.is_some();
    let parameters = attributes(lexer)?;
    noncode(lexer);
    let columns = body(lexer, column)?;

    let end = lexer.index();
    let label = |name: &str| IdentifierToken {
        start: keyword.start(),
        end: keyword.end(),
        name: name.to_string(),
    };
    let init = ObjectToken {
        start: keyword.start(),
        end,
        properties: vec![
            PropertyToken::new(
                label("attributes"),
                DataToken::Object(parameters),
                keyword.start(),
                end,
            ),
            PropertyToken::new(label("columns"), DataToken::Object(columns), keyword.start(), end),
        ],
    };

    let mut declaration = DeclarationToken::new(kind, id, init, keyword.start(), end);
    declaration.mutable = Some(default != flipped);
    Ok(declaration)
}

/// `name Type @attribute...` folded into `name { type "Type" attributes { ... } }`.
fn column(lexer: &mut Lexer) -> Result<PropertyToken, ParserError> {
    let key = lexer.expect_identifier(&["CamelIdentifier"])?;
    lexer.expect(&["whitespace"])?;
    let kind = lexer.expect_literal(&["ColumnType"])?;
    let parameters = attributes(lexer)?;

    let start = kind.start;
    let end = lexer.index();
    let field = |name: &str, at: &LiteralToken| IdentifierToken {
        start: at.start,
        end: at.end,
        name: name.to_string(),
    };
    let properties = vec![
        PropertyToken::new(field("type", &kind), DataToken::Literal(kind.clone()), start, kind.end),
        PropertyToken::new(
            field("attributes", &kind),
            DataToken::Object(parameters),
            start,
            end,
        ),
    ];
    let value = DataToken::Object(ObjectToken {
        start,
        end,
        properties,
    });
    let key_start = key.start;
    Ok(PropertyToken::new(key, value, key_start, end))
}
