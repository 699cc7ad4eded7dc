use super::{word, Tree};
use crate::ast::{DeclarationToken, Kind, Token};
use crate::definitions::{self, noncode};
use crate::error::ParserError;
use crate::lexer::Lexer;

/// `prop Name { key value ... }`
#[derive(Debug, Clone)]
pub struct PropTree {
    lexer: Lexer,
}

impl PropTree {
    pub fn new() -> Self {
        Self::with_lexer(Lexer::new())
    }

    pub fn with_lexer(mut lexer: Lexer) -> Self {
        Self::definitions(&mut lexer);
        Self { lexer }
    }
}

impl Default for PropTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree for PropTree {
    type Output = DeclarationToken;

    fn definitions(lexer: &mut Lexer) -> &mut Lexer {
        definitions::install(lexer).define("PropWord", prop_word)
    }

    fn lexer(&mut self) -> &mut Lexer {
        &mut self.lexer
    }

    fn declaration(&mut self) -> Result<DeclarationToken, ParserError> {
        prop(&mut self.lexer)
    }
}

fn prop_word(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    word("_PropWord", "prop", code, start)
}

pub(super) fn prop(lexer: &mut Lexer) -> Result<DeclarationToken, ParserError> {
    let keyword = lexer.expect(&["PropWord"])?;
    lexer.expect(&["whitespace"])?;
    let id = lexer.expect_identifier(&["CapitalIdentifier"])?;
    noncode(lexer);
    let init = lexer.expect_object(&["Object"])?;
    let end = init.end;
    Ok(DeclarationToken::new(Kind::Prop, id, init, keyword.start(), end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::DataToken;

    #[test]
    fn test_prop() {
        let code = "prop Text { type \"text\" format \"lowercase\" }";
        let token = PropTree::parse_str(code).unwrap();
        assert_eq!(token.kind, Kind::Prop);
        assert_eq!(token.name(), Some("Text"));
        assert_eq!(token.end, code.len());
        let init = &token.declarator().unwrap().init;
        assert_eq!(init.properties.len(), 2);
        assert_eq!(init.properties[1].key.name, "format");
    }

    #[test]
    fn test_prop_with_nested_values() {
        let code = "prop Config {\n  sizes [ 1 2 3 ]\n  range { min 0 max 10.5 }\n  enabled true\n}";
        let token = PropTree::parse_str(code).unwrap();
        let init = &token.declarator().unwrap().init;
        assert!(matches!(init.properties[0].value, DataToken::Array(_)));
        assert!(matches!(init.properties[1].value, DataToken::Object(_)));
        assert!(matches!(init.properties[2].value, DataToken::Literal(_)));
    }

    #[test]
    fn test_prop_requires_capital_name() {
        let err = PropTree::parse_str("prop text { type \"text\" }").unwrap_err();
        assert_eq!(err.to_string(), "Unexpected text expecting CapitalIdentifier");
    }

    #[test]
    fn test_prop_requires_body() {
        assert!(PropTree::parse_str("prop Text").is_err());
        assert!(PropTree::parse_str("prop Text { type }").is_err());
    }
}
