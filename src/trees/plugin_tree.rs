use super::{word, Tree};
use crate::ast::{DeclarationToken, IdentifierToken, Kind, Scalar, Token};
use crate::definitions::{self, noncode};
use crate::error::ParserError;
use crate::lexer::Lexer;

/// `plugin "./path" { key value ... }`
#[derive(Debug, Clone)]
pub struct PluginTree {
    lexer: Lexer,
}

impl PluginTree {
    pub fn new() -> Self {
        Self::with_lexer(Lexer::new())
    }

    pub fn with_lexer(mut lexer: Lexer) -> Self {
        Self::definitions(&mut lexer);
        Self { lexer }
    }
}

impl Default for PluginTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree for PluginTree {
    type Output = DeclarationToken;

    fn definitions(lexer: &mut Lexer) -> &mut Lexer {
        definitions::install(lexer).define("PluginWord", plugin_word)
    }

    fn lexer(&mut self) -> &mut Lexer {
        &mut self.lexer
    }

    fn declaration(&mut self) -> Result<DeclarationToken, ParserError> {
        plugin(&mut self.lexer)
    }
}

fn plugin_word(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    word("_PluginWord", "plugin", code, start)
}

pub(super) fn plugin(lexer: &mut Lexer) -> Result<DeclarationToken, ParserError> {
    let keyword = lexer.expect(&["PluginWord"])?;
    lexer.expect(&["whitespace"])?;
    let path = lexer.expect_literal(&["String"])?;
    let name = match path.value {
        Scalar::String(value) => value,
        _ => path.raw,
    };
    let id = IdentifierToken {
        start: path.start,
        end: path.end,
        name,
    };
    noncode(lexer);
    let init = lexer.expect_object(&["Object"])?;
    let end = init.end;
    Ok(DeclarationToken::new(Kind::Plugin, id, init, keyword.start(), end))
}
