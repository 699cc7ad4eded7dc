use super::type_tree::structure;
use super::{word, Tree, TypeTree};
use crate::ast::{DeclarationToken, Kind, Token};
use crate::error::ParserError;
use crate::lexer::Lexer;

/// `model Name[!] @attribute... { column Type @attribute... }`
///
/// Models share the type grammar but are immutable unless marked with `!`.
#[derive(Debug, Clone)]
pub struct ModelTree {
    lexer: Lexer,
}

impl ModelTree {
    pub fn new() -> Self {
        Self::with_lexer(Lexer::new())
    }

    pub fn with_lexer(mut lexer: Lexer) -> Self {
        Self::definitions(&mut lexer);
        Self { lexer }
    }
}

impl Default for ModelTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree for ModelTree {
    type Output = DeclarationToken;

    fn definitions(lexer: &mut Lexer) -> &mut Lexer {
        TypeTree::definitions(lexer).define("ModelWord", model_word)
    }

    fn lexer(&mut self) -> &mut Lexer {
        &mut self.lexer
    }

    fn declaration(&mut self) -> Result<DeclarationToken, ParserError> {
        structure(&mut self.lexer, Kind::Model)
    }
}

fn model_word(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    word("_ModelWord", "model", code, start)
}
