use super::{word, Tree};
use crate::ast::{ImportToken, Token};
use crate::definitions;
use crate::error::ParserError;
use crate::lexer::Lexer;

/// `use "./path.idea"`
#[derive(Debug, Clone)]
pub struct UseTree {
    lexer: Lexer,
}

impl UseTree {
    pub fn new() -> Self {
        Self::with_lexer(Lexer::new())
    }

    pub fn with_lexer(mut lexer: Lexer) -> Self {
        Self::definitions(&mut lexer);
        Self { lexer }
    }
}

impl Default for UseTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree for UseTree {
    type Output = ImportToken;

    fn definitions(lexer: &mut Lexer) -> &mut Lexer {
        definitions::install(lexer).define("UseWord", use_word)
    }

    fn lexer(&mut self) -> &mut Lexer {
        &mut self.lexer
    }

    fn declaration(&mut self) -> Result<ImportToken, ParserError> {
        import(&mut self.lexer)
    }
}

fn use_word(code: &str, start: usize, _: &Lexer) -> Option<Token> {
    word("_UseWord", "use", code, start)
}

pub(super) fn import(lexer: &mut Lexer) -> Result<ImportToken, ParserError> {
    let keyword = lexer.expect(&["UseWord"])?;
    lexer.expect(&["whitespace"])?;
    let source = lexer.expect_literal(&["String"])?;
    Ok(ImportToken {
        start: keyword.start(),
        end: source.end,
        specifiers: Vec::new(),
        source,
    })
}
