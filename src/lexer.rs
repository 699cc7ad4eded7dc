use crate::ast::{DataToken, IdentifierToken, LiteralToken, ObjectToken, Token};
use crate::error::ParserError;
use miette::{NamedSource, SourceSpan};
use std::sync::Arc;

/// A reader tries to recognize one kind of token at `start` in `code`.
///
/// Readers never move the cursor themselves. The lexer passed in is only there
/// so composite readers (objects, arrays) can fork a sub-lexer that shares the
/// same dictionary.
pub type Reader = fn(&str, usize, &Lexer) -> Option<Token>;

/// A named reader registered in a lexer's dictionary.
#[derive(Debug, Clone)]
pub struct Definition {
    pub key: String,
    pub reader: Reader,
}

/// A cursor over source text plus an ordered dictionary of readers.
///
/// Cloning is cheap: the source text and the dictionary are reference counted,
/// only the cursor is copied. A clone is therefore a snapshot that can be
/// advanced speculatively and thrown away without touching the original.
#[derive(Debug, Clone)]
pub struct Lexer {
    code: Arc<str>,
    index: usize,
    name: Arc<str>,
    dictionary: Arc<Vec<Definition>>,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    pub fn new() -> Self {
        Self {
            code: Arc::from(""),
            index: 0,
            name: Arc::from("schema.idea"),
            dictionary: Arc::new(Vec::new()),
        }
    }

    /// Sets the source name reported in diagnostics.
    pub fn named(mut self, name: &str) -> Self {
        self.name = Arc::from(name);
        self
    }

    /// Replaces the source and moves the cursor to `start`.
    pub fn load(&mut self, code: &str, start: usize) -> &mut Self {
        self.code = Arc::from(code);
        self.index = floor_boundary(code, start);
        self
    }

    /// Registers a reader. An existing key keeps its position and gets the new reader.
    pub fn define(&mut self, key: &str, reader: Reader) -> &mut Self {
        let dictionary = Arc::make_mut(&mut self.dictionary);
        match dictionary.iter_mut().find(|definition| definition.key == key) {
            Some(definition) => definition.reader = reader,
            None => dictionary.push(Definition {
                key: key.to_string(),
                reader,
            }),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Definition> {
        self.dictionary.iter().find(|definition| definition.key == key)
    }

    pub fn dictionary(&self) -> &[Definition] {
        &self.dictionary
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True once the cursor has reached the end of the source.
    pub fn is_done(&self) -> bool {
        self.index >= self.code.len()
    }

    /// A sub-lexer positioned at `start` in `code`, sharing this lexer's dictionary.
    pub fn fork(&self, code: &str, start: usize) -> Lexer {
        let mut lexer = self.clone();
        if !std::ptr::eq(self.code.as_ref(), code) {
            lexer.code = Arc::from(code);
        }
        lexer.index = floor_boundary(&lexer.code, start);
        lexer
    }

    /// Runs the readers named by `keys` (or every reader, in registration
    /// order) at `start` and returns the first token that spans something.
    pub fn match_at(
        &self,
        code: &str,
        start: usize,
        keys: Option<&[&str]>,
    ) -> Result<Option<Token>, ParserError> {
        match keys {
            Some(keys) => {
                for key in keys {
                    let definition = self.get(key).ok_or_else(|| ParserError::UnknownDefinition {
                        key: (*key).to_string(),
                    })?;
                    if let Some(token) = Self::attempt(definition, code, start, self) {
                        return Ok(Some(token));
                    }
                }
                Ok(None)
            }
            None => Ok(self
                .dictionary
                .iter()
                .find_map(|definition| Self::attempt(definition, code, start, self))),
        }
    }

    fn attempt(definition: &Definition, code: &str, start: usize, lexer: &Lexer) -> Option<Token> {
        if start > code.len() {
            return None;
        }
        (definition.reader)(code, start, lexer).filter(|token| token.end() > start)
    }

    /// Lookahead. Never moves the cursor.
    pub fn next(&self, keys: &[&str]) -> Result<bool, ParserError> {
        Ok(self.match_at(&self.code, self.index, Some(keys))?.is_some())
    }

    /// Consumes a token if one of `keys` matches, otherwise leaves the cursor alone.
    pub fn optional(&mut self, keys: &[&str]) -> Result<Option<Token>, ParserError> {
        let token = self.match_at(&self.code, self.index, Some(keys))?;
        if let Some(token) = &token {
            self.index = token.end();
        }
        Ok(token)
    }

    /// Consumes a token matching one of `keys` or fails with the text found instead.
    pub fn expect(&mut self, keys: &[&str]) -> Result<Token, ParserError> {
        match self.optional(keys)? {
            Some(token) => Ok(token),
            None => Err(self.unexpected(keys)),
        }
    }

    pub fn expect_identifier(&mut self, keys: &[&str]) -> Result<IdentifierToken, ParserError> {
        self.expect_as(keys, Token::into_identifier)
    }

    pub fn expect_literal(&mut self, keys: &[&str]) -> Result<LiteralToken, ParserError> {
        self.expect_as(keys, Token::into_literal)
    }

    pub fn expect_object(&mut self, keys: &[&str]) -> Result<ObjectToken, ParserError> {
        self.expect_as(keys, Token::into_object)
    }

    pub fn expect_data(&mut self, keys: &[&str]) -> Result<DataToken, ParserError> {
        self.expect_as(keys, Token::into_data)
    }

    fn expect_as<T>(
        &mut self,
        keys: &[&str],
        convert: fn(Token) -> Option<T>,
    ) -> Result<T, ParserError> {
        let token = self.expect(keys)?;
        let start = token.start();
        match convert(token) {
            Some(token) => Ok(token),
            None => {
                self.index = start;
                Err(self.unexpected(keys))
            }
        }
    }

    /// Reads whatever any registered reader recognizes at the cursor.
    pub fn read(&mut self) -> Option<Token> {
        let token = self
            .dictionary
            .iter()
            .find_map(|definition| Self::attempt(definition, &self.code, self.index, self))?;
        self.index = token.end();
        Some(token)
    }

    /// Raw slice of the source, clamped to the source bounds.
    pub fn substring(&self, start: usize, end: usize) -> &str {
        let end = end.min(self.code.len());
        let start = start.min(end);
        self.code.get(start..end).unwrap_or("")
    }

    /// Offset of the next whitespace character at or after the cursor.
    pub fn next_space(&self) -> usize {
        self.code
            .get(self.index..)
            .and_then(|rest| rest.find(char::is_whitespace))
            .map_or(self.code.len(), |offset| self.index + offset)
    }

    /// Builds the expectation failure for the current cursor.
    pub fn unexpected(&self, keys: &[&str]) -> ParserError {
        self.unexpected_at(self.index, keys)
    }

    fn unexpected_at(&self, start: usize, keys: &[&str]) -> ParserError {
        let expected = keys.join(" or ");
        let src = NamedSource::new(self.name.as_ref(), Arc::clone(&self.code));
        let start = floor_boundary(&self.code, start);
        let tail = match self.code.get(start..) {
            Some(tail) if !tail.is_empty() => tail,
            _ => {
                return ParserError::UnexpectedEof {
                    src,
                    span: SourceSpan::new(self.code.len().into(), 0),
                    expected,
                }
            }
        };
        let mut end = tail
            .find(char::is_whitespace)
            .map_or(self.code.len(), |offset| start + offset);
        if end == start {
            end = start + tail.chars().next().map_or(1, char::len_utf8);
        }

        ParserError::UnexpectedToken {
            src,
            span: SourceSpan::new(start.into(), end - start),
            found: self.substring(start, end).to_string(),
            expected,
        }
    }
}

/// `offset` clamped to `code` and moved back to the nearest char boundary.
fn floor_boundary(code: &str, offset: usize) -> usize {
    let mut offset = offset.min(code.len());
    while !code.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Scalar, UnknownToken};
    use crate::definitions;

    fn lexer(code: &str) -> Lexer {
        let mut lexer = Lexer::new();
        definitions::install(&mut lexer);
        lexer.load(code, 0);
        lexer
    }

    fn dash(code: &str, start: usize, _: &Lexer) -> Option<Token> {
        code[start..].starts_with('-').then(|| {
            Token::Unknown(UnknownToken {
                kind: "_Dash".to_string(),
                start,
                end: start + 1,
                value: "-".to_string(),
                raw: "-".to_string(),
            })
        })
    }

    fn never(_: &str, _: usize, _: &Lexer) -> Option<Token> {
        None
    }

    #[test]
    fn test_define_and_get() {
        let mut lexer = Lexer::new();
        assert!(lexer.get("dash").is_none());
        lexer.define("dash", dash);
        assert_eq!(lexer.get("dash").map(|d| d.key.as_str()), Some("dash"));

        lexer.define("other", never).define("dash", never);
        assert_eq!(lexer.dictionary().len(), 2);
        assert_eq!(lexer.dictionary()[0].key, "dash");
        lexer.load("-", 0);
        assert!(!lexer.next(&["dash"]).unwrap());
    }

    #[test]
    fn test_load_is_reusable() {
        let mut lexer = lexer("foo");
        assert_eq!(lexer.expect_identifier(&["AnyIdentifier"]).unwrap().name, "foo");
        lexer.load("  bar", 2);
        assert_eq!(lexer.index(), 2);
        assert_eq!(lexer.expect_identifier(&["AnyIdentifier"]).unwrap().name, "bar");
    }

    #[test]
    fn test_next_does_not_advance() {
        let lexer = lexer("foo bar");
        assert!(lexer.next(&["AnyIdentifier"]).unwrap());
        assert!(!lexer.next(&["String"]).unwrap());
        assert_eq!(lexer.index(), 0);
    }

    #[test]
    fn test_optional() {
        let mut lexer = lexer("foo bar");
        assert!(lexer.optional(&["String"]).unwrap().is_none());
        assert_eq!(lexer.index(), 0);
        let token = lexer.optional(&["AnyIdentifier"]).unwrap().unwrap();
        assert_eq!(token.end(), 3);
        assert_eq!(lexer.index(), 3);
    }

    #[test]
    fn test_expect_failure_message_and_range() {
        let mut lexer = lexer("foo bar");
        let err = lexer.expect(&["String", "Integer"]).unwrap_err();
        assert_eq!(err.to_string(), "Unexpected foo expecting String or Integer");
        assert_eq!(err.start(), Some(0));
        assert_eq!(err.end(), Some(3));
        assert_eq!(lexer.index(), 0);
    }

    #[test]
    fn test_errors_share_the_source() {
        let mut lexer = lexer("foo bar");
        let err = lexer.expect(&["String"]).unwrap_err();
        let ParserError::UnexpectedToken { src, .. } = err else {
            panic!("expected an unexpected token error");
        };
        assert!(Arc::ptr_eq(src.inner(), &lexer.code));
        assert_eq!(src.name(), "schema.idea");
    }

    #[test]
    fn test_offsets_inside_a_char() {
        let mut lexer = lexer("");
        lexer.load("é foo", 1);
        assert_eq!(lexer.index(), 0);
        let err = lexer.expect(&["AnyIdentifier"]).unwrap_err();
        assert_eq!(err.to_string(), "Unexpected é expecting AnyIdentifier");
        assert_eq!((err.start(), err.end()), (Some(0), Some(2)));

        let sub = lexer.fork("é", 1);
        assert_eq!(sub.index(), 0);
        let err = lexer.unexpected_at(1, &["String"]);
        assert_eq!(err.start(), Some(0));
    }

    #[test]
    fn test_expect_at_end_of_input() {
        let mut lexer = lexer("");
        let err = lexer.expect(&["{"]).unwrap_err();
        assert!(matches!(err, ParserError::UnexpectedEof { .. }));
        assert_eq!(err.to_string(), "Unexpected end of input expecting {");
    }

    #[test]
    fn test_unknown_definition_is_distinct() {
        let mut lexer = lexer("foo");
        let err = lexer.expect(&["madeUpKey"]).unwrap_err();
        assert!(matches!(err, ParserError::UnknownDefinition { .. }));
        assert_eq!(err.to_string(), "Unknown definition madeUpKey");
        assert!(lexer.next(&["madeUpKey"]).is_err());
        assert!(lexer.optional(&["madeUpKey"]).is_err());
    }

    #[test]
    fn test_first_listed_key_wins() {
        let lexer = lexer("4.5");
        let token = lexer.match_at(lexer.code(), 0, Some(&["Integer", "Float"])).unwrap();
        let literal = token.and_then(Token::into_literal).unwrap();
        assert_eq!(literal.value, Scalar::Integer(4));

        let token = lexer.match_at(lexer.code(), 0, Some(&["Float", "Integer"])).unwrap();
        let literal = token.and_then(Token::into_literal).unwrap();
        assert_eq!(literal.value, Scalar::Float(4.5));
    }

    #[test]
    fn test_match_at_does_not_advance() {
        let lexer = lexer("foo");
        let token = lexer.match_at("zoo 1", 4, None).unwrap().unwrap();
        assert_eq!(token.kind(), "Literal");
        assert_eq!(lexer.index(), 0);
    }

    #[test]
    fn test_read_uses_registration_order() {
        let mut lexer = lexer(" {");
        assert_eq!(lexer.read().map(|t| t.kind().to_string()), Some("_Space".to_string()));
        assert_eq!(lexer.read().map(|t| t.kind().to_string()), Some("_BraceOpen".to_string()));
        assert!(lexer.read().is_none());
    }

    #[test]
    fn test_read_returns_none_on_unrecognized_input() {
        let mut lexer = lexer("#");
        assert!(lexer.read().is_none());
        assert_eq!(lexer.index(), 0);
    }

    #[test]
    fn test_clone_isolation() {
        let mut original = lexer("foo bar");
        let mut snapshot = original.clone();
        snapshot.expect(&["AnyIdentifier"]).unwrap();
        assert_eq!(snapshot.index(), 3);
        assert_eq!(original.index(), 0);

        original.expect(&["AnyIdentifier"]).unwrap();
        original.expect(&["whitespace"]).unwrap();
        assert_eq!(original.index(), 4);
        assert_eq!(snapshot.index(), 3);

        original.define("dash", dash);
        assert!(original.get("dash").is_some());
        assert!(snapshot.get("dash").is_none());
    }

    #[test]
    fn test_substring_and_next_space() {
        let mut lexer = lexer("foo bar");
        assert_eq!(lexer.substring(0, 3), "foo");
        assert_eq!(lexer.substring(2, 2), "");
        assert_eq!(lexer.substring(4, 100), "bar");
        assert_eq!(lexer.next_space(), 3);
        lexer.expect(&["AnyIdentifier"]).unwrap();
        lexer.expect(&["whitespace"]).unwrap();
        assert_eq!(lexer.next_space(), 7);
    }

    #[test]
    fn test_typed_expect() {
        let mut lexer = lexer("{ foo 1 }");
        let object = lexer.expect_object(&["Object"]).unwrap();
        assert_eq!(object.properties.len(), 1);
        assert!(matches!(
            object.properties[0].value,
            DataToken::Literal(LiteralToken { value: Scalar::Integer(1), .. })
        ));

        let mut lexer = super::Lexer::new();
        definitions::install(&mut lexer);
        lexer.load("foo", 0);
        assert!(lexer.expect_literal(&["AnyIdentifier"]).is_err());
    }
}
