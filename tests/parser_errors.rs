// Parser error paths: every failure carries a message and the offending range

use idea_parser::error::{IdeaError, ParserError};
use idea_parser::trees::{EnumTree, ModelTree, PropTree, SchemaTree, Tree, TypeTree, UseTree};
use idea_parser::{parse, Lexer};

fn parser_error(source: &str) -> ParserError {
    match parse(source) {
        Err(IdeaError::Parser(err)) => err,
        Err(other) => panic!("Expected a parser error, got {:?}", other),
        Ok(_) => panic!("Expected a parser error for {:?}", source),
    }
}

#[test]
fn test_empty_enum_input() {
    let err = EnumTree::parse_str("").unwrap_err();
    assert_eq!(err.to_string(), "Unexpected end of input expecting EnumWord");
    assert_eq!(err.start(), Some(0));
}

#[test]
fn test_lowercase_model_name() {
    let err = ModelTree::parse_str("model user { id String }").unwrap_err();
    assert_eq!(err.to_string(), "Unexpected user expecting CapitalIdentifier");
    assert_eq!((err.start(), err.end()), (Some(6), Some(10)));
}

#[test]
fn test_lowercase_type_name() {
    assert!(TypeTree::parse_str("type address { street String }").is_err());
}

#[test]
fn test_missing_closing_brace() {
    let err = parser_error("model User {\n  id String @id\n");
    assert!(matches!(err, ParserError::UnexpectedEof { .. }));
    assert_eq!(err.to_string(), "Unexpected end of input expecting }");
}

#[test]
fn test_missing_column_type() {
    let err = parser_error("model User { id }");
    assert_eq!(err.to_string(), "Unexpected id expecting }");
}

#[test]
fn test_unclosed_attribute_arguments() {
    assert!(parse("model User { id String @label(\"ID\" }").is_err());
}

#[test]
fn test_unknown_top_level_keyword() {
    let err = parser_error("enum A { B 1 }\ninterface Foo {}");
    assert!(err.to_string().starts_with("Unexpected interface expecting UseWord"));
    assert_eq!(err.start(), Some(15));
    assert_eq!(err.end(), Some(24));
}

#[test]
fn test_keyword_needs_word_boundary() {
    let err = parser_error("models User {}");
    assert!(err.to_string().starts_with("Unexpected models expecting"));
}

#[test]
fn test_prop_without_object() {
    let err = PropTree::parse_str("prop Text \"text\"").unwrap_err();
    assert_eq!(err.to_string(), "Unexpected \"text\" expecting Object");
}

#[test]
fn test_malformed_prop_object() {
    assert!(PropTree::parse_str("prop Text { type \"text\"").is_err());
    assert!(PropTree::parse_str("prop Text { type [ 1 2 }").is_err());
}

#[test]
fn test_use_without_path() {
    let err = UseTree::parse_str("use shared").unwrap_err();
    assert_eq!(err.to_string(), "Unexpected shared expecting String");
}

#[test]
fn test_unterminated_string() {
    assert!(parse("enum A { B \"open }").is_err());
}

#[test]
fn test_unknown_definition_is_not_a_parse_failure() {
    let mut lexer = Lexer::new();
    lexer.load("anything", 0);
    let err = lexer.expect(&["madeUpKey"]).unwrap_err();
    assert!(matches!(err, ParserError::UnknownDefinition { ref key } if key == "madeUpKey"));
    assert_eq!(err.to_string(), "Unknown definition madeUpKey");
    assert_eq!(err.start(), None);
}

#[test]
fn test_schema_tree_reports_first_error() {
    let mut tree = SchemaTree::new();
    let err = tree.parse("enum A { B 1 }\nmodel b {}", 0).unwrap_err();
    assert_eq!(err.to_string(), "Unexpected b expecting CapitalIdentifier");
}
