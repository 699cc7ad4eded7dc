// API error path tests
// Error variants, spans and diagnostics as seen from the public API

use idea_parser::error::{CompilerError, IdeaError, ParserError};
use idea_parser::utils::get_line_and_column;
use idea_parser::{finalize, parse, parse_with_name, tokenize};
use miette::{Diagnostic, Report};

#[test]
fn test_api_parse_error() {
    let result = parse("model User { id String");
    assert!(matches!(result, Err(IdeaError::Parser(ParserError::UnexpectedEof { .. }))));
}

#[test]
fn test_api_compiler_error() {
    let result = parse("enum A { X 1 }\nmodel A { id String }");
    assert!(matches!(result, Err(IdeaError::Compiler(CompilerError::Duplicate { .. }))));
}

#[test]
fn test_api_finalize_unknown_reference() {
    let err = finalize("model User { name String @field(Missing) }").unwrap_err();
    assert!(matches!(
        err,
        IdeaError::Compiler(CompilerError::UnknownReference { ref name }) if name == "Missing"
    ));
}

#[test]
fn test_api_parse_keeps_unknown_reference() {
    let schema = parse("model User { name String @field(Missing) }").unwrap();
    let user = &schema.model.as_ref().unwrap()["User"];
    assert_eq!(user.columns[0].attributes["field"], serde_json::json!(["${Missing}"]));
}

#[test]
fn test_api_error_span_points_at_token() {
    let code = "enum Roles {\n  ADMIN \"Admin\"\n}\nmodel user { id String }";
    let err = parse(code).unwrap_err();
    let span = err.span().expect("parser errors carry a span");
    assert_eq!(&code[span.offset()..span.offset() + span.len()], "user");
    assert_eq!(get_line_and_column(code, span.offset()), (4, 7));
}

#[test]
fn test_api_eof_span_is_empty() {
    let code = "enum Roles {";
    let err = parse(code).unwrap_err();
    let span = err.span().unwrap();
    assert_eq!(span.offset(), code.len());
    assert_eq!(span.len(), 0);
}

#[test]
fn test_api_diagnostic_codes() {
    let parser = parse("modle User {}").unwrap_err();
    assert_eq!(parser.code().unwrap().to_string(), "parser::unexpected_token");

    let compiler = parse("enum A { X 1 }\nenum A { X 1 }").unwrap_err();
    assert_eq!(compiler.code().unwrap().to_string(), "compiler::duplicate");
}

#[test]
fn test_api_report_mentions_file_name() {
    let err = parse_with_name("type address {}", "models/address.idea").unwrap_err();
    let rendered = format!("{:?}", Report::new(err));
    assert!(rendered.contains("models/address.idea"));
    assert!(rendered.contains("CapitalIdentifier"));
}

#[test]
fn test_api_empty_source() {
    let schema = parse("").unwrap();
    assert!(schema.r#enum.is_none());
    assert!(schema.model.is_none());
    assert!(tokenize("", "empty.idea").unwrap().body.is_empty());
}

#[test]
fn test_api_to_json_and_yaml() {
    let schema = parse("enum Roles { ADMIN \"Admin\" }").unwrap();
    assert!(schema.to_json().unwrap().contains("\"ADMIN\": \"Admin\""));
    assert!(schema.to_yaml().unwrap().contains("ADMIN: Admin"));
}

#[test]
fn test_api_error_display() {
    let err = parse("plugin custom {}").unwrap_err();
    assert_eq!(err.to_string(), "Unexpected custom expecting String");
}
