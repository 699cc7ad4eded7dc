use miette::{Diagnostic, NamedSource, SourceSpan};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum IdeaError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parser(#[from] ParserError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Compiler(#[from] CompilerError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolver(#[from] ResolverError),
}

impl IdeaError {
    /// The source range the error points at, when the error came out of the lexer.
    #[must_use]
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            IdeaError::Parser(err) => err.span(),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParserError {
    #[error("Unexpected {found} expecting {expected}")]
    #[diagnostic(
        code(parser::unexpected_token),
        help("The parser found text it did not expect in this position.")
    )]
    UnexpectedToken {
        #[source_code]
        src: NamedSource<Arc<str>>,
        #[label("Expected {expected}, but found this")]
        span: SourceSpan,
        found: String,
        expected: String,
    },

    #[error("Unexpected end of input expecting {expected}")]
    #[diagnostic(
        code(parser::unexpected_eof),
        help("The schema ended unexpectedly. The parser expected more tokens.")
    )]
    UnexpectedEof {
        #[source_code]
        src: NamedSource<Arc<str>>,
        #[label("Input ended here")]
        span: SourceSpan,
        expected: String,
    },

    #[error("Unknown definition {key}")]
    #[diagnostic(
        code(parser::unknown_definition),
        help("Register a reader for this key with `Lexer::define` before using it.")
    )]
    UnknownDefinition { key: String },
}

impl ParserError {
    #[must_use]
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            ParserError::UnexpectedToken { span, .. } | ParserError::UnexpectedEof { span, .. } => {
                Some(*span)
            }
            ParserError::UnknownDefinition { .. } => None,
        }
    }

    /// Start offset of the offending range.
    #[must_use]
    pub fn start(&self) -> Option<usize> {
        self.span().map(|span| span.offset())
    }

    /// End offset (exclusive) of the offending range.
    #[must_use]
    pub fn end(&self) -> Option<usize> {
        self.span().map(|span| span.offset() + span.len())
    }
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Invalid Enum")]
    #[diagnostic(code(compiler::invalid_enum))]
    InvalidEnum,

    #[error("Invalid Prop")]
    #[diagnostic(code(compiler::invalid_prop))]
    InvalidProp,

    #[error("Invalid Plugin")]
    #[diagnostic(code(compiler::invalid_plugin))]
    InvalidPlugin,

    #[error("Invalid Type")]
    #[diagnostic(code(compiler::invalid_type))]
    InvalidType,

    #[error("Invalid Model")]
    #[diagnostic(code(compiler::invalid_model))]
    InvalidModel,

    #[error("Invalid Schema")]
    #[diagnostic(code(compiler::invalid_schema))]
    InvalidSchema,

    #[error("Invalid Import")]
    #[diagnostic(code(compiler::invalid_import))]
    InvalidImport,

    #[error("Invalid data token type")]
    #[diagnostic(
        code(compiler::invalid_data_token),
        help("Only identifiers, literals, objects and arrays carry data; found `{kind}`.")
    )]
    InvalidDataToken { kind: String },

    #[error("Expecting a columns property")]
    #[diagnostic(code(compiler::missing_columns))]
    MissingColumns,

    #[error("Invalid column {name}")]
    #[diagnostic(
        code(compiler::invalid_column),
        help("A column must be declared as `name Type @attributes...`.")
    )]
    InvalidColumn { name: String },

    #[error("Unknown reference {name}")]
    #[diagnostic(
        code(compiler::unknown_reference),
        help("Declare `prop {name} {{ ... }}` before referencing it.")
    )]
    UnknownReference { name: String },

    #[error("Duplicate {name}")]
    #[diagnostic(
        code(compiler::duplicate),
        help("Declaration names must be unique across enums, props, types, models and plugins.")
    )]
    Duplicate { name: String },
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum ResolverError {
    #[error("Module not found: {path}")]
    #[diagnostic(
        code(resolver::module_not_found),
        help("The source loader did not return any schema for this `use` path.")
    )]
    ModuleNotFound { path: String },

    #[error("Circular dependency detected: {cycle}")]
    #[diagnostic(code(resolver::circular_dependency))]
    CircularDependency { cycle: String },
}
