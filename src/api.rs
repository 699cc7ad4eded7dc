use crate::ast::SchemaToken;
use crate::compiler::{compile_final, compile_schema, FinalSchemaConfig, SchemaConfig};
use crate::error::IdeaError;
use crate::lexer::Lexer;
use crate::resolver::{Resolver, SourceLoader};
use crate::trees::{SchemaTree, Tree};
use crate::utils::get_line_and_column;
use log::debug;

const DEFAULT_NAME: &str = "schema.idea";

/// Parses a schema into its token tree.
///
/// # Errors
/// Returns `IdeaError::Parser` when the source does not follow the grammar.
pub fn tokenize(code: &str, name: &str) -> Result<SchemaToken, IdeaError> {
    debug!("Tokenizing {} ({} bytes)", name, code.len());
    let token = SchemaTree::with_lexer(Lexer::new().named(name))
        .parse(code, 0)
        .inspect_err(|err| {
            if let Some(start) = err.start() {
                let (line, column) = get_line_and_column(code, start);
                debug!("{}:{}:{}: {}", name, line, column, err);
            }
        })?;
    debug!("{}: {} top level statements", name, token.body.len());
    Ok(token)
}

/// Parses and compiles a schema. Prop references stay `${Name}` placeholders
/// and the `prop` and `use` sections are kept.
///
/// # Errors
/// Returns a parser error for malformed source and a compiler error for
/// invalid declarations (e.g. duplicate names).
pub fn parse(code: &str) -> Result<SchemaConfig, IdeaError> {
    parse_with_name(code, DEFAULT_NAME)
}

/// Like [`parse`], naming the source in diagnostics.
///
/// # Errors
/// See [`parse`].
pub fn parse_with_name(code: &str, name: &str) -> Result<SchemaConfig, IdeaError> {
    let token = tokenize(code, name)?;
    Ok(compile_schema(&token, false)?)
}

/// Parses and compiles a schema with prop references resolved, leaving out
/// the `prop` and `use` sections.
///
/// # Errors
/// Also returns `CompilerError::UnknownReference` for references to undeclared props.
pub fn finalize(code: &str) -> Result<FinalSchemaConfig, IdeaError> {
    finalize_with_name(code, DEFAULT_NAME)
}

/// Like [`finalize`], naming the source in diagnostics.
///
/// # Errors
/// See [`finalize`].
pub fn finalize_with_name(code: &str, name: &str) -> Result<FinalSchemaConfig, IdeaError> {
    let token = tokenize(code, name)?;
    Ok(compile_final(&token)?)
}

/// Parses a schema and merges its `use` imports, read through `loader`.
///
/// # Errors
/// Returns `IdeaError::Resolver` when an import cannot be loaded or imports
/// form a cycle, besides any parser or compiler error in the imported files.
pub fn resolve<L: SourceLoader>(code: &str, name: &str, loader: L) -> Result<SchemaConfig, IdeaError> {
    let schema = parse_with_name(code, name)?;
    Resolver::new(loader).resolve(schema, name)
}

/// Like [`resolve`], then resolves prop references across all merged files.
///
/// # Errors
/// See [`resolve`] and [`finalize`].
pub fn resolve_final<L: SourceLoader>(
    code: &str,
    name: &str,
    loader: L,
) -> Result<FinalSchemaConfig, IdeaError> {
    let schema = parse_with_name(code, name)?;
    Resolver::new(loader).finalize(schema, name)
}
