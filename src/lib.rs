pub mod api;
pub mod ast;
pub mod compiler;
pub mod definitions;
pub mod error;
pub mod lexer;
pub mod resolver;
pub mod trees;
pub mod utils;

pub use api::{finalize, finalize_with_name, parse, parse_with_name, resolve, resolve_final, tokenize};
pub use compiler::{FinalSchemaConfig, SchemaConfig};
pub use error::IdeaError;
pub use lexer::Lexer;
pub use resolver::{Resolver, SourceLoader};
