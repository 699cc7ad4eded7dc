use super::enum_tree::enumeration;
use super::plugin_tree::plugin;
use super::prop_tree::prop;
use super::type_tree::structure;
use super::use_tree::import;
use super::{EnumTree, ModelTree, PluginTree, PropTree, Tree, UseTree};
use crate::ast::{Kind, SchemaItem, SchemaToken};
use crate::definitions::noncode;
use crate::error::ParserError;
use crate::lexer::Lexer;
use log::trace;

const KEYWORDS: &[&str] = &[
    "UseWord",
    "EnumWord",
    "PropWord",
    "TypeWord",
    "ModelWord",
    "PluginWord",
];

/// A whole `.idea` file: any sequence of `use`, `enum`, `prop`, `type`,
/// `model` and `plugin` declarations.
#[derive(Debug, Clone)]
pub struct SchemaTree {
    lexer: Lexer,
}

impl SchemaTree {
    pub fn new() -> Self {
        Self::with_lexer(Lexer::new())
    }

    pub fn with_lexer(mut lexer: Lexer) -> Self {
        Self::definitions(&mut lexer);
        Self { lexer }
    }
}

impl Default for SchemaTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree for SchemaTree {
    type Output = SchemaToken;

    fn definitions(lexer: &mut Lexer) -> &mut Lexer {
        EnumTree::definitions(lexer);
        PropTree::definitions(lexer);
        ModelTree::definitions(lexer);
        PluginTree::definitions(lexer);
        UseTree::definitions(lexer)
    }

    fn lexer(&mut self) -> &mut Lexer {
        &mut self.lexer
    }

    fn declaration(&mut self) -> Result<SchemaToken, ParserError> {
        schema(&mut self.lexer)
    }
}

fn schema(lexer: &mut Lexer) -> Result<SchemaToken, ParserError> {
    let start = lexer.index();
    let mut body = Vec::new();
    loop {
        noncode(lexer);
        if lexer.is_done() {
            break;
        }

        let item = if lexer.next(&["UseWord"])? {
            trace!("use at {}", lexer.index());
            SchemaItem::Import(import(lexer)?)
        } else if lexer.next(&["EnumWord"])? {
            trace!("enum at {}", lexer.index());
            SchemaItem::Declaration(enumeration(lexer)?)
        } else if lexer.next(&["PropWord"])? {
            trace!("prop at {}", lexer.index());
            SchemaItem::Declaration(prop(lexer)?)
        } else if lexer.next(&["TypeWord"])? {
            trace!("type at {}", lexer.index());
            SchemaItem::Declaration(structure(lexer, Kind::Type)?)
        } else if lexer.next(&["ModelWord"])? {
            trace!("model at {}", lexer.index());
            SchemaItem::Declaration(structure(lexer, Kind::Model)?)
        } else if lexer.next(&["PluginWord"])? {
            trace!("plugin at {}", lexer.index());
            SchemaItem::Declaration(plugin(lexer)?)
        } else {
            return Err(lexer.unexpected(KEYWORDS));
        };
        body.push(item);
    }

    Ok(SchemaToken {
        kind: Kind::Schema,
        start,
        end: lexer.index(),
        body,
    })
}
