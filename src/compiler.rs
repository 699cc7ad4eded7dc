//! Lowers parsed tokens into plain configuration.
//!
//! Every function is pure. References are passed explicitly: `None` keeps
//! identifier references as `${Name}` placeholders, `Some(map)` resolves them
//! and fails on names the map does not hold.

use crate::ast::{
    ArrayToken, DataToken, DeclarationToken, IdentifierToken, ImportToken, Kind, LiteralToken,
    ObjectToken, Scalar, SchemaItem, SchemaToken, Token,
};
use crate::error::CompilerError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashSet};

/// Compiled props by name, used to resolve identifier references.
pub type References = Map<String, Value>;
pub type EnumConfig = Map<String, Value>;
pub type PropConfig = Map<String, Value>;
pub type PluginConfig = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub required: bool,
    pub multiple: bool,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

/// A compiled `type` or `model`. Columns stay in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeConfig {
    pub name: String,
    pub mutable: bool,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#enum: Option<BTreeMap<String, EnumConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop: Option<BTreeMap<String, PropConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<BTreeMap<String, TypeConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<BTreeMap<String, TypeConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<BTreeMap<String, PluginConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#use: Option<Vec<String>>,
}

/// A schema without its compile-time sections (`prop` and `use`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalSchemaConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#enum: Option<BTreeMap<String, EnumConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<BTreeMap<String, TypeConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<BTreeMap<String, TypeConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<BTreeMap<String, PluginConfig>>,
}

impl SchemaConfig {
    /// Compiled props as a reference map.
    #[must_use]
    pub fn references(&self) -> References {
        self.prop
            .iter()
            .flatten()
            .map(|(name, config)| (name.clone(), Value::Object(config.clone())))
            .collect()
    }

    /// Resolves every `${Name}` placeholder in type and model attributes
    /// against this schema's props and drops the `prop` and `use` sections.
    /// Plugin bodies are left as written.
    ///
    /// # Errors
    /// Returns `CompilerError::UnknownReference` for a placeholder naming no prop.
    pub fn finalize(mut self) -> Result<FinalSchemaConfig, CompilerError> {
        self.resolve_placeholders()?;
        Ok(FinalSchemaConfig {
            r#enum: self.r#enum,
            r#type: self.r#type,
            model: self.model,
            plugin: self.plugin,
        })
    }

    fn resolve_placeholders(&mut self) -> Result<(), CompilerError> {
        let references = self.references();
        let sections = self.r#type.iter_mut().chain(self.model.iter_mut());
        for config in sections.flat_map(|section| section.values_mut()) {
            substitute_type(config, &references)?;
        }
        self.prop = None;
        self.r#use = None;
        Ok(())
    }

    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

impl FinalSchemaConfig {
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

// --- Data ---

pub fn literal(token: &LiteralToken) -> Value {
    match &token.value {
        Scalar::Null => Value::Null,
        Scalar::Boolean(value) => Value::Bool(*value),
        Scalar::Integer(value) => Value::from(*value),
        Scalar::Float(value) => Number::from_f64(*value).map_or(Value::Null, Value::Number),
        Scalar::String(value) => Value::String(value.clone()),
    }
}

/// Placeholder without references, the referenced value with them.
pub fn identifier(
    token: &IdentifierToken,
    references: Option<&References>,
) -> Result<Value, CompilerError> {
    match references {
        None => Ok(Value::String(placeholder(&token.name))),
        Some(references) => references
            .get(&token.name)
            .cloned()
            .ok_or_else(|| CompilerError::UnknownReference {
                name: token.name.clone(),
            }),
    }
}

/// Later duplicate keys overwrite earlier ones.
pub fn object(
    token: &ObjectToken,
    references: Option<&References>,
) -> Result<Map<String, Value>, CompilerError> {
    token
        .properties
        .iter()
        .map(|property| Ok((property.key.name.clone(), value(&property.value, references)?)))
        .collect()
}

pub fn array(token: &ArrayToken, references: Option<&References>) -> Result<Vec<Value>, CompilerError> {
    token
        .elements
        .iter()
        .map(|element| value(element, references))
        .collect()
}

pub fn value(token: &DataToken, references: Option<&References>) -> Result<Value, CompilerError> {
    match token {
        DataToken::Literal(token) => Ok(literal(token)),
        DataToken::Object(token) => object(token, references).map(Value::Object),
        DataToken::Array(token) => array(token, references).map(Value::Array),
        DataToken::Identifier(token) => identifier(token, references),
    }
}

/// Compiles any token that carries data; structural tokens are rejected.
pub fn data(token: &Token, references: Option<&References>) -> Result<Value, CompilerError> {
    match token {
        Token::Data(token) => value(token, references),
        Token::Unknown(token) => Err(CompilerError::InvalidDataToken {
            kind: token.kind.clone(),
        }),
    }
}

// --- Declarations ---

pub fn compile_enum(token: &DeclarationToken) -> Result<(String, EnumConfig), CompilerError> {
    let (name, init) = declarator(token, Kind::Enum, CompilerError::InvalidEnum)?;
    let options = init
        .properties
        .iter()
        .map(|property| match &property.value {
            DataToken::Literal(token) => Ok((property.key.name.clone(), literal(token))),
            _ => Err(CompilerError::InvalidEnum),
        })
        .collect::<Result<EnumConfig, _>>()?;
    Ok((name, options))
}

pub fn compile_prop(
    token: &DeclarationToken,
    references: Option<&References>,
) -> Result<(String, PropConfig), CompilerError> {
    let (name, init) = declarator(token, Kind::Prop, CompilerError::InvalidProp)?;
    Ok((name, object(init, references)?))
}

/// Plugin bodies configure external tools and are never resolved.
pub fn compile_plugin(token: &DeclarationToken) -> Result<(String, PluginConfig), CompilerError> {
    let (name, init) = declarator(token, Kind::Plugin, CompilerError::InvalidPlugin)?;
    Ok((name, object(init, None)?))
}

pub fn compile_type(
    token: &DeclarationToken,
    references: Option<&References>,
) -> Result<(String, TypeConfig), CompilerError> {
    let (name, init) = declarator(token, Kind::Type, CompilerError::InvalidType)?;
    let config = structure(name.clone(), token.mutable.unwrap_or(true), init, references)?;
    Ok((name, config))
}

pub fn compile_model(
    token: &DeclarationToken,
    references: Option<&References>,
) -> Result<(String, TypeConfig), CompilerError> {
    let (name, init) = declarator(token, Kind::Model, CompilerError::InvalidModel)?;
    let config = structure(name.clone(), token.mutable.unwrap_or(false), init, references)?;
    Ok((name, config))
}

/// The import path of a `use` statement.
pub fn compile_use(item: &SchemaItem) -> Result<String, CompilerError> {
    match item {
        SchemaItem::Import(token) => Ok(import_path(token)),
        SchemaItem::Declaration(_) => Err(CompilerError::InvalidImport),
    }
}

fn import_path(token: &ImportToken) -> String {
    match &token.source.value {
        Scalar::String(path) => path.clone(),
        _ => token.source.raw.clone(),
    }
}

/// Compiles a whole schema. Declaration names must be unique across kinds.
///
/// Declarations compile with references deferred. With `finalize`, a second
/// pass resolves the `${Name}` placeholders of types and models against the
/// schema's own props and leaves out the `prop` and `use` sections.
pub fn compile_schema(token: &SchemaToken, finalize: bool) -> Result<SchemaConfig, CompilerError> {
    if token.kind != Kind::Schema {
        return Err(CompilerError::InvalidSchema);
    }

    let mut schema = SchemaConfig::default();
    let mut seen = HashSet::new();
    for item in &token.body {
        let declaration = match item {
            SchemaItem::Import(_) => {
                schema
                    .r#use
                    .get_or_insert_with(Vec::new)
                    .push(compile_use(item)?);
                continue;
            }
            SchemaItem::Declaration(declaration) => declaration,
        };

        if let Some(name) = declaration.name() {
            if !seen.insert(name.to_string()) {
                return Err(CompilerError::Duplicate {
                    name: name.to_string(),
                });
            }
        }

        match declaration.kind {
            Kind::Enum => {
                let (name, config) = compile_enum(declaration)?;
                section(&mut schema.r#enum).insert(name, config);
            }
            Kind::Prop => {
                let (name, config) = compile_prop(declaration, None)?;
                section(&mut schema.prop).insert(name, config);
            }
            Kind::Type => {
                let (name, config) = compile_type(declaration, None)?;
                section(&mut schema.r#type).insert(name, config);
            }
            Kind::Model => {
                let (name, config) = compile_model(declaration, None)?;
                section(&mut schema.model).insert(name, config);
            }
            Kind::Plugin => {
                let (name, config) = compile_plugin(declaration)?;
                section(&mut schema.plugin).insert(name, config);
            }
            Kind::Schema => return Err(CompilerError::InvalidSchema),
        }
    }

    if finalize {
        schema.resolve_placeholders()?;
    }
    Ok(schema)
}

/// Compiles and finalizes a schema, see [`SchemaConfig::finalize`].
pub fn compile_final(token: &SchemaToken) -> Result<FinalSchemaConfig, CompilerError> {
    compile_schema(token, false)?.finalize()
}

fn section<T>(section: &mut Option<BTreeMap<String, T>>) -> &mut BTreeMap<String, T> {
    section.get_or_insert_with(BTreeMap::new)
}

fn declarator(
    token: &DeclarationToken,
    kind: Kind,
    invalid: CompilerError,
) -> Result<(String, &ObjectToken), CompilerError> {
    if token.kind != kind {
        return Err(invalid);
    }
    let declarator = token.declarator().ok_or(invalid)?;
    Ok((declarator.id.name.clone(), &declarator.init))
}

fn structure(
    name: String,
    mutable: bool,
    init: &ObjectToken,
    references: Option<&References>,
) -> Result<TypeConfig, CompilerError> {
    let columns = match init.get("columns").map(|property| &property.value) {
        Some(DataToken::Object(columns)) => columns,
        _ => return Err(CompilerError::MissingColumns),
    };
    let attributes = match init.get("attributes").map(|property| &property.value) {
        Some(DataToken::Object(attributes)) => object(attributes, references)?,
        _ => Map::new(),
    };
    let columns = columns
        .properties
        .iter()
        .map(|property| column(&property.key.name, &property.value, references))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TypeConfig {
        name,
        mutable,
        attributes,
        columns,
    })
}

fn column(
    name: &str,
    token: &DataToken,
    references: Option<&References>,
) -> Result<ColumnConfig, CompilerError> {
    let invalid = || CompilerError::InvalidColumn {
        name: name.to_string(),
    };
    let DataToken::Object(definition) = token else {
        return Err(invalid());
    };
    let declared = match definition.get("type").map(|property| &property.value) {
        Some(DataToken::Literal(LiteralToken {
            value: Scalar::String(declared),
            ..
        })) => declared.as_str(),
        _ => return Err(invalid()),
    };
    let attributes = match definition.get("attributes").map(|property| &property.value) {
        Some(DataToken::Object(attributes)) => object(attributes, references)?,
        _ => Map::new(),
    };

    let (kind, required, multiple) = modifiers(declared);
    Ok(ColumnConfig {
        name: name.to_string(),
        kind: kind.to_string(),
        required,
        multiple,
        attributes,
    })
}

/// Splits `String[]?` into `("String", required = false, multiple = true)`.
fn modifiers(declared: &str) -> (&str, bool, bool) {
    let (declared, required) = match declared.strip_suffix('?') {
        Some(stripped) => (stripped, false),
        None => (declared, true),
    };
    match declared.strip_suffix("[]") {
        Some(stripped) => (stripped, required, true),
        None => (declared, required, false),
    }
}

// --- Placeholders ---

fn placeholder(name: &str) -> String {
    format!("${{{}}}", name)
}

/// The name inside a `${Name}` placeholder.
fn placeholder_name(value: &str) -> Option<&str> {
    value.strip_prefix("${")?.strip_suffix('}')
}

/// Replaces `${Name}` strings, recursively, with the referenced values.
pub fn substitute(value: &mut Value, references: &References) -> Result<(), CompilerError> {
    match value {
        Value::String(text) => {
            if let Some(name) = placeholder_name(text) {
                let resolved = references
                    .get(name)
                    .cloned()
                    .ok_or_else(|| CompilerError::UnknownReference {
                        name: name.to_string(),
                    })?;
                *value = resolved;
            }
            Ok(())
        }
        Value::Array(items) => items
            .iter_mut()
            .try_for_each(|item| substitute(item, references)),
        Value::Object(map) => substitute_map(map, references),
        _ => Ok(()),
    }
}

fn substitute_map(map: &mut Map<String, Value>, references: &References) -> Result<(), CompilerError> {
    map.values_mut()
        .try_for_each(|value| substitute(value, references))
}

fn substitute_type(config: &mut TypeConfig, references: &References) -> Result<(), CompilerError> {
    substitute_map(&mut config.attributes, references)?;
    for column in &mut config.columns {
        substitute_map(&mut column.attributes, references)?;
    }
    Ok(())
}
