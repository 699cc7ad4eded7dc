use serde::{Deserialize, Serialize};
use std::fmt;

// --- Data tokens ---

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct IdentifierToken {
    pub start: usize,
    pub end: usize,
    pub name: String,
}

/// The value carried by a literal. Integers and floats are kept apart so that
/// `44` compiles to an integer and `4.4` to a float.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LiteralToken {
    pub start: usize,
    pub end: usize,
    pub value: Scalar,
    pub raw: String,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ObjectToken {
    pub start: usize,
    pub end: usize,
    pub properties: Vec<PropertyToken>,
}

impl ObjectToken {
    /// Finds the first property with the given key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropertyToken> {
        self.properties.iter().find(|property| property.key.name == key)
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ArrayToken {
    pub start: usize,
    pub end: usize,
    pub elements: Vec<DataToken>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Property")]
pub struct PropertyToken {
    pub start: usize,
    pub end: usize,
    pub key: IdentifierToken,
    pub value: DataToken,
    #[serde(default = "PropertyToken::init")]
    pub kind: String,
    #[serde(default)]
    pub method: bool,
    #[serde(default)]
    pub shorthand: bool,
    #[serde(default)]
    pub computed: bool,
}

impl PropertyToken {
    pub fn new(key: IdentifierToken, value: DataToken, start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            key,
            value,
            kind: Self::init(),
            method: false,
            shorthand: false,
            computed: false,
        }
    }

    fn init() -> String {
        "init".to_string()
    }
}

/// Any token that carries data: the operands of objects, arrays and attributes.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DataToken {
    Identifier(IdentifierToken),
    Literal(LiteralToken),
    #[serde(rename = "ObjectExpression")]
    Object(ObjectToken),
    #[serde(rename = "ArrayExpression")]
    Array(ArrayToken),
}

impl DataToken {
    #[must_use]
    pub fn start(&self) -> usize {
        match self {
            DataToken::Identifier(token) => token.start,
            DataToken::Literal(token) => token.start,
            DataToken::Object(token) => token.start,
            DataToken::Array(token) => token.start,
        }
    }

    #[must_use]
    pub fn end(&self) -> usize {
        match self {
            DataToken::Identifier(token) => token.end,
            DataToken::Literal(token) => token.end,
            DataToken::Object(token) => token.end,
            DataToken::Array(token) => token.end,
        }
    }
}

/// Structural and whitespace tokens (`{`, `_Whitespace`, `_Note`, keywords...).
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct UnknownToken {
    #[serde(rename = "type")]
    pub kind: String,
    pub start: usize,
    pub end: usize,
    pub value: String,
    pub raw: String,
}

/// Everything a reader can produce.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Token {
    Data(DataToken),
    Unknown(UnknownToken),
}

impl Token {
    #[must_use]
    pub fn start(&self) -> usize {
        match self {
            Token::Data(token) => token.start(),
            Token::Unknown(token) => token.start,
        }
    }

    #[must_use]
    pub fn end(&self) -> usize {
        match self {
            Token::Data(token) => token.end(),
            Token::Unknown(token) => token.end,
        }
    }

    /// The `type` discriminant of the token.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Token::Data(DataToken::Identifier(_)) => "Identifier",
            Token::Data(DataToken::Literal(_)) => "Literal",
            Token::Data(DataToken::Object(_)) => "ObjectExpression",
            Token::Data(DataToken::Array(_)) => "ArrayExpression",
            Token::Unknown(token) => &token.kind,
        }
    }

    pub fn into_data(self) -> Option<DataToken> {
        match self {
            Token::Data(token) => Some(token),
            Token::Unknown(_) => None,
        }
    }

    pub fn into_identifier(self) -> Option<IdentifierToken> {
        match self {
            Token::Data(DataToken::Identifier(token)) => Some(token),
            _ => None,
        }
    }

    pub fn into_literal(self) -> Option<LiteralToken> {
        match self {
            Token::Data(DataToken::Literal(token)) => Some(token),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<ObjectToken> {
        match self {
            Token::Data(DataToken::Object(token)) => Some(token),
            _ => None,
        }
    }
}

impl From<DataToken> for Token {
    fn from(token: DataToken) -> Self {
        Token::Data(token)
    }
}

impl From<UnknownToken> for Token {
    fn from(token: UnknownToken) -> Self {
        Token::Unknown(token)
    }
}

// --- Declarations ---

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Enum,
    Prop,
    Type,
    Model,
    Plugin,
    Schema,
}

impl Kind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Enum => "enum",
            Kind::Prop => "prop",
            Kind::Type => "type",
            Kind::Model => "model",
            Kind::Plugin => "plugin",
            Kind::Schema => "schema",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename = "VariableDeclarator")]
pub struct DeclaratorToken {
    pub start: usize,
    pub end: usize,
    pub id: IdentifierToken,
    pub init: ObjectToken,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename = "VariableDeclaration")]
pub struct DeclarationToken {
    pub kind: Kind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutable: Option<bool>,
    pub start: usize,
    pub end: usize,
    /// Always a single declarator; the grammar declares one name per statement.
    pub declarations: Vec<DeclaratorToken>,
}

impl DeclarationToken {
    pub fn new(kind: Kind, id: IdentifierToken, init: ObjectToken, start: usize, end: usize) -> Self {
        let declarator = DeclaratorToken {
            start: id.start,
            end,
            id,
            init,
        };
        Self {
            kind,
            mutable: None,
            start,
            end,
            declarations: vec![declarator],
        }
    }

    #[must_use]
    pub fn declarator(&self) -> Option<&DeclaratorToken> {
        self.declarations.first()
    }

    /// The declared name, e.g. `User` in `model User { ... }`.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.declarator().map(|declarator| declarator.id.name.as_str())
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename = "ImportDeclaration")]
pub struct ImportToken {
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub specifiers: Vec<IdentifierToken>,
    pub source: LiteralToken,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaItem {
    Declaration(DeclarationToken),
    Import(ImportToken),
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Program")]
pub struct SchemaToken {
    pub kind: Kind,
    pub start: usize,
    pub end: usize,
    pub body: Vec<SchemaItem>,
}
