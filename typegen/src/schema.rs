//! Validated, strongly-typed model of the Bot API schema.
//!
//! The raw document is parsed with `serde_json` into an untyped
//! [`serde_json::Value`] and then walked by hand, so that every error can
//! name the exact location of the offending value:
//!
//! ```text
//! types.Message.fields[3].required: expected boolean
//! ```
//!
//! Type tokens such as `"Array of Array of PhotoSize"` are parsed exactly once,
//! here, into [`TypeToken`]. Nothing downstream matches on strings.
//!
//! ## Accepted layouts
//!
//! The mapping of type name to definition may be the document itself, or it
//! may sit under a top-level `types` key next to unrelated keys such as
//! `version` or `methods`:
//!
//! ```json
//! { "version": "Bot API 7.0", "types": { "User": { "name": "User", ... } } }
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::GeneratorError;

/// Prefix that marks an array token in the schema.
const ARRAY_PREFIX: &str = "Array of ";

/// A primitive schema type with a fixed Python counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Integer,
    Boolean,
    Float,
}

impl Primitive {
    pub const ALL: [Primitive; 4] = [
        Primitive::String,
        Primitive::Integer,
        Primitive::Boolean,
        Primitive::Float,
    ];

    /// Looks up a schema token in the primitive table.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "String" => Some(Self::String),
            "Integer" => Some(Self::Integer),
            "Boolean" => Some(Self::Boolean),
            "Float" => Some(Self::Float),
            _ => None,
        }
    }

    /// The token as written in the schema.
    pub fn schema_name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Boolean => "Boolean",
            Self::Float => "Float",
        }
    }

    /// The Python builtin the primitive maps to.
    pub fn python_name(self) -> &'static str {
        match self {
            Self::String => "str",
            Self::Integer => "int",
            Self::Boolean => "bool",
            Self::Float => "float",
        }
    }
}

/// A parsed schema type token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeToken {
    Primitive(Primitive),
    /// `Array of X`
    ArrayOf(Box<TypeToken>),
    /// Any other name, taken to be a declared type.
    Reference(String),
}

impl TypeToken {
    /// Parses a raw token, unwrapping any depth of `Array of` nesting.
    ///
    /// ## Examples
    ///
    /// ```
    /// use pybotgram_typegen::schema::{Primitive, TypeToken};
    ///
    /// assert_eq!(TypeToken::parse("Integer"), TypeToken::Primitive(Primitive::Integer));
    /// assert_eq!(
    ///     TypeToken::parse("Array of Array of PhotoSize"),
    ///     TypeToken::ArrayOf(Box::new(TypeToken::ArrayOf(Box::new(
    ///         TypeToken::Reference("PhotoSize".to_string())
    ///     ))))
    /// );
    /// ```
    pub fn parse(token: &str) -> Self {
        if let Some(inner) = token.strip_prefix(ARRAY_PREFIX) {
            return Self::ArrayOf(Box::new(Self::parse(inner)));
        }
        match Primitive::from_token(token) {
            Some(primitive) => Self::Primitive(primitive),
            None => Self::Reference(token.to_string()),
        }
    }

    /// The declared type this token ultimately names, looking through arrays.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Primitive(_) => None,
            Self::ArrayOf(inner) => inner.reference(),
            Self::Reference(name) => Some(name),
        }
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => f.write_str(p.schema_name()),
            Self::ArrayOf(inner) => write!(f, "{ARRAY_PREFIX}{inner}"),
            Self::Reference(name) => f.write_str(name),
        }
    }
}

/// A single field of a type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Never empty. More than one entry is a union.
    pub types: Vec<TypeToken>,
    pub required: bool,
    pub description: String,
}

/// One declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    pub name: String,
    pub href: String,
    /// Description paragraphs, in order.
    pub description: Vec<String>,
    pub fields: Vec<Field>,
    pub subtypes: Vec<String>,
    pub subtype_of: Vec<String>,
}

/// All declared types in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeCollection {
    types: Vec<TypeDefinition>,
}

impl TypeCollection {
    /// Builds a collection from already-validated definitions.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Validation` if two definitions share a name.
    pub fn new(types: Vec<TypeDefinition>) -> Result<Self, GeneratorError> {
        let mut seen = BTreeSet::new();
        for def in &types {
            if !seen.insert(def.name.as_str()) {
                return Err(GeneratorError::validation(
                    format!("types.{}", def.name),
                    "duplicate type name",
                ));
            }
        }
        Ok(Self { types })
    }

    /// Validates an untyped schema document.
    ///
    /// Only structure is checked here; see [`TypeCollection::check_references`]
    /// for cross-reference integrity.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Validation` naming the path of the first
    /// malformed or missing value.
    pub fn from_value(document: &Value) -> Result<Self, GeneratorError> {
        let (map, root) = match document.get("types") {
            Some(types) => (expect_object(types, "types")?, "types"),
            None => (expect_object(document, "$")?, "$"),
        };

        let mut types = Vec::with_capacity(map.len());
        for (key, value) in map {
            let path = format!("{root}.{key}");
            let def = parse_type_definition(value, &path)?;
            if def.name != *key {
                warn!(
                    key = %key,
                    name = %def.name,
                    "Type name differs from its schema key, using key"
                );
            }
            types.push(TypeDefinition {
                name: key.clone(),
                ..def
            });
        }

        debug!(count = types.len(), "Validated schema types");
        Self::new(types)
    }

    /// Verifies that every referenced type is declared.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::UnresolvedReference` for the first field, in
    /// schema order, whose type names an undeclared type.
    pub fn check_references(&self) -> Result<(), GeneratorError> {
        for def in &self.types {
            for field in &def.fields {
                for token in &field.types {
                    if let Some(reference) = token.reference()
                        && self.get(reference).is_none()
                    {
                        return Err(GeneratorError::UnresolvedReference {
                            type_name: def.name.clone(),
                            field: field.name.clone(),
                            reference: reference.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.iter().find(|def| def.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Reads and validates the schema file at `path`.
///
/// ## Errors
///
/// - `GeneratorError::Read` if the file cannot be read
/// - `GeneratorError::Json` if it is not JSON
/// - `GeneratorError::Validation` if its structure is wrong
/// - `GeneratorError::UnresolvedReference` when `strict_references` is set
///   and a field names an undeclared type
pub fn load_schema(path: &Path, strict_references: bool) -> Result<TypeCollection, GeneratorError> {
    let text = std::fs::read_to_string(path).map_err(|e| GeneratorError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    let document: Value = serde_json::from_str(&text).map_err(|e| GeneratorError::Json {
        path: path.display().to_string(),
        source: e,
    })?;

    let collection = TypeCollection::from_value(&document)?;
    if strict_references {
        collection.check_references()?;
    }
    Ok(collection)
}

fn parse_type_definition(value: &Value, path: &str) -> Result<TypeDefinition, GeneratorError> {
    let object = expect_object(value, path)?;

    let name = required_string(object, "name", path)?;
    let href = required_string(object, "href", path)?;
    let description = string_list(
        require_key(object, "description", path)?,
        &format!("{path}.description"),
    )?;

    let fields = match object.get("fields") {
        Some(value) => {
            let fields_path = format!("{path}.fields");
            let items = expect_array(value, &fields_path)?;
            let mut fields = Vec::with_capacity(items.len());
            let mut names = BTreeSet::new();
            for (i, item) in items.iter().enumerate() {
                let field_path = format!("{fields_path}[{i}]");
                let field = parse_field(item, &field_path)?;
                if !names.insert(field.name.clone()) {
                    return Err(GeneratorError::validation(
                        format!("{field_path}.name"),
                        format!("duplicate field name '{}'", field.name),
                    ));
                }
                fields.push(field);
            }
            fields
        }
        None => Vec::new(),
    };

    let subtypes = optional_string_list(object, "subtypes", path)?;
    let subtype_of = optional_string_list(object, "subtype_of", path)?;

    Ok(TypeDefinition {
        name,
        href,
        description,
        fields,
        subtypes,
        subtype_of,
    })
}

fn parse_field(value: &Value, path: &str) -> Result<Field, GeneratorError> {
    let object = expect_object(value, path)?;

    let name = required_string(object, "name", path)?;
    if name.is_empty() {
        return Err(GeneratorError::validation(
            format!("{path}.name"),
            "must not be empty",
        ));
    }

    let types_path = format!("{path}.types");
    let raw_types = string_list(require_key(object, "types", path)?, &types_path)?;
    if raw_types.is_empty() {
        return Err(GeneratorError::validation(types_path, "must not be empty"));
    }
    let types = raw_types.iter().map(|t| TypeToken::parse(t)).collect();

    let required_path = format!("{path}.required");
    let required = require_key(object, "required", path)?
        .as_bool()
        .ok_or_else(|| GeneratorError::validation(required_path, "expected boolean"))?;

    let description = required_string(object, "description", path)?;

    Ok(Field {
        name,
        types,
        required,
        description,
    })
}

fn require_key<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a Value, GeneratorError> {
    object
        .get(key)
        .ok_or_else(|| GeneratorError::validation(format!("{path}.{key}"), "missing key"))
}

fn required_string(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<String, GeneratorError> {
    require_key(object, key, path)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| GeneratorError::validation(format!("{path}.{key}"), "expected string"))
}

fn optional_string_list(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Vec<String>, GeneratorError> {
    match object.get(key) {
        Some(value) => string_list(value, &format!("{path}.{key}")),
        None => Ok(Vec::new()),
    }
}

fn string_list(value: &Value, path: &str) -> Result<Vec<String>, GeneratorError> {
    expect_array(value, path)?
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                GeneratorError::validation(format!("{path}[{i}]"), "expected string")
            })
        })
        .collect()
}

fn expect_object<'a>(
    value: &'a Value,
    path: &str,
) -> Result<&'a Map<String, Value>, GeneratorError> {
    value
        .as_object()
        .ok_or_else(|| GeneratorError::validation(path, "expected object"))
}

fn expect_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, GeneratorError> {
    value
        .as_array()
        .ok_or_else(|| GeneratorError::validation(path, "expected array"))
}
