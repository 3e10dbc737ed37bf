//! Type expression resolution.
//!
//! A field's type tokens resolve to two independent strings:
//!
//! | Token            | Annotation     | Docstring                            |
//! |------------------|----------------|--------------------------------------|
//! | `String`         | `str`          | ``` ``str`` ```                      |
//! | `Array of X`     | `list[X]`      | `List of X`                          |
//! | `Message`        | `Message`      | ``:obj:`~pybotgram.types.Message` `` |
//!
//! Unions are joined with ` | ` in both forms. An optional field appends a
//! trailing `None` member to the annotation and a single `, *optional*`
//! marker to the docstring form.

use std::collections::BTreeSet;

use crate::schema::{Field, TypeToken};

/// Annotation member appended for fields that may be absent.
pub const ABSENT: &str = "None";

/// Marker appended to the docstring type of an optional field.
pub const OPTIONAL_MARKER: &str = ", *optional*";

/// The resolved forms of one field's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Python annotation, e.g. `list[PhotoSize] | None`.
    pub target: String,
    /// Docstring rendering, e.g. ``List of :obj:`~pybotgram.types.PhotoSize`, *optional*``.
    pub doc: String,
    /// Declared types referenced by the field, sorted.
    pub references: BTreeSet<String>,
}

impl ResolvedType {
    /// Resolves a field's type tokens.
    ///
    /// `package` is the dotted package path used in cross-reference links.
    pub fn of_field(field: &Field, package: &str) -> Self {
        Self {
            target: target_expression(&field.types, field.required),
            doc: doc_expression(&field.types, field.required, package),
            references: field
                .types
                .iter()
                .filter_map(|t| t.reference())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// A schema field paired with its resolved type.
///
/// Renderers and the import collector all read from this, so each field's
/// tokens are resolved exactly once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField<'a> {
    pub field: &'a Field,
    pub resolved: ResolvedType,
}

impl<'a> ResolvedField<'a> {
    pub fn new(field: &'a Field, package: &str) -> Self {
        Self {
            field,
            resolved: ResolvedType::of_field(field, package),
        }
    }
}

/// Resolves every field of a type, keeping schema order.
pub fn resolve_fields<'a>(fields: &'a [Field], package: &str) -> Vec<ResolvedField<'a>> {
    fields
        .iter()
        .map(|field| ResolvedField::new(field, package))
        .collect()
}

/// Builds the Python annotation for a list of tokens.
///
/// ## Examples
///
/// ```
/// use pybotgram_typegen::resolve::target_expression;
/// use pybotgram_typegen::schema::TypeToken;
///
/// let tokens = [TypeToken::parse("Integer"), TypeToken::parse("String")];
/// assert_eq!(target_expression(&tokens, true), "int | str");
/// assert_eq!(target_expression(&tokens, false), "int | str | None");
/// ```
pub fn target_expression(types: &[TypeToken], required: bool) -> String {
    let mut members: Vec<String> = types.iter().map(target_member).collect();
    if !required {
        members.push(ABSENT.to_string());
    }
    members.join(" | ")
}

/// Builds the docstring type for a list of tokens.
///
/// ## Examples
///
/// ```
/// use pybotgram_typegen::resolve::doc_expression;
/// use pybotgram_typegen::schema::TypeToken;
///
/// let tokens = [TypeToken::parse("Array of String")];
/// assert_eq!(
///     doc_expression(&tokens, false, "pybotgram.types"),
///     "List of ``str``, *optional*"
/// );
/// ```
pub fn doc_expression(types: &[TypeToken], required: bool, package: &str) -> String {
    let mut doc = types
        .iter()
        .map(|t| doc_member(t, package))
        .collect::<Vec<_>>()
        .join(" | ");
    if !required {
        doc.push_str(OPTIONAL_MARKER);
    }
    doc
}

fn target_member(token: &TypeToken) -> String {
    match token {
        TypeToken::Primitive(p) => p.python_name().to_string(),
        TypeToken::ArrayOf(inner) => format!("list[{}]", target_member(inner)),
        TypeToken::Reference(name) => name.clone(),
    }
}

fn doc_member(token: &TypeToken, package: &str) -> String {
    match token {
        TypeToken::Primitive(p) => format!("``{}``", p.python_name()),
        TypeToken::ArrayOf(inner) => format!("List of {}", doc_member(inner, package)),
        TypeToken::Reference(name) => format!(":obj:`~{package}.{name}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Primitive;
    use crate::test_utils::make_field;

    const PKG: &str = "pybotgram.types";

    fn tokens(raw: &[&str]) -> Vec<TypeToken> {
        raw.iter().map(|t| TypeToken::parse(t)).collect()
    }

    // === target_expression ===

    #[test]
    fn primitives_map_through_table() {
        let expected = [
            (Primitive::String, "str"),
            (Primitive::Integer, "int"),
            (Primitive::Boolean, "bool"),
            (Primitive::Float, "float"),
        ];
        for (primitive, python) in expected {
            assert_eq!(
                target_expression(&[TypeToken::Primitive(primitive)], true),
                python
            );
        }
    }

    #[test]
    fn reference_passes_through() {
        assert_eq!(target_expression(&tokens(&["Chat"]), true), "Chat");
    }

    #[test]
    fn nested_array_unwraps_twice() {
        assert_eq!(
            target_expression(&tokens(&["Array of Array of PhotoSize"]), true),
            "list[list[PhotoSize]]"
        );
        assert_eq!(
            target_expression(&tokens(&["Array of Array of Integer"]), true),
            "list[list[int]]"
        );
    }

    #[test]
    fn union_keeps_order() {
        assert_eq!(
            target_expression(&tokens(&["InputFile", "String"]), true),
            "InputFile | str"
        );
    }

    #[test]
    fn optional_appends_none_last() {
        let target = target_expression(&tokens(&["InputFile", "String"]), false);
        assert_eq!(target, "InputFile | str | None");
        assert_eq!(target.rsplit(" | ").next(), Some(ABSENT));
    }

    // === doc_expression ===

    #[test]
    fn doc_primitive_is_literal() {
        assert_eq!(doc_expression(&tokens(&["Boolean"]), true, PKG), "``bool``");
    }

    #[test]
    fn doc_reference_is_link() {
        assert_eq!(
            doc_expression(&tokens(&["User"]), true, PKG),
            ":obj:`~pybotgram.types.User`"
        );
    }

    #[test]
    fn doc_nested_array() {
        assert_eq!(
            doc_expression(&tokens(&["Array of Array of InlineKeyboardButton"]), true, PKG),
            "List of List of :obj:`~pybotgram.types.InlineKeyboardButton`"
        );
    }

    #[test]
    fn doc_optional_marker_appears_once() {
        let doc = doc_expression(&tokens(&["Integer", "String", "Float"]), false, PKG);
        assert_eq!(doc, "``int`` | ``str`` | ``float``, *optional*");
        assert_eq!(doc.matches(OPTIONAL_MARKER).count(), 1);
        assert!(doc.ends_with(OPTIONAL_MARKER));
    }

    #[test]
    fn doc_required_has_no_marker() {
        let doc = doc_expression(&tokens(&["Integer", "String"]), true, PKG);
        assert!(!doc.contains("optional"));
    }

    // === ResolvedType ===

    #[test]
    fn resolved_field_collects_references() {
        let field = make_field(
            "media",
            &["Array of InputMediaPhoto", "Array of InputMediaVideo"],
            false,
        );
        let resolved = ResolvedType::of_field(&field, PKG);
        assert_eq!(
            resolved.target,
            "list[InputMediaPhoto] | list[InputMediaVideo] | None"
        );
        let references: Vec<_> = resolved.references.iter().map(String::as_str).collect();
        assert_eq!(references, vec!["InputMediaPhoto", "InputMediaVideo"]);
    }

    #[test]
    fn resolved_field_carries_both_expressions() {
        let field = make_field("photo", &["Array of PhotoSize"], false);
        let resolved = ResolvedField::new(&field, PKG);
        assert_eq!(resolved.field.name, "photo");
        assert_eq!(resolved.resolved.target, "list[PhotoSize] | None");
        assert_eq!(
            resolved.resolved.doc,
            "List of :obj:`~pybotgram.types.PhotoSize`, *optional*"
        );
    }

    #[test]
    fn resolve_fields_keeps_order() {
        let fields = vec![
            make_field("b", &["Integer"], true),
            make_field("a", &["String"], true),
        ];
        let names: Vec<_> = resolve_fields(&fields, PKG)
            .iter()
            .map(|r| r.field.name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn package_is_used_in_links() {
        let field = make_field("chat", &["Chat"], true);
        let resolved = ResolvedType::of_field(&field, "mybot.types");
        assert_eq!(resolved.doc, ":obj:`~mybot.types.Chat`");
    }
}
