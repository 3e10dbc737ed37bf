//! Class attribute declarations.

use crate::config::{FOUR_SPACE_INDENT, NO_INDENT, field_identifier};
use crate::resolve::{ABSENT, ResolvedField};

/// Renders the `name: annotation` line for one field.
///
/// Optional fields default to `None`.
///
/// ## Examples
///
/// ```
/// use pybotgram_typegen::fields::render_declaration;
/// use pybotgram_typegen::resolve::ResolvedField;
/// use pybotgram_typegen::schema::{Field, TypeToken};
///
/// let field = Field {
///     name: "from".to_string(),
///     types: vec![TypeToken::parse("User")],
///     required: false,
///     description: String::new(),
/// };
/// let resolved = ResolvedField::new(&field, "pybotgram.types");
/// assert_eq!(render_declaration(&resolved), "from_user: User | None = None");
/// ```
pub fn render_declaration(field: &ResolvedField<'_>) -> String {
    let name = field_identifier(&field.field.name);
    let annotation = &field.resolved.target;
    if field.field.required {
        format!("{name}: {annotation}")
    } else {
        format!("{name}: {annotation} = {ABSENT}")
    }
}

/// Renders every field declaration in schema order.
///
/// Lines after the first carry the class-body indent, since the template
/// places the block at that indent already. There is no trailing newline.
pub fn render_fields(fields: &[ResolvedField<'_>]) -> String {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let indent = if i == 0 { NO_INDENT } else { FOUR_SPACE_INDENT };
            format!("{indent}{}", render_declaration(field))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
