//! Shared test utilities for pybotgram-typegen tests.
//!
//! This module provides common helper functions for creating schema
//! fixtures and fake formatters across the codebase.

use std::cell::{Cell, RefCell};
use std::path::Path;

use crate::format::{FormatError, SourceFormatter};
use crate::output::Templates;
use crate::schema::{Field, TypeCollection, TypeDefinition, TypeToken};

/// Creates a Field with a generated description.
///
/// ## Arguments
///
/// * `name` - Field name as it appears in the schema
/// * `types` - Raw type tokens, e.g. `"Array of PhotoSize"`
/// * `required` - Whether the field is mandatory
pub fn make_field(name: &str, types: &[&str], required: bool) -> Field {
    make_field_with_description(name, types, required, &format!("Test field {name}."))
}

/// Creates a Field with an explicit description.
pub fn make_field_with_description(
    name: &str,
    types: &[&str],
    required: bool,
    description: &str,
) -> Field {
    Field {
        name: name.to_string(),
        types: types.iter().map(|t| TypeToken::parse(t)).collect(),
        required,
        description: description.to_string(),
    }
}

/// Creates a TypeDefinition with no subtype relations.
pub fn make_type(name: &str, description: &[&str], fields: Vec<Field>) -> TypeDefinition {
    TypeDefinition {
        name: name.to_string(),
        href: format!("https://core.telegram.org/bots/api#{}", name.to_lowercase()),
        description: description.iter().map(|d| d.to_string()).collect(),
        fields,
        subtypes: vec![],
        subtype_of: vec![],
    }
}

/// `A { text: String, reply: B? }` and `B { id: Integer }`.
pub fn two_type_collection() -> TypeCollection {
    let a = make_type(
        "A",
        &["Type A."],
        vec![
            make_field("text", &["String"], true),
            make_field("reply", &["B"], false),
        ],
    );
    let b = make_type("B", &["Type B."], vec![make_field("id", &["Integer"], true)]);
    TypeCollection::new(vec![a, b]).unwrap()
}

/// The templates shipped in the crate's `templates/` directory.
pub fn shipped_templates() -> Templates {
    Templates::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("templates")).unwrap()
}

/// Formatter that rejects its Nth call (1-based) and passes everything else through.
pub struct FailingFormatter {
    fail_on: usize,
    calls: Cell<usize>,
}

impl FailingFormatter {
    pub fn on_call(fail_on: usize) -> Self {
        Self {
            fail_on,
            calls: Cell::new(0),
        }
    }
}

impl SourceFormatter for FailingFormatter {
    fn format(&self, source: &str, _line_width: usize) -> Result<String, FormatError> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        if call == self.fail_on {
            return Err(FormatError::Rejected {
                program: "fake".to_string(),
                status: "exit status: 123".to_string(),
                stderr: "cannot parse".to_string(),
            });
        }
        Ok(source.to_string())
    }
}

/// Formatter that records every call and passes the input through.
#[derive(Default)]
pub struct RecordingFormatter {
    pub calls: RefCell<Vec<(String, usize)>>,
}

impl SourceFormatter for RecordingFormatter {
    fn format(&self, source: &str, line_width: usize) -> Result<String, FormatError> {
        self.calls.borrow_mut().push((source.to_string(), line_width));
        Ok(source.to_string())
    }
}
