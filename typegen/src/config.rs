//! Generator configuration and the fixed tables shared by the renderers.
//!
//! The constants here are read-only for the whole run. Renderers receive
//! what they need through [`RenderOptions`] rather than reaching for globals,
//! so tests can exercise narrower widths or alternate package paths.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::errors::GeneratorError;

/// Column limit used for docstring wrapping and for the formatter pass.
pub const LINE_LENGTH: usize = 79;

pub const NO_INDENT: &str = "";
pub const FOUR_SPACE_INDENT: &str = "    ";
pub const EIGHT_SPACE_INDENT: &str = "        ";
pub const TWELVE_SPACE_INDENT: &str = "            ";

/// Python package that the generated modules live in.
pub const TYPES_PACKAGE: &str = "pybotgram.types";

/// Banner prepended to every generated file.
pub const WARNING_BANNER: &str = "\
# # # # # # # # # # # # # # # # # # # # # # # #
#               !!! WARNING !!!               #
#          This is a generated file!          #
# All changes made in this file will be lost! #
# # # # # # # # # # # # # # # # # # # # # # # #";

/// Field names that would collide with Python keywords, and their replacements.
pub const FIELD_RENAMES: &[(&str, &str)] = &[("from", "from_user")];

/// Returns the name a schema field is emitted under.
///
/// ## Examples
///
/// ```
/// use pybotgram_typegen::config::field_identifier;
///
/// assert_eq!(field_identifier("from"), "from_user");
/// assert_eq!(field_identifier("chat_id"), "chat_id");
/// ```
pub fn field_identifier(name: &str) -> &str {
    FIELD_RENAMES
        .iter()
        .find(|(from, _)| *from == name)
        .map_or(name, |&(_, to)| to)
}

/// Rendering parameters passed to the docstring and import renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Column limit for wrapped documentation.
    pub line_width: usize,
    /// Dotted package path used in imports and cross-reference links.
    pub package: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            line_width: LINE_LENGTH,
            package: TYPES_PACKAGE.to_string(),
        }
    }
}

/// Which formatter the generated sources are passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FormatterKind {
    /// `black --quiet --line-length N -`
    #[default]
    Black,
    /// `ruff format --quiet --line-length N -`
    Ruff,
    /// Leave the rendered text untouched.
    None,
}

/// Everything a generation run needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub schema_path: PathBuf,
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    pub render: RenderOptions,
    pub formatter: FormatterKind,
    /// Fail when a field references an undeclared type.
    pub strict_references: bool,
    /// Type names whose file identifier is fixed instead of derived.
    pub naming_exceptions: BTreeMap<String, String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            schema_path: PathBuf::from("telegram-bot-api-spec/api.min.json"),
            template_dir: PathBuf::from("typegen/templates"),
            output_dir: PathBuf::from("pybotgram/types"),
            render: RenderOptions::default(),
            formatter: FormatterKind::default(),
            strict_references: true,
            naming_exceptions: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    /// Checks the values that cannot be expressed through the type system.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Config` for a zero line width, an empty
    /// package path, or a naming exception that maps to an empty identifier.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.render.line_width == 0 {
            return Err(GeneratorError::Config(
                "line length must be greater than zero".to_string(),
            ));
        }

        if self.render.package.is_empty() {
            return Err(GeneratorError::Config(
                "package path cannot be empty".to_string(),
            ));
        }

        if let Some((name, _)) = self
            .naming_exceptions
            .iter()
            .find(|(_, ident)| ident.is_empty())
        {
            return Err(GeneratorError::Config(format!(
                "naming exception for '{name}' maps to an empty identifier"
            )));
        }

        Ok(())
    }
}
