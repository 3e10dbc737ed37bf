//! File identifiers derived from type names.
//!
//! Type names are PascalCase (`InlineQueryResult`) and module files are
//! snake_case (`inline_query_result.py`). The conversion applies two rewrites
//! in order:
//!
//! 1. A capital followed by lowercase letters gets an underscore in front of
//!    it when anything precedes it: `InlineQuery` -> `Inline_Query`.
//! 2. A lowercase letter or digit followed by a capital gets an underscore
//!    between them: `file2Id` -> `file2_Id`.
//!
//! The result is then lowercased.
//!
//! ## Limitations
//!
//! The rules only see single-character boundaries. Runs of capitals that
//! end a name, or acronyms glued to digits, may split differently than a
//! human would. Such names can be pinned through a [`NamingExceptions`]
//! table; names with consecutive capitals are logged at debug level so they
//! are easy to audit.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static WORD_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("Invalid regex"));

static LOWER_UPPER_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("Invalid regex"));

/// Converts a PascalCase or camelCase name to snake_case.
///
/// ## Examples
///
/// ```
/// use pybotgram_typegen::naming::camel_to_snake;
///
/// assert_eq!(camel_to_snake("InlineQueryResult"), "inline_query_result");
/// assert_eq!(camel_to_snake("User"), "user");
/// assert_eq!(camel_to_snake("HTTPServer"), "http_server");
/// ```
pub fn camel_to_snake(name: &str) -> String {
    let split = WORD_BOUNDARY.replace_all(name, "${1}_${2}");
    LOWER_UPPER_BOUNDARY
        .replace_all(&split, "${1}_${2}")
        .to_lowercase()
}

/// Explicit file identifiers for names the rules get wrong.
#[derive(Debug, Clone, Default)]
pub struct NamingExceptions {
    overrides: BTreeMap<String, String>,
}

impl NamingExceptions {
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Returns the file identifier for a type name.
    ///
    /// An entry in the table wins; otherwise [`camel_to_snake`] applies.
    pub fn identifier(&self, type_name: &str) -> String {
        if let Some(ident) = self.overrides.get(type_name) {
            return ident.clone();
        }

        if has_consecutive_capitals(type_name) {
            debug!(type_name, "Name contains an acronym, check its file identifier");
        }
        camel_to_snake(type_name)
    }
}

fn has_consecutive_capitals(name: &str) -> bool {
    name.as_bytes()
        .windows(2)
        .any(|pair| pair[0].is_ascii_uppercase() && pair[1].is_ascii_uppercase())
}
